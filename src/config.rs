use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::application::auth_service::AdminCredentials;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Origin serving `/api/woo/get-orders` and `/api/wp/get-orders`.
    pub upstream_origin: String,
    /// Unset means upstream requests never time out.
    pub upstream_timeout: Option<Duration>,
    pub admin: AdminCredentials,
    pub session_ttl: chrono::Duration,
}

impl Config {
    /// Read configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_timeout = optional::<u64, _>(&lookup, "UPSTREAM_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let session_ttl_secs: i64 = or_default(&lookup, "SESSION_TTL_SECS", 8 * 60 * 60)?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: or_default(&lookup, "PORT", 8080)?,
            upstream_origin: lookup("UPSTREAM_ORIGIN")
                .unwrap_or_else(|| "http://127.0.0.1:3000".to_string()),
            upstream_timeout,
            admin: AdminCredentials {
                username: lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: lookup("ADMIN_PASSWORD")
                    .filter(|p| !p.is_empty())
                    .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?,
            },
            session_ttl: chrono::Duration::seconds(session_ttl_secs),
        })
    }
}

fn optional<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn or_default<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key)? {
        Some(value) => Ok(value),
        None => {
            log::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
