use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession {
    pub token: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn issue(username: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4(),
            username: username.into(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Keyed storage for session blobs.
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, token: Uuid) -> Result<Option<AdminSession>, DomainError>;
    fn set(&self, session: AdminSession) -> Result<(), DomainError>;
    fn clear(&self, token: Uuid) -> Result<(), DomainError>;
    /// Drop every session expired at `now`; returns how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
