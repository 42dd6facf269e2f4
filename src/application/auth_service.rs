use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::session::{AdminSession, SessionStore};

/// The single admin account allowed to sign in.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

pub struct AuthService {
    credentials: AdminCredentials,
    sessions: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl AuthService {
    pub fn new(credentials: AdminCredentials, sessions: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self {
            credentials,
            sessions,
            ttl,
        }
    }

    /// Check the admin credentials and open a session. Sessions that have
    /// already expired are purged first so the store stays bounded.
    pub fn login(&self, username: &str, password: &str) -> Result<AdminSession, DomainError> {
        let user_ok = constant_time_eq(username.as_bytes(), self.credentials.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.credentials.password.as_bytes());
        if !(user_ok & password_ok) {
            log::warn!("Rejected admin login for {:?}", username);
            return Err(DomainError::InvalidCredentials);
        }
        let now = Utc::now();
        let purged = self.sessions.purge_expired(now)?;
        if purged > 0 {
            log::debug!("Purged {} expired admin sessions", purged);
        }
        let session = AdminSession::issue(username, self.ttl, now);
        self.sessions.set(session.clone())?;
        log::info!("Admin {} signed in", session.username);
        Ok(session)
    }

    /// Look up a live session. Expired sessions are cleared and reported as
    /// missing.
    pub fn session(&self, token: Uuid) -> Result<AdminSession, DomainError> {
        let session = self
            .sessions
            .get(token)?
            .ok_or(DomainError::SessionNotFound)?;
        if session.is_expired(Utc::now()) {
            log::debug!("Session for {} expired at {}", session.username, session.expires_at);
            self.sessions.clear(token)?;
            return Err(DomainError::SessionNotFound);
        }
        Ok(session)
    }

    pub fn logout(&self, token: Uuid) -> Result<(), DomainError> {
        self.sessions.clear(token)
    }
}

/// Byte comparison whose running time depends only on the lengths, not on
/// where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session_store::InMemorySessionStore;

    fn service(ttl: Duration) -> (AuthService, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::default());
        let service = AuthService::new(
            AdminCredentials {
                username: "admin".to_string(),
                password: "s3cret".to_string(),
            },
            store.clone(),
            ttl,
        );
        (service, store)
    }

    #[test]
    fn login_with_valid_credentials_stores_a_session() {
        let (service, store) = service(Duration::hours(1));

        let session = service.login("admin", "s3cret").expect("login");

        assert_eq!(session.username, "admin");
        assert_eq!(store.get(session.token).expect("get"), Some(session));
    }

    #[test]
    fn login_with_wrong_password_is_rejected() {
        let (service, _) = service(Duration::hours(1));
        let err = service.login("admin", "nope").expect_err("must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[test]
    fn session_lookup_and_logout() {
        let (service, _) = service(Duration::hours(1));
        let session = service.login("admin", "s3cret").expect("login");

        assert_eq!(service.session(session.token).expect("session"), session);

        service.logout(session.token).expect("logout");
        assert!(matches!(
            service.session(session.token),
            Err(DomainError::SessionNotFound)
        ));
    }

    #[test]
    fn expired_session_is_cleared() {
        let (service, store) = service(Duration::zero());
        let session = service.login("admin", "s3cret").expect("login");

        assert!(matches!(
            service.session(session.token),
            Err(DomainError::SessionNotFound)
        ));
        assert_eq!(store.get(session.token).expect("get"), None);
    }

    #[test]
    fn login_purges_expired_sessions() {
        let (service, store) = service(Duration::zero());

        service.login("admin", "s3cret").expect("first login");
        let second = service.login("admin", "s3cret").expect("second login");

        assert_eq!(store.len().expect("len"), 1);
        assert_eq!(store.get(second.token).expect("get"), Some(second));
    }

    #[test]
    fn live_sessions_survive_another_login() {
        let (service, store) = service(Duration::hours(1));

        service.login("admin", "s3cret").expect("first login");
        service.login("admin", "s3cret").expect("second login");

        assert_eq!(store.len().expect("len"), 2);
    }

    #[test]
    fn wrong_username_or_length_mismatch_is_rejected() {
        let (service, store) = service(Duration::hours(1));

        for (user, pass) in [("root", "s3cret"), ("admin", "s3cre"), ("admin", "s3cret!"), ("", "")] {
            assert!(matches!(
                service.login(user, pass),
                Err(DomainError::InvalidCredentials)
            ));
        }
        assert!(store.is_empty().expect("is_empty"));
    }

    #[test]
    fn constant_time_eq_compares_whole_slices() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"xs3cret", b"s3cret"));
        assert!(!constant_time_eq(b"s3cret", b"s3cre"));
    }

    #[test]
    fn unknown_token_is_not_found() {
        let (service, _) = service(Duration::hours(1));
        assert!(matches!(
            service.session(Uuid::new_v4()),
            Err(DomainError::SessionNotFound)
        ));
    }
}
