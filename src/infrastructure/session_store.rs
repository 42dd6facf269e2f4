use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::session::{AdminSession, SessionStore};

/// Process-local session store. Sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, AdminSession>>,
}

impl InMemorySessionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, AdminSession>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|_| DomainError::Internal("session store lock poisoned".to_string()))
    }

    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.lock()?.is_empty())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: Uuid) -> Result<Option<AdminSession>, DomainError> {
        Ok(self.lock()?.get(&token).cloned())
    }

    fn set(&self, session: AdminSession) -> Result<(), DomainError> {
        self.lock()?.insert(session.token, session);
        Ok(())
    }

    fn clear(&self, token: Uuid) -> Result<(), DomainError> {
        self.lock()?.remove(&token);
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }
}
