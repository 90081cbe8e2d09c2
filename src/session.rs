//! Authenticated session: token pair plus the logged-in user.
//!
//! The session is an explicit value threaded through the API boundary,
//! not a module-level global. `SessionStore` persists it between runs so the
//! front desk is not logged out by every restart.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::{Role, User};

/// A logged-in staff session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Disk persistence for the session.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the configured default location.
    pub fn new() -> Self {
        Self {
            path: config::session_file(),
        }
    }

    /// Store at an explicit path (used by tests).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Load the persisted session, if any. A missing file is simply "not
    /// logged in"; a corrupt file is an error the caller may clear.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&json)?;
        Ok(Some(session))
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            access_token: "access-token".into(),
            refresh_token: "refresh-token".into(),
            user: User {
                id: "u2".into(),
                name: "Dr. Ananya Rao".into(),
                email: "ananya@clinic.example".into(),
                role: Role::Doctor,
                avatar: None,
            },
        }
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        store.save(&session()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access-token");
        assert_eq!(loaded.role(), Role::Doctor);
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::at(path);
        assert!(matches!(store.load(), Err(SessionError::Corrupt(_))));
    }
}
