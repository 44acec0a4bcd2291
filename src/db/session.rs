//! Session model and the current-session pointer slot.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::datetime::{now_rfc3339, parse_rfc3339};
use crate::{CloudStoreError, Result};

/// Fixed session lifetime: 7 days from creation.
pub const SESSION_DURATION_DAYS: i64 = 7;

/// A login session. Validity is checked lazily at lookup time; expired rows
/// stay in the database until explicitly deleted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Session {
    /// Unique session ID.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Creation timestamp (RFC3339).
    pub created_at: String,
    /// Expiry timestamp (RFC3339), a fixed offset from creation.
    pub expires_at: String,
}

impl Session {
    /// Create a new session with the standard 7-day expiry.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_duration(user_id, Duration::days(SESSION_DURATION_DAYS))
    }

    /// Create a session with a custom lifetime.
    pub fn with_duration(user_id: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            created_at: now.to_rfc3339(),
            expires_at: (now + duration).to_rfc3339(),
        }
    }

    /// Check if the session has expired.
    ///
    /// An unparseable expiry timestamp counts as expired.
    pub fn is_expired(&self) -> bool {
        match parse_rfc3339(&self.expires_at) {
            Some(expires_at) => Utc::now() >= expires_at,
            None => true,
        }
    }
}

/// The single persisted value naming the currently active session id.
///
/// This mirrors the small synchronous key-value slot the store consumes
/// beside the database proper. On disk it is a sidecar file next to the
/// database file; in-memory databases use an in-process slot instead.
#[derive(Debug)]
pub enum SessionPointer {
    /// Pointer persisted in a sidecar file.
    File(PathBuf),
    /// In-process pointer (tests, in-memory databases).
    Memory(Mutex<Option<String>>),
}

impl SessionPointer {
    /// Create a file-backed pointer at the given path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SessionPointer::File(path.into())
    }

    /// Create an in-memory pointer.
    pub fn in_memory() -> Self {
        SessionPointer::Memory(Mutex::new(None))
    }

    /// Read the current session id, if any.
    pub fn get(&self) -> Result<Option<String>> {
        match self {
            SessionPointer::File(path) => match std::fs::read_to_string(path) {
                Ok(contents) => {
                    let id = contents.trim();
                    if id.is_empty() {
                        Ok(None)
                    } else {
                        Ok(Some(id.to_string()))
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            SessionPointer::Memory(slot) => Ok(lock_slot(slot)?.clone()),
        }
    }

    /// Record a session id as current.
    pub fn set(&self, session_id: &str) -> Result<()> {
        match self {
            SessionPointer::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(path, session_id)?;
                Ok(())
            }
            SessionPointer::Memory(slot) => {
                *lock_slot(slot)? = Some(session_id.to_string());
                Ok(())
            }
        }
    }

    /// Clear the pointer. Clearing an absent pointer is a no-op.
    pub fn clear(&self) -> Result<()> {
        match self {
            SessionPointer::File(path) => match std::fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
            SessionPointer::Memory(slot) => {
                *lock_slot(slot)? = None;
                Ok(())
            }
        }
    }
}

fn lock_slot(slot: &Mutex<Option<String>>) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
    slot.lock()
        .map_err(|_| CloudStoreError::Storage("session pointer lock poisoned".to_string()))
}
