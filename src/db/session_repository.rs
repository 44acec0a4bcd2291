//! Session repository for CloudStore.
//!
//! Persists login sessions. Expired rows are not purged here; expiry is
//! enforced lazily by the store when the current session is looked up.

use chrono::Duration;
use sqlx::SqlitePool;
use tracing::debug;

use super::session::Session;
use crate::Result;

/// Repository for session records.
pub struct SessionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new SessionRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create and persist a session with the standard 7-day expiry.
    pub async fn create(&self, user_id: &str) -> Result<Session> {
        self.insert(Session::new(user_id)).await
    }

    /// Create and persist a session with a custom lifetime.
    pub async fn create_with_duration(&self, user_id: &str, duration: Duration) -> Result<Session> {
        self.insert(Session::with_duration(user_id, duration)).await
    }

    async fn insert(&self, session: Session) -> Result<Session> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, created_at, expires_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.created_at)
        .bind(&session.expires_at)
        .execute(self.pool)
        .await?;

        debug!(session_id = %session.id, user_id = %session.user_id, "Session created");
        Ok(session)
    }

    /// Get a session by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        let result = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List sessions belonging to a user.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sessions)
    }

    /// Delete a session by ID.
    ///
    /// Returns true if a session was deleted, false if not found.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
