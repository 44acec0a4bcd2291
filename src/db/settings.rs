//! Settings repository for CloudStore.
//!
//! A small key/value collection alongside the record collections.

use sqlx::SqlitePool;

use crate::Result;

/// Repository for the settings key/value collection.
pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new SettingsRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a setting value by key.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let result: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;

        Ok(result.map(|(value,)| value))
    }

    /// Set a setting value, inserting or replacing.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a setting by key. Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
