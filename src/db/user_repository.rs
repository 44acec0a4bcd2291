//! User repository for CloudStore.
//!
//! This module provides CRUD operations for users in the database.

use sqlx::SqlitePool;
use tracing::debug;

use super::user::User;
use crate::{CloudStoreError, Result};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Fails with `DuplicateKey` if the id is already taken or the email is
    /// already in use (case-insensitively). Returns the stored record.
    pub async fn create(&self, user: &User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, email, password, name, role, storage_used, storage_limit, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.storage_used)
        .bind(user.storage_limit)
        .bind(&user.created_at)
        .execute(self.pool)
        .await?;

        debug!(user_id = %user.id, email = %user.email, "User created");

        self.get_by_id(&user.id)
            .await?
            .ok_or_else(|| CloudStoreError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, role, storage_used, storage_limit, created_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by email (case-insensitive exact match).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, role, storage_used, storage_limit, created_at
             FROM users WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all users. Order is unspecified.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, role, storage_used, storage_limit, created_at
             FROM users",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Full-record upsert keyed by id: replaces every field, last writer
    /// wins. There is no optimistic-concurrency check.
    pub async fn update(&self, user: &User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, email, password, name, role, storage_used, storage_limit, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                password = excluded.password,
                name = excluded.name,
                role = excluded.role,
                storage_used = excluded.storage_used,
                storage_limit = excluded.storage_limit,
                created_at = excluded.created_at",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.storage_used)
        .bind(user.storage_limit)
        .bind(&user.created_at)
        .execute(self.pool)
        .await?;

        Ok(user.clone())
    }

    /// Delete a user by ID.
    ///
    /// Does not cascade: the user's files and sessions stay in place.
    /// Returns true if a user was deleted, false if not found.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
