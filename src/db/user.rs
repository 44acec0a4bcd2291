//! User model for CloudStore.
//!
//! This module defines the User struct and Role enum for account management.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::datetime::now_rfc3339;

/// One gibibyte in bytes, the unit the storage figures are quoted in.
pub const GIB: i64 = 1024 * 1024 * 1024;

/// User role, a totally ordered rank (owner highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user (self-registered).
    #[default]
    User = 0,
    /// Staff member.
    Staff = 1,
    /// Administrator.
    Admin = 2,
    /// Owner (highest rank).
    Owner = 3,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    /// Check if this role has at least the required rank.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudstore::db::Role;
    ///
    /// assert!(Role::Owner.can_access(Role::Admin));
    /// assert!(Role::Staff.can_access(Role::Staff));
    /// assert!(!Role::User.can_access(Role::Staff));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// User entity representing an account.
///
/// The password is stored and compared as plain text. That is inherited demo
/// behavior, kept deliberately; see DESIGN.md before reusing this anywhere
/// that matters.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct User {
    /// Unique user ID (immutable).
    pub id: String,
    /// Email address, unique case-insensitively, used as the login key.
    pub email: String,
    /// Password, plain text.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Role for permissions.
    #[sqlx(try_from = "String")]
    pub role: Role,
    /// Bytes of storage currently attributed to the user.
    pub storage_used: i64,
    /// Storage limit in bytes. Not enforced against storage_used.
    pub storage_limit: i64,
    /// Account creation timestamp (RFC3339, immutable).
    pub created_at: String,
}

impl User {
    /// Create a new user record with a generated id and creation timestamp.
    ///
    /// Defaults: role `user`, 0 bytes used, 15 GiB limit.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            password: password.into(),
            name: name.into(),
            role: Role::User,
            storage_used: 0,
            storage_limit: 15 * GIB,
            created_at: now_rfc3339(),
        }
    }

    /// Set a fixed id (seed data uses well-known ids).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the storage figures (used, limit) in bytes.
    pub fn with_storage(mut self, used: i64, limit: i64) -> Self {
        self.storage_used = used;
        self.storage_limit = limit;
        self
    }

    /// Set a fixed creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Check if this user has at least the required role rank.
    pub fn has_role(&self, required: Role) -> bool {
        self.role >= required
    }

    /// Check if this user is an administrator or higher.
    pub fn is_admin(&self) -> bool {
        self.role >= Role::Admin
    }
}
