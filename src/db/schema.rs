//! Database schema and migrations for CloudStore.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users, files, sessions, settings
    r#"
-- Users table for accounts and role management
CREATE TABLE users (
    id             TEXT PRIMARY KEY,
    email          TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password       TEXT NOT NULL,           -- plain text, demo data only
    name           TEXT NOT NULL,
    role           TEXT NOT NULL DEFAULT 'user',  -- 'owner', 'admin', 'staff', 'user'
    storage_used   INTEGER NOT NULL DEFAULT 0,
    storage_limit  INTEGER NOT NULL,
    created_at     TEXT NOT NULL
);

CREATE INDEX idx_users_role ON users(role);

-- Files and folders, one flat per-user namespace
CREATE TABLE files (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL,               -- 'file' or 'folder'
    mime_type   TEXT,                        -- files only
    size        INTEGER NOT NULL DEFAULT 0,  -- folders report 0
    parent_id   TEXT,                        -- NULL means top-level; not a FK on purpose
    user_id     TEXT NOT NULL,
    shared      INTEGER NOT NULL DEFAULT 0,
    starred     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    data        BLOB                         -- uploaded payload, files only
);

CREATE INDEX idx_files_user_id ON files(user_id);
CREATE INDEX idx_files_parent_id ON files(parent_id);
CREATE INDEX idx_files_starred ON files(starred);
CREATE INDEX idx_files_shared ON files(shared);

-- Login sessions; expired rows are left in place (lazy expiry)
CREATE TABLE sessions (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE INDEX idx_sessions_user_id ON sessions(user_id);

-- Settings key/value collection
CREATE TABLE settings (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
"#,
];
