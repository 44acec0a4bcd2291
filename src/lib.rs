//! CloudStore - local persistence and sessions for a file-storage demo.
//!
//! A structured local store with four collections (users, files, sessions,
//! settings), a current-session pointer, demo seed data, and thin
//! authentication and file services on top.
//!
//! This is demo software: passwords are stored and compared as plain text on
//! purpose. Do not reuse the authentication layer anywhere real.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod files;
pub mod logging;
pub mod store;

pub use auth::AuthService;
pub use config::Config;
pub use db::{
    Database, FileKind, FileRecord, Role, Session, SessionPointer, User, UserStats, GIB,
    SESSION_DURATION_DAYS,
};
pub use error::{CloudStoreError, Result};
pub use files::FileService;
pub use store::{DatabaseExport, Store};
