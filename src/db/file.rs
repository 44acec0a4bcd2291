//! File and folder model for CloudStore.
//!
//! Files and folders share one record type, discriminated by [`FileKind`].
//! Each record lives in a flat per-user namespace; `parent_id` links it to a
//! folder but is not enforced referentially (a dangling parent is accepted).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::datetime::now_rfc3339;

/// Discriminator between files and folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A regular file, optionally carrying an uploaded payload.
    File,
    /// A folder. Folders report size 0 and never carry a payload.
    Folder,
}

impl FileKind {
    /// Convert kind to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Folder => "folder",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(FileKind::File),
            "folder" => Ok(FileKind::Folder),
            _ => Err(format!("unknown file kind: {s}")),
        }
    }
}

impl TryFrom<String> for FileKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A file or folder record.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct FileRecord {
    /// Unique record ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// File or folder.
    #[sqlx(try_from = "String")]
    pub kind: FileKind,
    /// MIME type (files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Size in bytes. Folders report 0.
    pub size: i64,
    /// Parent folder id; None means top-level.
    pub parent_id: Option<String>,
    /// Owning user id.
    pub user_id: String,
    /// Shared flag.
    pub shared: bool,
    /// Starred flag.
    pub starred: bool,
    /// Creation timestamp (RFC3339).
    pub created_at: String,
    /// Last mutation timestamp (RFC3339). Refreshed on every mutation.
    pub updated_at: String,
    /// Uploaded payload (files only, present after an upload completes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl FileRecord {
    /// Create a new record with a generated id and fresh timestamps.
    pub fn new(name: impl Into<String>, kind: FileKind, user_id: impl Into<String>) -> Self {
        let now = now_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            mime_type: None,
            size: 0,
            parent_id: None,
            user_id: user_id.into(),
            shared: false,
            starred: false,
            created_at: now.clone(),
            updated_at: now,
            data: None,
        }
    }

    /// Set a fixed id (seed data uses well-known ids).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the size in bytes.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the shared flag.
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// Set the starred flag.
    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    /// Attach an uploaded payload, updating the size to match.
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.size = data.len() as i64;
        self.data = Some(data);
        self
    }

    /// Set fixed timestamps (seed data uses historical dates).
    pub fn with_timestamps(
        mut self,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        self.created_at = created_at.into();
        self.updated_at = updated_at.into();
        self
    }

    /// Whether this record is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }
}

/// Aggregated per-user statistics, recomputed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Number of records with kind `file`.
    pub total_files: i64,
    /// Number of records with kind `folder`.
    pub total_folders: i64,
    /// Number of shared records.
    pub shared_files: i64,
    /// Sum of `size` over all records (folders contribute 0).
    pub total_size: i64,
}
