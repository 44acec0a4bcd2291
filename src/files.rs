//! File operations for CloudStore.
//!
//! Read-modify-write conveniences (star, share, rename) over the store's
//! record CRUD. Every mutation refreshes the record's `updated_at`.

use tracing::{debug, info};

use crate::datetime::now_rfc3339;
use crate::db::FileRecord;
use crate::store::Store;
use crate::{CloudStoreError, Result};

/// File service over an injected store.
pub struct FileService<'a> {
    store: &'a Store,
}

impl<'a> FileService<'a> {
    /// Create a new FileService over the given store.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Persist a freshly built record.
    pub async fn create(&self, record: FileRecord) -> Result<FileRecord> {
        let created = self.store.create_file(&record).await?;
        info!(file_id = %created.id, name = %created.name, "File created");
        Ok(created)
    }

    /// Persist changes to a record, refreshing its `updated_at`.
    pub async fn save(&self, mut record: FileRecord) -> Result<FileRecord> {
        record.updated_at = now_rfc3339();
        self.store.update_file(&record).await
    }

    /// Flip a record's starred flag.
    pub async fn toggle_star(&self, id: &str) -> Result<FileRecord> {
        let mut record = self.get(id).await?;
        record.starred = !record.starred;
        debug!(file_id = %id, starred = record.starred, "Star toggled");
        self.save(record).await
    }

    /// Flip a record's shared flag.
    pub async fn toggle_share(&self, id: &str) -> Result<FileRecord> {
        let mut record = self.get(id).await?;
        record.shared = !record.shared;
        debug!(file_id = %id, shared = record.shared, "Share toggled");
        self.save(record).await
    }

    /// Rename a record.
    pub async fn rename(&self, id: &str, name: &str) -> Result<FileRecord> {
        let mut record = self.get(id).await?;
        record.name = name.to_string();
        self.save(record).await
    }

    /// Delete a record immediately. There is no trash.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_file(id).await? {
            return Err(CloudStoreError::NotFound("file".to_string()));
        }
        info!(file_id = %id, "File deleted");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<FileRecord> {
        self.store
            .get_file_by_id(id)
            .await?
            .ok_or_else(|| CloudStoreError::NotFound("file".to_string()))
    }
}
