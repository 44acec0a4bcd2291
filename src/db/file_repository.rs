//! File repository for CloudStore.
//!
//! CRUD over the files collection plus the derived per-user queries. The
//! derived queries (parent filter, starred, shared, stats) load the owner's
//! full file list and filter or aggregate in memory on every call; only the
//! user_id lookup itself goes through a secondary index.

use sqlx::SqlitePool;
use tracing::debug;

use super::file::{FileKind, FileRecord, UserStats};
use crate::{CloudStoreError, Result};

/// Repository for file and folder records.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file or folder record.
    ///
    /// Fails with `DuplicateKey` if the id is already taken.
    pub async fn create(&self, record: &FileRecord) -> Result<FileRecord> {
        sqlx::query(
            "INSERT INTO files (id, name, kind, mime_type, size, parent_id, user_id,
                                shared, starred, created_at, updated_at, data)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&record.mime_type)
        .bind(record.size)
        .bind(&record.parent_id)
        .bind(&record.user_id)
        .bind(record.shared)
        .bind(record.starred)
        .bind(&record.created_at)
        .bind(&record.updated_at)
        .bind(&record.data)
        .execute(self.pool)
        .await?;

        debug!(file_id = %record.id, user_id = %record.user_id, kind = %record.kind, "File record created");

        self.get_by_id(&record.id)
            .await?
            .ok_or_else(|| CloudStoreError::NotFound("file".to_string()))
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(
            "SELECT id, name, kind, mime_type, size, parent_id, user_id,
                    shared, starred, created_at, updated_at, data
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Full-record upsert keyed by id: replaces every field, last writer wins.
    pub async fn update(&self, record: &FileRecord) -> Result<FileRecord> {
        sqlx::query(
            "INSERT INTO files (id, name, kind, mime_type, size, parent_id, user_id,
                                shared, starred, created_at, updated_at, data)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                mime_type = excluded.mime_type,
                size = excluded.size,
                parent_id = excluded.parent_id,
                user_id = excluded.user_id,
                shared = excluded.shared,
                starred = excluded.starred,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                data = excluded.data",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&record.mime_type)
        .bind(record.size)
        .bind(&record.parent_id)
        .bind(&record.user_id)
        .bind(record.shared)
        .bind(record.starred)
        .bind(&record.created_at)
        .bind(&record.updated_at)
        .bind(&record.data)
        .execute(self.pool)
        .await?;

        Ok(record.clone())
    }

    /// Delete a record by ID. Immediate; there is no trash.
    ///
    /// Returns true if a record was deleted, false if not found.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all records owned by a user. Order is unspecified.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT id, name, kind, mime_type, size, parent_id, user_id,
                    shared, starred, created_at, updated_at, data
             FROM files WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// List a user's records under the given parent (None for top-level).
    pub async fn list_by_parent(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<FileRecord>> {
        let all = self.list_by_user(user_id).await?;
        Ok(all
            .into_iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect())
    }

    /// List a user's starred records.
    pub async fn starred(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        let all = self.list_by_user(user_id).await?;
        Ok(all.into_iter().filter(|f| f.starred).collect())
    }

    /// List a user's shared records.
    pub async fn shared(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        let all = self.list_by_user(user_id).await?;
        Ok(all.into_iter().filter(|f| f.shared).collect())
    }

    /// Aggregate stats over a user's records. Recomputed in full per call.
    pub async fn stats(&self, user_id: &str) -> Result<UserStats> {
        let files = self.list_by_user(user_id).await?;

        let mut stats = UserStats::default();
        for f in &files {
            match f.kind {
                FileKind::File => stats.total_files += 1,
                FileKind::Folder => stats.total_folders += 1,
            }
            if f.shared {
                stats.shared_files += 1;
            }
            stats.total_size += f.size;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let record = FileRecord::new("report.pdf", FileKind::File, "user-1")
            .with_mime_type("application/pdf")
            .with_size(1024);
        let created = repo.create(&record).await.unwrap();

        assert_eq!(created, record);

        let found = repo.get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(found.name, "report.pdf");
        assert_eq!(found.mime_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let record = FileRecord::new("a.txt", FileKind::File, "user-1").with_id("file-1");
        repo.create(&record).await.unwrap();

        let duplicate = FileRecord::new("b.txt", FileKind::File, "user-1").with_id("file-1");
        let result = repo.create(&duplicate).await;

        assert!(matches!(result, Err(CloudStoreError::DuplicateKey(_))));
    }

    #[tokio::test]
    async fn test_payload_round_trip() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let payload = vec![1u8, 2, 3, 4, 5];
        let record =
            FileRecord::new("blob.bin", FileKind::File, "user-1").with_data(payload.clone());
        repo.create(&record).await.unwrap();

        let found = repo.get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(found.data.as_deref(), Some(payload.as_slice()));
        assert_eq!(found.size, 5);
    }

    #[tokio::test]
    async fn test_dangling_parent_accepted() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        // parent_id referencing nothing is not rejected
        let record =
            FileRecord::new("orphan.txt", FileKind::File, "user-1").with_parent("no-such-folder");
        repo.create(&record).await.unwrap();

        let found = repo.get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(found.parent_id.as_deref(), Some("no-such-folder"));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let record = FileRecord::new("draft.txt", FileKind::File, "user-1");
        repo.create(&record).await.unwrap();

        let mut changed = record.clone();
        changed.name = "final.txt".to_string();
        changed.starred = true;
        repo.update(&changed).await.unwrap();

        let reloaded = repo.get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "final.txt");
        assert!(reloaded.starred);
        assert_eq!(reloaded.created_at, record.created_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let record = FileRecord::new("tmp.txt", FileKind::File, "user-1");
        repo.create(&record).await.unwrap();

        assert!(repo.delete(&record.id).await.unwrap());
        assert!(repo.get_by_id(&record.id).await.unwrap().is_none());
        assert!(!repo.delete(&record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_user_scoped_to_owner() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&FileRecord::new("a.txt", FileKind::File, "user-1"))
            .await
            .unwrap();
        repo.create(&FileRecord::new("b.txt", FileKind::File, "user-1"))
            .await
            .unwrap();
        repo.create(&FileRecord::new("c.txt", FileKind::File, "user-2"))
            .await
            .unwrap();

        assert_eq!(repo.list_by_user("user-1").await.unwrap().len(), 2);
        assert_eq!(repo.list_by_user("user-2").await.unwrap().len(), 1);
        assert!(repo.list_by_user("user-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_parent() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let folder = FileRecord::new("Docs", FileKind::Folder, "user-1");
        repo.create(&folder).await.unwrap();
        repo.create(&FileRecord::new("top.txt", FileKind::File, "user-1"))
            .await
            .unwrap();
        repo.create(
            &FileRecord::new("nested.txt", FileKind::File, "user-1").with_parent(&folder.id),
        )
        .await
        .unwrap();

        let top = repo.list_by_parent("user-1", None).await.unwrap();
        assert_eq!(top.len(), 2); // the folder and top.txt

        let nested = repo
            .list_by_parent("user-1", Some(&folder.id))
            .await
            .unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "nested.txt");
    }

    #[tokio::test]
    async fn test_starred_and_shared_filters() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&FileRecord::new("a.txt", FileKind::File, "user-1").with_starred(true))
            .await
            .unwrap();
        repo.create(
            &FileRecord::new("b.txt", FileKind::File, "user-1")
                .with_starred(true)
                .with_shared(true),
        )
        .await
        .unwrap();
        repo.create(&FileRecord::new("c.txt", FileKind::File, "user-1"))
            .await
            .unwrap();

        let starred = repo.starred("user-1").await.unwrap();
        assert_eq!(starred.len(), 2);
        assert!(starred.iter().all(|f| f.starred));

        let shared = repo.shared("user-1").await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].name, "b.txt");
    }

    #[tokio::test]
    async fn test_stats_aggregation() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&FileRecord::new("Docs", FileKind::Folder, "user-1").with_shared(true))
            .await
            .unwrap();
        repo.create(&FileRecord::new("a.txt", FileKind::File, "user-1").with_size(100))
            .await
            .unwrap();
        repo.create(
            &FileRecord::new("b.txt", FileKind::File, "user-1")
                .with_size(250)
                .with_shared(true),
        )
        .await
        .unwrap();

        let stats = repo.stats("user-1").await.unwrap();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_folders, 1);
        assert_eq!(stats.shared_files, 2);
        assert_eq!(stats.total_size, 350);
    }

    #[tokio::test]
    async fn test_stats_empty_user() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let stats = repo.stats("nobody").await.unwrap();
        assert_eq!(stats, UserStats::default());
    }
}
