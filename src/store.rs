//! The Store: CloudStore's persistence facade.
//!
//! One explicitly constructed object owning the database and the
//! current-session pointer, exposing the full operation surface the rest of
//! the application consumes. Nothing else holds persistent state.

use chrono::Duration;
use serde::Serialize;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::{
    Database, FileKind, FileRecord, FileRepository, Role, Session, SessionPointer,
    SessionRepository, SettingsRepository, User, UserRepository, UserStats, GIB,
};
use crate::Result;

const MIB: i64 = 1024 * 1024;

/// Full snapshot of users and their files, for backup/export display.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseExport {
    /// Every user record.
    pub users: Vec<User>,
    /// Every file belonging to an exported user, grouped by owner order.
    pub files: Vec<FileRecord>,
}

/// Persistence facade over the four collections and the session pointer.
///
/// The session pointer is an explicit field here rather than ambient global
/// state; "one active session per profile" is carried by this object.
#[derive(Debug)]
pub struct Store {
    db: Database,
    pointer: SessionPointer,
}

impl Store {
    /// Open a store backed by the configured database file, with the session
    /// pointer in its sidecar file.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let db = Database::open(&config.path).await?;
        let pointer = SessionPointer::file(config.session_file_path());
        Ok(Self { db, pointer })
    }

    /// Open an in-memory store (tests). The session pointer is in-memory too.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db,
            pointer: SessionPointer::in_memory(),
        })
    }

    /// Access the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.db.pool())
    }

    fn files(&self) -> FileRepository<'_> {
        FileRepository::new(self.db.pool())
    }

    fn sessions(&self) -> SessionRepository<'_> {
        SessionRepository::new(self.db.pool())
    }

    fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(self.db.pool())
    }

    /// Idempotent initialization: seeds the demo accounts and the owner's
    /// demo files, but only while the users collection is empty. Schema
    /// creation itself already happened (transactionally) at open.
    pub async fn initialize(&self) -> Result<()> {
        if self.users().count().await? > 0 {
            return Ok(());
        }

        info!("Seeding demo data");

        for user in seed_users() {
            self.users().create(&user).await?;
        }
        for file in seed_files() {
            self.files().create(&file).await?;
        }

        Ok(())
    }

    // === Users ===

    /// Create a user. Fails with `DuplicateKey` on id or email conflict.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.users().create(user).await
    }

    /// Look up a user by email, case-insensitively. Absence is `Ok(None)`.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users().get_by_email(email).await
    }

    /// Look up a user by id.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.users().get_by_id(id).await
    }

    /// List all users. Order is unspecified.
    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        self.users().list_all().await
    }

    /// Full-record upsert by id; last writer wins.
    pub async fn update_user(&self, user: &User) -> Result<User> {
        self.users().update(user).await
    }

    /// Delete a user. The user's files and sessions are left in place.
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        self.users().delete(id).await
    }

    // === Files ===

    /// Create a file or folder record.
    pub async fn create_file(&self, record: &FileRecord) -> Result<FileRecord> {
        self.files().create(record).await
    }

    /// Look up a record by id.
    pub async fn get_file_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        self.files().get_by_id(id).await
    }

    /// Full-record upsert by id; last writer wins.
    pub async fn update_file(&self, record: &FileRecord) -> Result<FileRecord> {
        self.files().update(record).await
    }

    /// Delete a record immediately. There is no trash.
    pub async fn delete_file(&self, id: &str) -> Result<bool> {
        self.files().delete(id).await
    }

    /// All records owned by a user.
    pub async fn get_files_by_user(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        self.files().list_by_user(user_id).await
    }

    /// A user's records under the given parent (None for top-level).
    pub async fn get_files_by_parent(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<FileRecord>> {
        self.files().list_by_parent(user_id, parent_id).await
    }

    /// A user's starred records.
    pub async fn get_starred_files(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        self.files().starred(user_id).await
    }

    /// A user's shared records.
    pub async fn get_shared_files(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        self.files().shared(user_id).await
    }

    /// Aggregate stats over a user's records, recomputed in full per call.
    pub async fn get_user_stats(&self, user_id: &str) -> Result<UserStats> {
        self.files().stats(user_id).await
    }

    // === Sessions ===

    /// Create a session with the standard 7-day expiry and record it as
    /// current in the pointer.
    pub async fn create_session(&self, user_id: &str) -> Result<Session> {
        let session = self.sessions().create(user_id).await?;
        self.pointer.set(&session.id)?;
        Ok(session)
    }

    /// Create a session with a custom lifetime (tests exercise expiry with
    /// this) and record it as current.
    pub async fn create_session_with_duration(
        &self,
        user_id: &str,
        duration: Duration,
    ) -> Result<Session> {
        let session = self.sessions().create_with_duration(user_id, duration).await?;
        self.pointer.set(&session.id)?;
        Ok(session)
    }

    /// Resolve the current session, if any.
    ///
    /// Lazy expiry: an expired or missing session record clears the pointer
    /// and reads as absent. Nothing is purged from the sessions collection.
    pub async fn current_session(&self) -> Result<Option<Session>> {
        let Some(session_id) = self.pointer.get()? else {
            return Ok(None);
        };

        match self.sessions().get_by_id(&session_id).await? {
            Some(session) if !session.is_expired() => Ok(Some(session)),
            _ => {
                self.pointer.clear()?;
                Ok(None)
            }
        }
    }

    /// Delete a session and clear the pointer.
    ///
    /// The pointer is cleared unconditionally, even if it names a different
    /// session id. Inherited behavior, kept on purpose.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        self.pointer.clear()?;
        self.sessions().delete(session_id).await
    }

    // === Settings ===

    /// Get a settings value by key.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.settings().get(key).await
    }

    /// Set a settings value.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.settings().set(key, value).await
    }

    // === Utilities ===

    /// Empty all four collections and clear the session pointer.
    /// Irreversible.
    pub async fn clear_all_data(&self) -> Result<()> {
        info!("Clearing all data");

        for table in ["users", "files", "sessions", "settings"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(self.db.pool())
                .await?;
        }
        self.pointer.clear()?;

        Ok(())
    }

    /// Snapshot every user together with every file belonging to each user.
    ///
    /// Assembled by iterating users and concatenating their file lists, so
    /// files whose owner was deleted do not appear.
    pub async fn export_database(&self) -> Result<DatabaseExport> {
        let users = self.users().list_all().await?;

        let mut files = Vec::new();
        for user in &users {
            files.extend(self.files().list_by_user(&user.id).await?);
        }

        Ok(DatabaseExport { users, files })
    }
}

/// The three demo accounts, fixed ids and figures.
fn seed_users() -> Vec<User> {
    vec![
        User::new("owner@cloud.io", "demo123", "Carlos Owner")
            .with_id("owner-1")
            .with_role(Role::Owner)
            .with_storage((45.2 * GIB as f64) as i64, 1024 * GIB)
            .with_created_at("2024-01-01T00:00:00+00:00"),
        User::new("admin@cloud.io", "demo123", "Ana Admin")
            .with_id("admin-1")
            .with_role(Role::Admin)
            .with_storage((28.7 * GIB as f64) as i64, 500 * GIB)
            .with_created_at("2024-02-15T00:00:00+00:00"),
        User::new("staff@cloud.io", "demo123", "Pedro Staff")
            .with_id("staff-1")
            .with_role(Role::Staff)
            .with_storage((12.4 * GIB as f64) as i64, 100 * GIB)
            .with_created_at("2024-03-20T00:00:00+00:00"),
    ]
}

/// The owner's demo files and folders.
fn seed_files() -> Vec<FileRecord> {
    vec![
        FileRecord::new("Projetos", FileKind::Folder, "owner-1")
            .with_id("folder-1")
            .with_shared(true)
            .with_starred(true)
            .with_timestamps("2024-01-15T00:00:00+00:00", "2024-06-01T00:00:00+00:00"),
        FileRecord::new("Documentos", FileKind::Folder, "owner-1")
            .with_id("folder-2")
            .with_timestamps("2024-02-10T00:00:00+00:00", "2024-05-20T00:00:00+00:00"),
        FileRecord::new("Relatório Anual 2024.pdf", FileKind::File, "owner-1")
            .with_id("file-1")
            .with_mime_type("application/pdf")
            .with_size((15.7 * MIB as f64) as i64)
            .with_shared(true)
            .with_starred(true)
            .with_timestamps("2024-03-05T00:00:00+00:00", "2024-03-05T00:00:00+00:00"),
        FileRecord::new("Apresentação Q4.pptx", FileKind::File, "owner-1")
            .with_id("file-2")
            .with_mime_type("application/vnd.ms-powerpoint")
            .with_size((8.2 * MIB as f64) as i64)
            .with_timestamps("2024-04-12T00:00:00+00:00", "2024-04-15T00:00:00+00:00"),
        FileRecord::new("banner-hero.png", FileKind::File, "owner-1")
            .with_id("file-3")
            .with_mime_type("image/png")
            .with_size((2.4 * MIB as f64) as i64)
            .with_timestamps("2024-05-01T00:00:00+00:00", "2024-05-01T00:00:00+00:00"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> Store {
        let store = Store::open_in_memory().await.unwrap();
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_initialize_seeds_demo_data() {
        let store = setup_store().await;

        let users = store.get_all_users().await.unwrap();
        assert_eq!(users.len(), 3);

        let owner = store.get_user_by_id("owner-1").await.unwrap().unwrap();
        assert_eq!(owner.email, "owner@cloud.io");
        assert_eq!(owner.role, Role::Owner);
        assert_eq!(owner.storage_limit, 1024 * GIB);

        let owner_files = store.get_files_by_user("owner-1").await.unwrap();
        assert_eq!(owner_files.len(), 5);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = setup_store().await;

        store.initialize().await.unwrap();
        store.initialize().await.unwrap();

        assert_eq!(store.get_all_users().await.unwrap().len(), 3);
        assert_eq!(store.get_files_by_user("owner-1").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_initialize_skips_seed_when_users_exist() {
        let store = Store::open_in_memory().await.unwrap();

        store
            .create_user(&User::new("solo@example.com", "pw", "Solo"))
            .await
            .unwrap();
        store.initialize().await.unwrap();

        // The pre-existing user suppressed seeding
        assert_eq!(store.get_all_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_file_flags() {
        let store = setup_store().await;

        let starred = store.get_starred_files("owner-1").await.unwrap();
        assert_eq!(starred.len(), 2); // folder-1 and file-1

        let shared = store.get_shared_files("owner-1").await.unwrap();
        assert_eq!(shared.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_stats() {
        let store = setup_store().await;

        let stats = store.get_user_stats("owner-1").await.unwrap();
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_folders, 2);
        assert_eq!(stats.shared_files, 2);
        let expected_size = (15.7 * MIB as f64) as i64
            + (8.2 * MIB as f64) as i64
            + (2.4 * MIB as f64) as i64;
        assert_eq!(stats.total_size, expected_size);
    }

    #[tokio::test]
    async fn test_create_session_sets_pointer() {
        let store = setup_store().await;

        let session = store.create_session("owner-1").await.unwrap();

        let current = store.current_session().await.unwrap().unwrap();
        assert_eq!(current.id, session.id);
        assert_eq!(current.user_id, "owner-1");
    }

    #[tokio::test]
    async fn test_current_session_none_without_pointer() {
        let store = setup_store().await;

        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_reads_as_absent_and_clears_pointer() {
        let store = setup_store().await;

        let session = store
            .create_session_with_duration("owner-1", Duration::seconds(-1))
            .await
            .unwrap();

        // Lazy expiry: lookup reports absent and clears the pointer...
        assert!(store.current_session().await.unwrap().is_none());

        // ...but the record itself was not purged
        let repo = SessionRepository::new(store.database().pool());
        assert!(repo.get_by_id(&session.id).await.unwrap().is_some());

        // Pointer stays cleared for later lookups
        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_session_clears_pointer() {
        let store = setup_store().await;

        let session = store.create_session("owner-1").await.unwrap();
        store.delete_session(&session.id).await.unwrap();

        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_session_clears_pointer_even_for_other_id() {
        let store = setup_store().await;

        let current = store.create_session("owner-1").await.unwrap();

        // Deleting an unrelated id still clears the pointer (inherited
        // behavior, pinned here)
        store.delete_session("some-other-session").await.unwrap();

        assert!(store.current_session().await.unwrap().is_none());
        // The current session record itself survived
        let repo = SessionRepository::new(store.database().pool());
        assert!(repo.get_by_id(&current.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_user_does_not_cascade() {
        let store = setup_store().await;

        let session = store.create_session("owner-1").await.unwrap();
        store.delete_user("owner-1").await.unwrap();

        // Files and sessions survive the owner's deletion
        assert!(store.get_user_by_id("owner-1").await.unwrap().is_none());
        assert_eq!(store.get_files_by_user("owner-1").await.unwrap().len(), 5);

        let repo = SessionRepository::new(store.database().pool());
        assert!(repo.get_by_id(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_export_database() {
        let store = setup_store().await;

        let export = store.export_database().await.unwrap();
        assert_eq!(export.users.len(), 3);
        assert_eq!(export.files.len(), 5);
    }

    #[tokio::test]
    async fn test_export_omits_orphaned_files() {
        let store = setup_store().await;

        store.delete_user("owner-1").await.unwrap();

        // The files still exist but their owner is gone, so the export
        // (assembled per user) no longer includes them
        let export = store.export_database().await.unwrap();
        assert_eq!(export.users.len(), 2);
        assert!(export.files.is_empty());
        assert_eq!(store.get_files_by_user("owner-1").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_export_serializes() {
        let store = setup_store().await;

        let export = store.export_database().await.unwrap();
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("owner@cloud.io"));
        assert!(json.contains("banner-hero.png"));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let store = setup_store().await;

        assert!(store.get_setting("locale").await.unwrap().is_none());
        store.set_setting("locale", "pt-BR").await.unwrap();
        assert_eq!(
            store.get_setting("locale").await.unwrap().as_deref(),
            Some("pt-BR")
        );
    }

    #[tokio::test]
    async fn test_clear_all_data() {
        let store = setup_store().await;

        store.create_session("owner-1").await.unwrap();
        store.set_setting("locale", "pt-BR").await.unwrap();

        store.clear_all_data().await.unwrap();

        assert!(store.get_all_users().await.unwrap().is_empty());
        assert!(store.get_files_by_user("owner-1").await.unwrap().is_empty());
        assert!(store.current_session().await.unwrap().is_none());
        assert!(store.get_setting("locale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reinitialize_after_clear() {
        let store = setup_store().await;

        store.clear_all_data().await.unwrap();
        store.initialize().await.unwrap();

        assert_eq!(store.get_all_users().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("store.db").display().to_string(),
            session_file: String::new(),
        };

        let session_id = {
            let store = Store::open(&config).await.unwrap();
            store.initialize().await.unwrap();
            store.create_session("owner-1").await.unwrap().id
        };

        let store = Store::open(&config).await.unwrap();
        store.initialize().await.unwrap();

        // Seeded data and the current session survive a restart
        assert_eq!(store.get_all_users().await.unwrap().len(), 3);
        let current = store.current_session().await.unwrap().unwrap();
        assert_eq!(current.id, session_id);
    }
}
