//! Diagnostics, database backups and app-data hooks

use super::{validate_segment, StorageManager};
use crate::error::{StorageError, StorageResult};
use crate::types::{BackupEntry, StorageInfo};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Backup name for `database_file` taken at `at`
///
/// `miyo.db` at 2024-05-01T10:20:30.123Z becomes
/// `miyo.db.backup.2024-05-01T10-20-30-123Z`.
pub fn backup_file_name(database_file: &str, at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}.backup.{}", database_file, timestamp)
}

fn backup_stamp(name: &str) -> &str {
    name.rsplit_once(".backup.").map_or(name, |(_, stamp)| stamp)
}

impl StorageManager {
    /// Summarize the storage layout
    pub async fn storage_info(&self) -> StorageResult<StorageInfo> {
        self.observe("storage_info", async {
            self.ensure_ready()?;
            let root_entries = self.list_dir(&self.paths.root).await?;
            let books = self.list_dir(&self.paths.books).await?;

            Ok(StorageInfo {
                app_root: self.paths.root.clone(),
                total_items: root_entries.len(),
                total_books: books.len(),
                paths: self.paths.clone(),
            })
        })
        .await
    }

    /// Copy a database file into `database/backups` with a timestamped name
    ///
    /// Returns `None` without touching anything when the database file does
    /// not exist yet. Uses the configured database file when `database_file`
    /// is `None`.
    pub async fn backup_database(
        &self,
        database_file: Option<&str>,
    ) -> StorageResult<Option<PathBuf>> {
        self.observe("backup_database", async {
            self.ensure_ready()?;
            let name = validate_segment(
                "database file name",
                database_file.unwrap_or(&self.config.database_file),
            )?;
            let source = self.paths.database.join(name);

            if !self.path_exists(&source).await? {
                tracing::debug!("No database at {}, skipping backup", source.display());
                return Ok(None);
            }

            self.ensure_dir(&self.paths.backups).await?;
            let target = self.paths.backups.join(backup_file_name(name, Utc::now()));
            self.storage
                .copy(&source, &target)
                .await
                .map_err(|e| StorageError::FileCopy {
                    from: source.clone(),
                    to: target.clone(),
                    source: e,
                })?;

            tracing::info!("Database backed up to: {}", target.display());
            Ok(Some(target))
        })
        .await
    }

    /// Backup files, newest first
    pub async fn list_backups(&self) -> StorageResult<Vec<BackupEntry>> {
        self.observe("list_backups", async {
            self.ensure_ready()?;
            let mut backups: Vec<BackupEntry> = self
                .list_dir(&self.paths.backups)
                .await?
                .into_iter()
                .filter(|entry| !entry.is_dir && entry.name.contains(".backup."))
                .map(|entry| BackupEntry {
                    name: entry.name,
                    path: entry.path,
                    size: entry.len,
                    modified: DateTime::<Utc>::from(entry.modified),
                })
                .collect();

            // The name carries the backup time; copies may keep the source mtime
            backups.sort_by(|a, b| backup_stamp(&b.name).cmp(backup_stamp(&a.name)));
            Ok(backups)
        })
        .await
    }

    /// Export all app data to `target`
    ///
    /// No archive format is defined yet; always returns [`StorageError::Unsupported`].
    pub async fn export_app_data(&self, target: &Path) -> StorageResult<()> {
        self.observe("export_app_data", async {
            self.ensure_ready()?;
            tracing::info!("Export requested to: {}", target.display());
            Err(StorageError::Unsupported("export_app_data"))
        })
        .await
    }

    /// Restore app data from `source`
    ///
    /// No archive format is defined yet; always returns [`StorageError::Unsupported`].
    pub async fn import_app_data(&self, source: &Path) -> StorageResult<()> {
        self.observe("import_app_data", async {
            self.ensure_ready()?;
            tracing::info!("Import requested from: {}", source.display());
            Err(StorageError::Unsupported("import_app_data"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::manager_in;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_backup_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(
            backup_file_name("miyo.db", at),
            "miyo.db.backup.2024-05-01T10-20-30-123Z"
        );
    }

    #[tokio::test]
    async fn test_backup_missing_database_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        assert_eq!(manager.backup_database(Some("miyo.db")).await.unwrap(), None);
        assert_eq!(std::fs::read_dir(&manager.paths().backups).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_backup_copies_database() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        std::fs::write(manager.paths().database.join("miyo.db"), b"SQLite format 3").unwrap();

        let backup = manager.backup_database(None).await.unwrap().unwrap();
        assert!(backup.starts_with(&manager.paths().backups));
        assert_eq!(std::fs::read(&backup).unwrap(), b"SQLite format 3");

        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("miyo.db.backup."));
        assert!(!name.contains(':'));

        let backups = manager.list_backups().await.unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].size, 15);
    }

    #[tokio::test]
    async fn test_storage_info() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();
        manager.save_book("b1", "aGk=", None).await.unwrap();
        manager.save_book("b2", "aGk=", None).await.unwrap();

        let info = manager.storage_info().await.unwrap();
        assert_eq!(info.app_root, manager.paths().root);
        // books, database, preferences, cache, logs
        assert_eq!(info.total_items, 5);
        assert_eq!(info.total_books, 2);
        assert_eq!(info.paths, *manager.paths());
    }

    #[tokio::test]
    async fn test_export_import_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        assert!(matches!(
            manager.export_app_data(temp_dir.path()).await,
            Err(StorageError::Unsupported(_))
        ));
        assert!(matches!(
            manager.import_app_data(temp_dir.path()).await,
            Err(StorageError::Unsupported(_))
        ));
    }
}
