//! File-system primitives consumed by the storage manager

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single entry returned by [`StorageProvider::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name (last path segment)
    pub name: String,

    /// Absolute path of the entry
    pub path: PathBuf,

    /// Last modification time
    pub modified: SystemTime,

    /// Whether the entry is a directory
    pub is_dir: bool,

    /// Size in bytes (zero for directories)
    pub len: u64,
}

/// Abstract file-system provider
///
/// The storage manager composes paths and maps failures to its own error
/// kinds; providers only report raw I/O outcomes.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Check if a path exists
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create a directory and any missing parents; existing directories are left alone
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read a whole file
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write a whole file, replacing any previous content
    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Remove a file, or a directory and everything below it
    async fn remove(&self, path: &Path) -> io::Result<()>;

    /// List the immediate children of a directory
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Copy a file
    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Local filesystem storage provider backed by `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, data).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        }
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(path).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                modified: metadata.modified()?,
                is_dir: metadata.is_dir(),
                len: if metadata.is_dir() { 0 } else { metadata.len() },
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::copy(from, to).await.map(|_| ())
    }
}
