//! The storage manager
//!
//! Owns the [`PathSet`] and performs every book, preference, cache and
//! maintenance operation through a [`StorageProvider`]. Nothing is indexed in
//! memory; every listing re-reads the file system.
//!
//! [`StorageManager::initialize`] must complete before any other operation.
//! Operations called earlier fail with [`StorageError::NotInitialized`]
//! without touching the disk.

mod books;
mod cache;
mod maintenance;
mod preferences;

pub use books::{DEFAULT_BOOK_FILE, METADATA_FILE};
pub use maintenance::backup_file_name;
pub use preferences::PREFERENCES_FILE;

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::paths::{PathSet, PlatformRoots};
use crate::report::{ErrorRecord, ErrorSink, TracingErrorSink};
use crate::storage::{DirEntry, LocalStorage, StorageProvider};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-level storage for books, metadata, preferences and cache
pub struct StorageManager {
    paths: PathSet,
    config: StorageConfig,
    storage: Arc<dyn StorageProvider>,
    sink: Arc<dyn ErrorSink>,
    initialized: AtomicBool,
}

impl StorageManager {
    /// Create a manager over the local file system; no I/O happens here
    pub fn new(paths: PathSet, config: StorageConfig) -> Self {
        Self::with_provider(paths, config, Arc::new(LocalStorage::new()))
    }

    /// Create a manager using a custom file-system provider
    pub fn with_provider(
        paths: PathSet,
        config: StorageConfig,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            paths,
            config,
            storage,
            sink: Arc::new(TracingErrorSink),
            initialized: AtomicBool::new(false),
        }
    }

    /// Build the path layout from config (detecting platform roots as needed)
    pub fn from_config(config: StorageConfig) -> StorageResult<Self> {
        let roots = PlatformRoots::from_config(&config)?;
        let paths = PathSet::from_roots(&roots, &config);
        Ok(Self::new(paths, config))
    }

    /// Construct from config and initialize the directory tree
    pub async fn open(config: StorageConfig) -> StorageResult<Self> {
        let manager = Self::from_config(config)?;
        manager.initialize().await?;
        Ok(manager)
    }

    /// Replace the error sink
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Ensure every registry directory exists
    ///
    /// Safe to call repeatedly; existing directories are left untouched.
    pub async fn initialize(&self) -> StorageResult<()> {
        self.observe("initialize", async {
            for (_, dir) in self.paths.iter() {
                self.ensure_dir(dir).await?;
            }
            self.initialized.store(true, Ordering::Release);
            tracing::info!("Storage initialized at {}", self.paths.root.display());
            Ok(())
        })
        .await
    }

    /// Run an operation, reporting any failure to the error sink
    async fn observe<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StorageResult<T>>,
    ) -> StorageResult<T> {
        let result = fut.await;
        if let Err(e) = &result {
            self.sink.record(ErrorRecord::from_error(operation, e));
        }
        result
    }

    fn ensure_ready(&self) -> StorageResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }

    async fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        let exists = self
            .storage
            .exists(path)
            .await
            .map_err(|source| StorageError::DirectoryCreate {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            self.storage
                .create_dir_all(path)
                .await
                .map_err(|source| StorageError::DirectoryCreate {
                    path: path.to_path_buf(),
                    source,
                })?;
            tracing::info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    async fn path_exists(&self, path: &Path) -> StorageResult<bool> {
        self.storage
            .exists(path)
            .await
            .map_err(|source| StorageError::FileRead {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read a file, mapping absence to `None`
    async fn read_file(&self, path: &Path) -> StorageResult<Option<Vec<u8>>> {
        match self.storage.read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::FileRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        self.storage
            .write(path, data)
            .await
            .map_err(|source| StorageError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<Option<T>> {
        let Some(data) = self.read_file(path).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StorageError::JsonParse {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> StorageResult<()> {
        let data =
            serde_json::to_string_pretty(value).map_err(|source| StorageError::JsonSerialize {
                path: path.to_path_buf(),
                source,
            })?;
        self.write_file(path, data.as_bytes()).await
    }

    async fn list_dir(&self, path: &Path) -> StorageResult<Vec<DirEntry>> {
        self.storage
            .read_dir(path)
            .await
            .map_err(|source| StorageError::DirectoryRead {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn remove_path(&self, path: &Path) -> StorageResult<()> {
        self.storage
            .remove(path)
            .await
            .map_err(|source| StorageError::FileDelete {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Recreate the reserved cache subdirectories after a cache wipe
    async fn restore_reserved_cache_dirs(&self) -> StorageResult<()> {
        self.ensure_dir(&self.paths.images).await?;
        self.ensure_dir(&self.paths.thumbnails).await
    }
}

/// Decode base64 content handed to the storage API
fn decode_base64(context: &str, data: &str) -> StorageResult<Vec<u8>> {
    let compact: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|source| StorageError::InvalidBase64 {
            context: context.to_string(),
            source,
        })
}

fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Validate a single path segment such as a book id or file name
fn validate_segment<'a>(kind: &'static str, value: &'a str) -> StorageResult<&'a str> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == value => Ok(value),
        _ => Err(StorageError::InvalidName {
            kind,
            value: value.to_string(),
        }),
    }
}

/// Validate a relative path made only of normal components
fn validate_relative(kind: &'static str, value: &str) -> StorageResult<PathBuf> {
    let invalid = || StorageError::InvalidName {
        kind,
        value: value.to_string(),
    };

    let mut normalized = PathBuf::new();
    for component in Path::new(value).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                return Err(invalid());
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(normalized)
}
