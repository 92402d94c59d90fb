//! Path registry for the app's directory layout
//!
//! ```text
//! <document-root>/<app-namespace>/
//!   books/  database/  database/backups/  preferences/
//!   cache/  cache/images/  cache/thumbnails/  logs/
//! <temp-root>/<temp-namespace>/
//! ```

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Persistent and temporary roots supplied by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRoots {
    pub documents: PathBuf,
    pub temp: PathBuf,
}

impl PlatformRoots {
    /// Resolve roots from the OS: the per-user data directory and the temp directory
    pub fn detect() -> StorageResult<Self> {
        let dirs = directories::ProjectDirs::from("com", "miyo", "Miyo")
            .ok_or(StorageError::NoPlatformDirectory)?;
        Ok(Self {
            documents: dirs.data_dir().to_path_buf(),
            temp: std::env::temp_dir(),
        })
    }

    /// Resolve roots from config, detecting only what the config leaves unset
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        match (&config.document_root, &config.temp_root) {
            (Some(documents), Some(temp)) => Ok(Self {
                documents: documents.clone(),
                temp: temp.clone(),
            }),
            (Some(documents), None) => Ok(Self {
                documents: documents.clone(),
                temp: std::env::temp_dir(),
            }),
            (None, temp) => {
                let mut detected = Self::detect()?;
                if let Some(temp) = temp {
                    detected.temp = temp.clone();
                }
                Ok(detected)
            }
        }
    }
}

/// Fixed set of named directories used by the storage manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSet {
    pub root: PathBuf,
    pub books: PathBuf,
    pub database: PathBuf,
    pub preferences: PathBuf,
    pub cache: PathBuf,
    pub images: PathBuf,
    pub thumbnails: PathBuf,
    pub logs: PathBuf,
    pub backups: PathBuf,
    pub temp: PathBuf,
}

impl PathSet {
    /// Compute the layout; touches nothing on disk
    pub fn new(
        document_root: impl AsRef<Path>,
        temp_root: impl AsRef<Path>,
        app_namespace: &str,
        temp_namespace: &str,
    ) -> Self {
        let root = document_root.as_ref().join(app_namespace);
        let cache = root.join("cache");
        let database = root.join("database");

        Self {
            books: root.join("books"),
            preferences: root.join("preferences"),
            images: cache.join("images"),
            thumbnails: cache.join("thumbnails"),
            logs: root.join("logs"),
            backups: database.join("backups"),
            temp: temp_root.as_ref().join(temp_namespace),
            database,
            cache,
            root,
        }
    }

    /// Build the layout for the given roots and config namespaces
    pub fn from_roots(roots: &PlatformRoots, config: &StorageConfig) -> Self {
        Self::new(
            &roots.documents,
            &roots.temp,
            &config.app_namespace,
            &config.temp_namespace,
        )
    }

    /// All registry entries in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            ("root", self.root.as_path()),
            ("books", self.books.as_path()),
            ("database", self.database.as_path()),
            ("preferences", self.preferences.as_path()),
            ("cache", self.cache.as_path()),
            ("images", self.images.as_path()),
            ("thumbnails", self.thumbnails.as_path()),
            ("logs", self.logs.as_path()),
            ("backups", self.backups.as_path()),
            ("temp", self.temp.as_path()),
        ]
        .into_iter()
    }

    /// Look up a registry entry by name
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }
}
