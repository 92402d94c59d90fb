//! Storage configuration
//!
//! Values come from built-in defaults, then an optional JSON file, then
//! `MIYO_*` environment variables.

use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory name for the app root under the document directory
pub const DEFAULT_APP_NAMESPACE: &str = "MiyoReader";

/// Default directory name for scratch space under the platform temp directory
pub const DEFAULT_TEMP_NAMESPACE: &str = "Miyo";

/// Default database file name used by backups
pub const DEFAULT_DATABASE_FILE: &str = "miyo.db";

/// Environment variable overriding the persistent document root
pub const ENV_DOCUMENT_DIR: &str = "MIYO_DOCUMENT_DIR";

/// Environment variable overriding the temporary root
pub const ENV_TEMP_DIR: &str = "MIYO_TEMP_DIR";

/// Environment variable overriding the default cache expiry
pub const ENV_CACHE_MAX_AGE_DAYS: &str = "MIYO_CACHE_MAX_AGE_DAYS";

/// Configuration for a storage manager instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persistent document root; the platform data directory when unset
    pub document_root: Option<PathBuf>,

    /// Temporary root; the OS temp directory when unset
    pub temp_root: Option<PathBuf>,

    /// Directory name of the app root inside the document root
    pub app_namespace: String,

    /// Directory name of the scratch area inside the temp root
    pub temp_namespace: String,

    /// Soft cache size limit in megabytes (reported, never enforced)
    pub max_cache_size_mb: u64,

    /// Suggested interval between cache cleanups
    pub cache_cleanup_interval_days: u32,

    /// Default expiry used by cache cleanup
    pub cache_max_age_days: u32,

    /// Database file name backed up by default
    pub database_file: String,

    /// Number of log files the logs directory is expected to retain
    pub max_log_files: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_root: None,
            temp_root: None,
            app_namespace: DEFAULT_APP_NAMESPACE.to_string(),
            temp_namespace: DEFAULT_TEMP_NAMESPACE.to_string(),
            max_cache_size_mb: 500,
            cache_cleanup_interval_days: 7,
            cache_max_age_days: 30,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            max_log_files: 10,
        }
    }
}

impl StorageConfig {
    /// Load configuration from a JSON file, falling back to defaults for
    /// missing keys
    pub fn from_file(path: &Path) -> StorageResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| StorageError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| StorageError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply `MIYO_*` environment overrides
    pub fn with_env_overrides(self) -> StorageResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> StorageResult<Self> {
        if let Some(dir) = lookup(ENV_DOCUMENT_DIR).filter(|v| !v.is_empty()) {
            self.document_root = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(ENV_TEMP_DIR).filter(|v| !v.is_empty()) {
            self.temp_root = Some(PathBuf::from(dir));
        }
        if let Some(days) = lookup(ENV_CACHE_MAX_AGE_DAYS) {
            self.cache_max_age_days = days.trim().parse().map_err(|_| {
                StorageError::Config(format!(
                    "{} must be a number, got '{}'",
                    ENV_CACHE_MAX_AGE_DAYS, days
                ))
            })?;
        }
        Ok(self)
    }

    /// Set the document root
    pub fn with_document_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_root = Some(path.into());
        self
    }

    /// Set the temporary root
    pub fn with_temp_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(path.into());
        self
    }

    /// Soft cache limit in bytes
    pub fn max_cache_size_bytes(&self) -> u64 {
        self.max_cache_size_mb * 1024 * 1024
    }
}
