//! Listing and diagnostic results

use crate::paths::PathSet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A book directory found under the books root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    /// Directory name, used as the book id
    pub id: String,

    /// Absolute path of the book directory
    pub path: PathBuf,
}

/// Storage summary
#[derive(Debug, Clone, Serialize)]
pub struct StorageInfo {
    pub app_root: PathBuf,

    /// Number of top-level entries under the app root
    pub total_items: usize,

    /// Number of book directories
    pub total_books: usize,

    pub paths: PathSet,
}

/// Cache size accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheUsage {
    /// Total bytes of all files under the cache root
    pub bytes: u64,

    /// Number of files under the cache root
    pub files: usize,

    /// Configured soft limit in bytes
    pub limit_bytes: u64,
}

impl CacheUsage {
    pub fn exceeds_limit(&self) -> bool {
        self.bytes > self.limit_bytes
    }
}

/// A database backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_usage_limit() {
        let usage = CacheUsage {
            bytes: 11,
            files: 2,
            limit_bytes: 10,
        };
        assert!(usage.exceeds_limit());
        assert!(!CacheUsage { bytes: 10, ..usage }.exceeds_limit());
    }
}
