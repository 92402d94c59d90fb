//! Namespaced cache files under `cache/[<subdir>/]<file_name>`

use super::{decode_base64, encode_base64, validate_relative, validate_segment, StorageManager};
use crate::error::StorageResult;
use crate::storage::DirEntry;
use crate::types::CacheUsage;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

impl StorageManager {
    fn cache_dir(&self, subdir: Option<&str>) -> StorageResult<PathBuf> {
        match subdir.filter(|s| !s.is_empty()) {
            Some(subdir) => Ok(self
                .paths
                .cache
                .join(validate_relative("cache subdirectory", subdir)?)),
            None => Ok(self.paths.cache.clone()),
        }
    }

    fn cache_file(&self, file_name: &str, subdir: Option<&str>) -> StorageResult<PathBuf> {
        let file_name = validate_segment("cache file name", file_name)?;
        Ok(self.cache_dir(subdir)?.join(file_name))
    }

    fn is_reserved_cache_dir(&self, path: &Path) -> bool {
        path == self.paths.images || path == self.paths.thumbnails
    }

    /// Write base64 `data` into the cache, returning the file path
    pub async fn save_cache_file(
        &self,
        file_name: &str,
        data: &str,
        subdir: Option<&str>,
    ) -> StorageResult<PathBuf> {
        self.observe("save_cache_file", async {
            self.ensure_ready()?;
            let path = self.cache_file(file_name, subdir)?;
            let bytes = decode_base64(file_name, data)?;

            self.ensure_dir(&self.cache_dir(subdir)?).await?;
            self.write_file(&path, &bytes).await?;
            Ok(path)
        })
        .await
    }

    /// Read a cache file as base64; a miss is `None`
    pub async fn read_cache_file(
        &self,
        file_name: &str,
        subdir: Option<&str>,
    ) -> StorageResult<Option<String>> {
        self.observe("read_cache_file", async {
            self.ensure_ready()?;
            let path = self.cache_file(file_name, subdir)?;
            Ok(self.read_file(&path).await?.map(|bytes| encode_base64(&bytes)))
        })
        .await
    }

    /// Delete everything under the cache root, subdirectories included
    ///
    /// The reserved `images` and `thumbnails` directories are recreated empty.
    pub async fn clear_cache(&self) -> StorageResult<()> {
        self.observe("clear_cache", async {
            self.ensure_ready()?;
            for entry in self.list_dir(&self.paths.cache).await? {
                self.remove_path(&entry.path).await?;
            }
            self.restore_reserved_cache_dirs().await?;
            tracing::info!("Cache cleared");
            Ok(())
        })
        .await
    }

    /// Delete cache entries whose modification time is older than `max_age_days`
    ///
    /// Age is measured from the last write, not the last read. Top-level
    /// entries are removed whole; the reserved `images` and `thumbnails`
    /// directories are kept and their direct entries are aged individually.
    /// Uses the configured default when `max_age_days` is `None`. Returns the
    /// number of entries deleted.
    pub async fn cleanup_old_cache(&self, max_age_days: Option<u32>) -> StorageResult<usize> {
        self.observe("cleanup_old_cache", async {
            self.ensure_ready()?;
            let days = max_age_days.unwrap_or(self.config.cache_max_age_days);
            let max_age = Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
            let now = SystemTime::now();

            let mut deleted = 0;
            for entry in self.list_dir(&self.paths.cache).await? {
                if entry.is_dir && self.is_reserved_cache_dir(&entry.path) {
                    for inner in self.list_dir(&entry.path).await? {
                        deleted += self.evict_if_older(&inner, now, max_age).await?;
                    }
                } else {
                    deleted += self.evict_if_older(&entry, now, max_age).await?;
                }
            }

            tracing::info!("Cleanup: Deleted {} old cache files", deleted);
            Ok(deleted)
        })
        .await
    }

    async fn evict_if_older(
        &self,
        entry: &DirEntry,
        now: SystemTime,
        max_age: Duration,
    ) -> StorageResult<usize> {
        // Timestamps in the future count as brand new
        let age = now.duration_since(entry.modified).unwrap_or(Duration::ZERO);
        if age > max_age {
            self.remove_path(&entry.path).await?;
            tracing::debug!("Evicted {} (age {:?})", entry.path.display(), age);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    /// Total size of the cache, compared against the configured soft limit
    pub async fn cache_usage(&self) -> StorageResult<CacheUsage> {
        self.observe("cache_usage", async {
            self.ensure_ready()?;
            let mut bytes = 0;
            let mut files = 0;
            let mut pending = vec![self.paths.cache.clone()];

            while let Some(dir) = pending.pop() {
                for entry in self.list_dir(&dir).await? {
                    if entry.is_dir {
                        pending.push(entry.path);
                    } else {
                        bytes += entry.len;
                        files += 1;
                    }
                }
            }

            Ok(CacheUsage {
                bytes,
                files,
                limit_bytes: self.config.max_cache_size_bytes(),
            })
        })
        .await
    }
}
