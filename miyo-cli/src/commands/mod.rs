//! CLI command implementations

mod cache;
mod library;
mod maintenance;
mod prefs;

pub use cache::{cache_cleanup, cache_clear, cache_usage};
pub use library::{export, import, list, metadata, remove};
pub use maintenance::{backup, backups, info, init};
pub use prefs::{parse_assignment, prefs};

use anyhow::{Context, Result};
use miyo_core::{StorageConfig, StorageManager};
use std::path::Path;

/// Build the storage manager from config file, environment and flags, then
/// make sure the directory tree exists
pub async fn open_storage(
    config_file: Option<&Path>,
    root: Option<&Path>,
    temp_dir: Option<&Path>,
) -> Result<StorageManager> {
    let mut config = match config_file {
        Some(path) => StorageConfig::from_file(path)?,
        None => StorageConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(root) = root {
        config = config.with_document_root(root);
    }
    if let Some(temp_dir) = temp_dir {
        config = config.with_temp_root(temp_dir);
    }

    StorageManager::open(config)
        .await
        .context("Failed to initialize storage")
}
