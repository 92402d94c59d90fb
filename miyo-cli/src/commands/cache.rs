//! Cache maintenance commands

use anyhow::{Context, Result};
use miyo_core::StorageManager;

/// Delete everything in the cache
pub async fn cache_clear(storage: &StorageManager) -> Result<()> {
    storage.clear_cache().await.context("Failed to clear cache")?;
    println!("Cache cleared");
    Ok(())
}

/// Delete cache entries older than `max_age_days`
pub async fn cache_cleanup(storage: &StorageManager, max_age_days: Option<u32>) -> Result<()> {
    let days = max_age_days.unwrap_or(storage.config().cache_max_age_days);
    let deleted = storage
        .cleanup_old_cache(Some(days))
        .await
        .context("Failed to clean up cache")?;
    println!("Deleted {} cache entries older than {} days", deleted, days);
    Ok(())
}

/// Print cache size against the configured limit
pub async fn cache_usage(storage: &StorageManager) -> Result<()> {
    let usage = storage.cache_usage().await.context("Failed to measure cache")?;
    println!(
        "Cache: {} files, {:.1} MB of {} MB",
        usage.files,
        usage.bytes as f64 / (1024.0 * 1024.0),
        storage.config().max_cache_size_mb
    );
    if usage.exceeds_limit() {
        println!("Cache exceeds its configured size; consider `miyo cache cleanup`");
    }
    Ok(())
}
