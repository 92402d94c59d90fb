//! Storage setup, diagnostics and backups

use anyhow::{Context, Result};
use miyo_core::StorageManager;

/// Report the initialized storage root
pub fn init(storage: &StorageManager) -> Result<()> {
    println!("Storage initialized at {}", storage.paths().root.display());
    Ok(())
}

/// Display storage information
pub async fn info(storage: &StorageManager, json: bool) -> Result<()> {
    let info = storage
        .storage_info()
        .await
        .context("Failed to read storage info")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("App root:    {}", info.app_root.display());
        println!("Items:       {}", info.total_items);
        println!("Books:       {}", info.total_books);
        let config = storage.config();
        println!(
            "Cache:       {} MB limit, cleanup every {} days, max age {} days",
            config.max_cache_size_mb, config.cache_cleanup_interval_days, config.cache_max_age_days
        );
        println!("Log files:   {} retained", config.max_log_files);
        for (name, path) in info.paths.iter() {
            println!("  {:<12} {}", name, path.display());
        }
    }

    Ok(())
}

/// Back up the database file
pub async fn backup(storage: &StorageManager, database: Option<&str>) -> Result<()> {
    match storage
        .backup_database(database)
        .await
        .context("Failed to back up database")?
    {
        Some(path) => println!("Database backed up to {}", path.display()),
        None => println!("No database to back up"),
    }
    Ok(())
}

/// List database backups, newest first
pub async fn backups(storage: &StorageManager) -> Result<()> {
    let backups = storage
        .list_backups()
        .await
        .context("Failed to list backups")?;

    if backups.is_empty() {
        println!("No backups");
    }
    for backup in backups {
        println!(
            "{}  {:>10} bytes  {}",
            backup.modified.format("%Y-%m-%d %H:%M:%S"),
            backup.size,
            backup.name
        );
    }
    Ok(())
}
