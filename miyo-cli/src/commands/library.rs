//! Book import, export and listing

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use indicatif::{ProgressBar, ProgressStyle};
use miyo_core::StorageManager;
use std::path::Path;
use std::time::Duration;

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Import a book file (and optional metadata) into the library
pub async fn import(
    storage: &StorageManager,
    input: &Path,
    id: &str,
    file_name: Option<&str>,
    metadata: Option<&Path>,
) -> Result<()> {
    let pb = spinner();

    pb.set_message("Reading input file...");
    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    // Parse metadata before writing anything so a bad file leaves no half import
    let metadata = match metadata {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to open metadata file: {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            Some(value)
        }
        None => None,
    };

    pb.set_message("Saving book...");
    let path = storage
        .save_book(id, &STANDARD.encode(&data), file_name)
        .await
        .with_context(|| format!("Failed to save book {}", id))?;

    if let Some(metadata) = metadata {
        storage
            .save_book_metadata(id, &metadata)
            .await
            .with_context(|| format!("Failed to save metadata for {}", id))?;
    }

    tracing::info!("Imported {} ({} bytes)", id, data.len());
    pb.finish_and_clear();
    println!("Imported '{}' -> {}", id, path.display());

    Ok(())
}

/// Write a stored book file out to disk
pub async fn export(
    storage: &StorageManager,
    id: &str,
    output: &Path,
    file_name: Option<&str>,
) -> Result<()> {
    let pb = spinner();

    pb.set_message("Reading book...");
    let encoded = storage
        .read_book(id, file_name)
        .await
        .with_context(|| format!("Failed to read book {}", id))?;
    let data = STANDARD
        .decode(encoded)
        .context("Stored book content is not valid base64")?;

    pb.set_message("Writing output...");
    tokio::fs::write(output, &data)
        .await
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    pb.finish_and_clear();
    println!("Exported '{}' -> {}", id, output.display());

    Ok(())
}

/// List books in the library
pub async fn list(storage: &StorageManager, json: bool) -> Result<()> {
    let books = storage.list_books().await.context("Failed to list books")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
    } else if books.is_empty() {
        println!("No books in library");
    } else {
        for book in &books {
            println!("{:<24} {}", book.id, book.path.display());
        }
    }

    Ok(())
}

/// Delete a book
pub async fn remove(storage: &StorageManager, id: &str) -> Result<()> {
    storage
        .delete_book(id)
        .await
        .with_context(|| format!("Failed to delete book {}", id))?;
    println!("Removed '{}'", id);
    Ok(())
}

/// Print a book's metadata as JSON
pub async fn metadata(storage: &StorageManager, id: &str) -> Result<()> {
    match storage
        .read_book_metadata::<serde_json::Value>(id)
        .await
        .with_context(|| format!("Failed to read metadata for {}", id))?
    {
        Some(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            Ok(())
        }
        None => bail!("No metadata stored for '{}'", id),
    }
}
