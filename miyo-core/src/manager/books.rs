//! Per-book directories: `books/<book_id>/{content.epub, metadata.json}`

use super::{decode_base64, encode_base64, validate_segment, StorageManager};
use crate::error::{StorageError, StorageResult};
use crate::types::BookEntry;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// File name used for book content when the caller does not pick one
pub const DEFAULT_BOOK_FILE: &str = "content.epub";

/// Metadata file inside each book directory
pub const METADATA_FILE: &str = "metadata.json";

impl StorageManager {
    fn book_dir(&self, book_id: &str) -> StorageResult<PathBuf> {
        let book_id = validate_segment("book id", book_id)?;
        Ok(self.paths.books.join(book_id))
    }

    fn book_file(&self, book_id: &str, file_name: Option<&str>) -> StorageResult<PathBuf> {
        let file_name = validate_segment("file name", file_name.unwrap_or(DEFAULT_BOOK_FILE))?;
        Ok(self.book_dir(book_id)?.join(file_name))
    }

    /// Write base64 `data` to `books/<book_id>/<file_name>`, returning the path
    pub async fn save_book(
        &self,
        book_id: &str,
        data: &str,
        file_name: Option<&str>,
    ) -> StorageResult<PathBuf> {
        self.observe("save_book", async {
            self.ensure_ready()?;
            let path = self.book_file(book_id, file_name)?;
            let bytes = decode_base64(book_id, data)?;

            self.ensure_dir(&self.book_dir(book_id)?).await?;
            self.write_file(&path, &bytes).await?;
            Ok(path)
        })
        .await
    }

    /// Read a book file as base64
    ///
    /// The whole file is buffered in memory.
    pub async fn read_book(&self, book_id: &str, file_name: Option<&str>) -> StorageResult<String> {
        self.observe("read_book", async {
            self.ensure_ready()?;
            let path = self.book_file(book_id, file_name)?;
            match self.read_file(&path).await? {
                Some(bytes) => Ok(encode_base64(&bytes)),
                None => Err(StorageError::FileNotFound(path)),
            }
        })
        .await
    }

    /// Save a book's metadata as pretty-printed JSON
    pub async fn save_book_metadata<T: Serialize + ?Sized>(
        &self,
        book_id: &str,
        metadata: &T,
    ) -> StorageResult<PathBuf> {
        self.observe("save_book_metadata", async {
            self.ensure_ready()?;
            let dir = self.book_dir(book_id)?;
            let path = dir.join(METADATA_FILE);

            self.ensure_dir(&dir).await?;
            self.write_json(&path, metadata).await?;
            Ok(path)
        })
        .await
    }

    /// Read a book's metadata; `None` when none has been saved
    pub async fn read_book_metadata<T: DeserializeOwned>(
        &self,
        book_id: &str,
    ) -> StorageResult<Option<T>> {
        self.observe("read_book_metadata", async {
            self.ensure_ready()?;
            let path = self.book_dir(book_id)?.join(METADATA_FILE);
            self.read_json(&path).await
        })
        .await
    }

    /// Remove a book directory and everything in it; missing books are ignored
    pub async fn delete_book(&self, book_id: &str) -> StorageResult<()> {
        self.observe("delete_book", async {
            self.ensure_ready()?;
            let dir = self.book_dir(book_id)?;
            if self.path_exists(&dir).await? {
                self.remove_path(&dir).await?;
                tracing::info!("Deleted book: {}", book_id);
            }
            Ok(())
        })
        .await
    }

    /// List book directories
    ///
    /// Failures are returned rather than hidden; a library view that prefers
    /// an empty list can use `unwrap_or_default()`.
    pub async fn list_books(&self) -> StorageResult<Vec<BookEntry>> {
        let result = self
            .observe("list_books", async {
                self.ensure_ready()?;
                let entries = self.list_dir(&self.paths.books).await?;
                Ok(entries
                    .into_iter()
                    .map(|entry| BookEntry {
                        id: entry.name,
                        path: entry.path,
                    })
                    .collect::<Vec<_>>())
            })
            .await;

        if let Err(e) = &result {
            tracing::warn!("Failed to list books: {}", e);
        }
        result
    }
}
