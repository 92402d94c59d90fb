//! Miyo Core Library
//!
//! File-level storage for the Miyo reader: a fixed directory layout under an
//! app-private root, per-book content and metadata, user preferences, a
//! namespaced cache with age-based eviction, and database backups.
//!
//! ```no_run
//! use miyo_core::{StorageConfig, StorageManager};
//!
//! # async fn example() -> miyo_core::StorageResult<()> {
//! let storage = StorageManager::open(StorageConfig::default()).await?;
//! storage.save_book("book-1", "UEsDBA==", None).await?;
//! let books = storage.list_books().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod paths;
pub mod report;
pub mod storage;
pub mod types;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use manager::StorageManager;
pub use paths::{PathSet, PlatformRoots};
pub use report::{ErrorRecord, ErrorSink, MemoryErrorSink, TracingErrorSink};
pub use storage::{LocalStorage, StorageProvider};
pub use types::{BackupEntry, BookEntry, CacheUsage, StorageInfo, UserPreferences};
