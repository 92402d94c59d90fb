//! Typed records persisted or reported by the storage manager

mod listing;
mod preferences;

pub use listing::{BackupEntry, BookEntry, CacheUsage, StorageInfo};
pub use preferences::{
    UserPreferences, MAX_FONT_SIZE, MAX_LINE_HEIGHT, MIN_FONT_SIZE, MIN_LINE_HEIGHT,
};
