//! User settings at `preferences/user-settings.json`
//!
//! Saves always replace the whole record; callers that update a single key
//! must read, modify and write it back themselves.

use super::StorageManager;
use crate::error::StorageResult;
use crate::types::UserPreferences;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

pub const PREFERENCES_FILE: &str = "user-settings.json";

impl StorageManager {
    pub fn preferences_path(&self) -> PathBuf {
        self.paths.preferences.join(PREFERENCES_FILE)
    }

    /// Overwrite the preferences file, returning its path
    pub async fn save_preferences<T: Serialize + ?Sized>(
        &self,
        preferences: &T,
    ) -> StorageResult<PathBuf> {
        self.observe("save_preferences", async {
            self.ensure_ready()?;
            let path = self.preferences_path();
            self.write_json(&path, preferences).await?;
            Ok(path)
        })
        .await
    }

    /// Read preferences; `None` on first run, an error if the file is corrupt
    pub async fn read_preferences<T: DeserializeOwned>(&self) -> StorageResult<Option<T>> {
        self.observe("read_preferences", async {
            self.ensure_ready()?;
            self.read_json(&self.preferences_path()).await
        })
        .await
    }

    /// Read typed preferences, falling back to defaults when none are saved
    pub async fn read_preferences_or_default(&self) -> StorageResult<UserPreferences> {
        Ok(self
            .read_preferences::<UserPreferences>()
            .await?
            .unwrap_or_default()
            .normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::manager::tests::manager_in;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        let first: Option<serde_json::Value> = manager.read_preferences().await.unwrap();
        assert!(first.is_none());

        let prefs = json!({ "themeId": "dark", "fontSize": 18, "nested": { "a": [1, 2] } });
        manager.save_preferences(&prefs).await.unwrap();
        let read: Option<serde_json::Value> = manager.read_preferences().await.unwrap();
        assert_eq!(read, Some(prefs));

        // Full overwrite, no merge
        manager.save_preferences(&json!({ "themeId": "sepia" })).await.unwrap();
        let read: serde_json::Value = manager.read_preferences().await.unwrap().unwrap();
        assert_eq!(read, json!({ "themeId": "sepia" }));
    }

    #[tokio::test]
    async fn test_corrupt_preferences_differs_from_absent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        std::fs::write(manager.preferences_path(), "{\"themeId\": ").unwrap();

        let err = manager
            .read_preferences::<serde_json::Value>()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::JsonParse { .. }));
        assert!(manager.read_preferences_or_default().await.is_err());
    }

    #[tokio::test]
    async fn test_typed_preferences_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);
        manager.initialize().await.unwrap();

        assert_eq!(
            manager.read_preferences_or_default().await.unwrap(),
            UserPreferences::default()
        );

        let mut prefs = UserPreferences::default();
        prefs.theme_id = "dark".to_string();
        manager.save_preferences(&prefs).await.unwrap();
        assert_eq!(
            manager.read_preferences_or_default().await.unwrap().theme_id,
            "dark"
        );
    }
}
