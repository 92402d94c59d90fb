//! User settings stored in `preferences/user-settings.json`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 32;
pub const MIN_LINE_HEIGHT: f32 = 1.2;
pub const MAX_LINE_HEIGHT: f32 = 2.0;

/// Reader preferences with first-run defaults
///
/// Keys this type does not know about are kept in `extra` so a save never
/// drops settings written by a newer app version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme_id: String,
    pub font_size: u32,
    pub line_height: f32,
    pub font_family: String,
    pub use_system_theme: bool,
    pub auto_backup: bool,
    pub keep_screen_on: bool,
    pub language: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme_id: "light".to_string(),
            font_size: 16,
            line_height: 1.5,
            font_family: "System".to_string(),
            use_system_theme: false,
            auto_backup: true,
            keep_screen_on: false,
            language: "en".to_string(),
            extra: Map::new(),
        }
    }
}

impl UserPreferences {
    /// Clamp reading settings into their supported ranges
    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.line_height = if self.line_height.is_finite() {
            self.line_height.clamp(MIN_LINE_HEIGHT, MAX_LINE_HEIGHT)
        } else {
            Self::default().line_height
        };
        self
    }
}
