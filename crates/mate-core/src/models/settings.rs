//! Application settings model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::NoteCategory;

/// Keyboard shortcuts bound by the capture surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortcutConfig {
    pub save_to_inspiration: String,
    pub save_to_todo: String,
    pub save_to_principle: String,
    pub save_to_other: String,
    pub save_clipboard_to_other: String,
    /// Text pattern that opens the prompt picker
    pub prompt_trigger: String,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            save_to_inspiration: "Alt+Q".to_string(),
            save_to_todo: "Alt+W".to_string(),
            save_to_principle: "Alt+A".to_string(),
            save_to_other: "Alt+S".to_string(),
            save_clipboard_to_other: "Alt+C".to_string(),
            prompt_trigger: "/'".to_string(),
        }
    }
}

/// Application settings
///
/// Settings travel with every sync snapshot and are replaced wholesale by the
/// last writer. Fields this version does not know about are kept in `extra`
/// so a newer peer's settings survive a round-trip through an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Category preselected when capturing
    pub default_category: NoteCategory,
    /// Whether capture confirmations are shown
    pub enable_notifications: bool,
    /// Bound shortcuts
    pub shortcut_keys: ShortcutConfig,
    /// Unrecognised fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_category: NoteCategory::Other,
            enable_notifications: true,
            shortcut_keys: ShortcutConfig::default(),
            extra: Map::new(),
        }
    }
}
