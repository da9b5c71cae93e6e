//! Host-facing options and the catalogue document format.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalogue::Catalogue;
use crate::error::PaletteError;
use crate::state::{Command, Group};

pub const DEFAULT_PLACEHOLDER: &str = "Type a command or search...";
pub const DEFAULT_EMPTY_STATE: &str = "No matching commands";
/// Catalogues at least this large are ranked off the UI thread.
pub const DEFAULT_BACKGROUND_THRESHOLD: usize = 2000;

/// Presentation options. Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaletteConfig {
    pub placeholder_text: String,
    pub empty_state_text: String,
    pub show_shortcut_hints: bool,
    pub background_threshold: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            placeholder_text: DEFAULT_PLACEHOLDER.to_string(),
            empty_state_text: DEFAULT_EMPTY_STATE.to_string(),
            show_shortcut_hints: true,
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
        }
    }
}

/// JSON form of everything a host supplies when opening the palette.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueFile {
    #[serde(default)]
    pub config: PaletteConfig,
    #[serde(default)]
    pub groups: Vec<Group>,
    pub commands: Vec<Command>,
    #[serde(default)]
    pub recent_command_ids: Vec<String>,
}

impl CatalogueFile {
    pub fn from_json(text: &str) -> Result<Self, PaletteError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self, PaletteError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Split into the normalized catalogue, the recents and the options.
    pub fn into_parts(self) -> (Arc<Catalogue>, Vec<String>, PaletteConfig) {
        let catalogue = Catalogue::load(self.commands, self.groups);
        (Arc::new(catalogue), self.recent_command_ids, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let file = CatalogueFile::from_json(r#"{"commands":[{"id":"a","label":"Alpha"}]}"#).unwrap();
        assert_eq!(file.config, PaletteConfig::default());
        assert!(file.config.show_shortcut_hints);
        assert!(file.groups.is_empty());
        assert!(file.recent_command_ids.is_empty());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let file = CatalogueFile::from_json(
            r#"{
                "config": {"emptyStateText": "Nothing here", "showShortcutHints": false},
                "groups": [{"id": "g", "label": "General"}],
                "commands": [{"id": "a", "label": "Alpha", "groupId": "g"}],
                "recentCommandIds": ["a"]
            }"#,
        )
        .unwrap();
        assert_eq!(file.config.empty_state_text, "Nothing here");
        assert!(!file.config.show_shortcut_hints);
        assert_eq!(file.config.placeholder_text, DEFAULT_PLACEHOLDER);
        let (catalogue, recents, _) = file.into_parts();
        assert_eq!(catalogue.group_position(0), Some(0));
        assert_eq!(recents, vec!["a".to_string()]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = CatalogueFile::from_json("{not json").unwrap_err();
        assert!(matches!(err, PaletteError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CatalogueFile::read(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, PaletteError::Io(_)));
    }
}
