//! Palette data model: commands, groups, shortcut hints.

use serde::{Deserialize, Serialize};

/// One executable entry in the palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra search terms, never rendered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Display-only key tokens, e.g. `["Ctrl", "S"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcut: Vec<String>,
    /// Visible in the list but never confirmable.
    #[serde(default)]
    pub disabled: bool,
}

impl Command {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            keywords: Vec::new(),
            group_id: None,
            shortcut: Vec::new(),
            disabled: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| (*k).to_string()).collect();
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_shortcut(mut self, keys: &[&str]) -> Self {
        self.shortcut = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Shortcut tokens joined for display (`Ctrl+S`), or `None` when unset.
    pub fn shortcut_hint(&self) -> Option<String> {
        if self.shortcut.is_empty() {
            None
        } else {
            Some(self.shortcut.join("+"))
        }
    }
}

/// Named bucket commands are listed under when no query is active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
}

impl Group {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Direction for selection movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{"id":"save","label":"Save File","groupId":"file","shortcut":["Ctrl","S"]}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.group_id.as_deref(), Some("file"));
        assert_eq!(cmd.shortcut_hint().as_deref(), Some("Ctrl+S"));
        assert!(!cmd.disabled);
        assert!(cmd.keywords.is_empty());
        assert!(cmd.description.is_none());
    }

    #[test]
    fn shortcut_hint_absent_without_tokens() {
        assert_eq!(Command::new("a", "Alpha").shortcut_hint(), None);
    }
}
