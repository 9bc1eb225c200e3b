//! Note model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::coerce;
use super::{EntityId, SyncEntity};
use crate::error::Error;

/// Upper bound on live notes kept locally
pub const MAX_NOTES: usize = 1000;
/// Upper bound on note content length, in characters
pub const MAX_NOTE_CONTENT_LENGTH: usize = 5000;

/// Fixed set of note categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    /// Ideas worth keeping
    Inspiration,
    /// Things to do
    Todo,
    /// Personal principles
    Principle,
    /// Everything else
    #[default]
    Other,
}

impl NoteCategory {
    /// All categories in display order
    pub const ALL: [Self; 4] = [Self::Inspiration, Self::Todo, Self::Principle, Self::Other];

    /// Wire and storage name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inspiration => "inspiration",
            Self::Todo => "todo",
            Self::Principle => "principle",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inspiration => "Inspiration",
            Self::Todo => "Todo",
            Self::Principle => "Principle",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| Error::Validation(format!("invalid note category: {s}")))
    }
}

/// A captured snippet of web text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: EntityId,
    /// Captured text
    pub content: String,
    /// Category the note was filed under
    pub category: NoteCategory,
    /// Page the text was captured from
    #[serde(default, deserialize_with = "coerce::text")]
    pub source_url: String,
    /// Title of the page the text was captured from
    #[serde(default, deserialize_with = "coerce::text")]
    pub source_title: String,
    /// Creation timestamp (Unix ms)
    #[serde(default, deserialize_with = "coerce::timestamp")]
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    #[serde(default, deserialize_with = "coerce::timestamp")]
    pub updated_at: i64,
    /// Soft delete flag for sync
    #[serde(
        default,
        deserialize_with = "coerce::flag",
        skip_serializing_if = "coerce::is_false"
    )]
    pub deleted: bool,
    /// Tombstone timestamp (Unix ms)
    #[serde(
        default,
        deserialize_with = "coerce::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<i64>,
}

impl Note {
    /// Create a new note stamped with the current time
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        category: NoteCategory,
        source_url: impl Into<String>,
        source_title: impl Into<String>,
    ) -> Self {
        Self::new_at(
            content,
            category,
            source_url,
            source_title,
            crate::util::now_millis(),
        )
    }

    /// Create a new note stamped with `now`
    #[must_use]
    pub fn new_at(
        content: impl Into<String>,
        category: NoteCategory,
        source_url: impl Into<String>,
        source_title: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            id: EntityId::new(),
            content: content.into().trim().to_string(),
            category,
            source_url: source_url.into().trim().to_string(),
            source_title: source_title.into().trim().to_string(),
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Get first line as title preview, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// Collect per-field validation messages; empty when the note is valid
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.id.as_str().trim().is_empty() {
            errors.push("note id cannot be empty".to_string());
        }
        let content = self.content.trim();
        if content.is_empty() {
            errors.push("note content cannot be empty".to_string());
        } else if content.chars().count() > MAX_NOTE_CONTENT_LENGTH {
            errors.push(format!(
                "note content cannot exceed {MAX_NOTE_CONTENT_LENGTH} characters"
            ));
        }
        errors
    }
}

impl SyncEntity for Note {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn deleted_at(&self) -> Option<i64> {
        self.deleted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_new() {
        let note = Note::new(
            "  Hello world  ",
            NoteCategory::Todo,
            "https://example.com",
            " Example ",
        );
        assert_eq!(note.content, "Hello world");
        assert_eq!(note.source_title, "Example");
        assert!(!note.deleted);
        assert!(note.created_at > 0);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("todo".parse::<NoteCategory>().unwrap(), NoteCategory::Todo);
        assert_eq!(
            " Inspiration ".parse::<NoteCategory>().unwrap(),
            NoteCategory::Inspiration
        );
        assert!("later".parse::<NoteCategory>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_and_oversized_content() {
        let empty = Note::new_at("   ", NoteCategory::Other, "", "", 1);
        assert_eq!(empty.validate(), vec!["note content cannot be empty"]);

        let long = Note::new_at(
            "x".repeat(MAX_NOTE_CONTENT_LENGTH + 1),
            NoteCategory::Other,
            "",
            "",
            1,
        );
        assert_eq!(long.validate().len(), 1);

        let ok = Note::new_at("fine", NoteCategory::Other, "", "", 1);
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn test_null_source_fields_read_as_empty() {
        let note: Note = serde_json::from_str(
            r#"{"id":"n1","content":"hi","category":"todo","sourceUrl":null,"sourceTitle":null,"createdAt":1,"updatedAt":2}"#,
        )
        .unwrap();
        assert_eq!(note.source_url, "");
        assert_eq!(note.source_title, "");
        assert_eq!(note.updated_at, 2);
    }

    #[test]
    fn test_wire_format_is_camel_case_without_live_tombstone_fields() {
        let mut note = Note::new_at("hi", NoteCategory::Principle, "https://a.b", "A", 100);
        note.id = EntityId::from("n1");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["sourceUrl"], "https://a.b");
        assert_eq!(json["createdAt"], 100);
        assert_eq!(json["category"], "principle");
        assert!(json.get("deleted").is_none());
        assert!(json.get("deletedAt").is_none());
    }

    #[test]
    fn test_reads_tombstone_from_wire() {
        let note: Note = serde_json::from_str(
            r#"{"id":"n1","content":"x","category":"todo","sourceUrl":"","sourceTitle":"",
                "createdAt":1,"updatedAt":2,"deleted":true,"deletedAt":2}"#,
        )
        .unwrap();
        assert!(note.is_deleted());
        assert_eq!(note.deleted_at, Some(2));
    }

    #[test]
    fn test_title_preview() {
        let note = Note::new("First line\nSecond line", NoteCategory::Other, "", "");
        assert_eq!(note.title_preview(50), "First line");
        assert_eq!(note.title_preview(5), "First");
    }
}
