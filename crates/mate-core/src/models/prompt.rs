//! Prompt model

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::coerce;
use super::{EntityId, SyncEntity};

/// Upper bound on live prompts kept locally
pub const MAX_PROMPTS: usize = 100;
/// Upper bound on prompt content length, in characters
pub const MAX_PROMPT_CONTENT_LENGTH: usize = 2000;

static PROMPT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid regex"));

/// Check whether `key` is a valid prompt trigger key: `[a-zA-Z0-9_-]+`
///
/// # Examples
///
/// ```
/// use mate_core::models::is_valid_prompt_key;
///
/// assert!(is_valid_prompt_key("daily_standup-2"));
/// assert!(!is_valid_prompt_key("has space"));
/// ```
#[must_use]
pub fn is_valid_prompt_key(key: &str) -> bool {
    PROMPT_KEY_RE.is_match(key)
}

/// A reusable text snippet looked up by its trigger key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier
    pub id: EntityId,
    /// Trigger key, unique among live prompts
    pub key: String,
    /// Display title
    pub title: String,
    /// Text inserted when the prompt is expanded
    pub content: String,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
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

impl Prompt {
    /// Create a new prompt stamped with the current time
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self::new_at(key, title, content, description, crate::util::now_millis())
    }

    /// Create a new prompt stamped with `now`
    #[must_use]
    pub fn new_at(
        key: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        description: Option<String>,
        now: i64,
    ) -> Self {
        Self {
            id: EntityId::new(),
            key: key.into().trim().to_string(),
            title: title.into().trim().to_string(),
            content: content.into().trim().to_string(),
            description: crate::util::normalize_text_option(description),
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Collect per-field validation messages; empty when the prompt is valid
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.id.as_str().trim().is_empty() {
            errors.push("prompt id cannot be empty".to_string());
        }
        if self.key.trim().is_empty() {
            errors.push("prompt key cannot be empty".to_string());
        } else if !is_valid_prompt_key(&self.key) {
            errors.push(
                "prompt key may only contain letters, digits, underscores and hyphens".to_string(),
            );
        }
        if self.title.trim().is_empty() {
            errors.push("prompt title cannot be empty".to_string());
        }
        let content = self.content.trim();
        if content.is_empty() {
            errors.push("prompt content cannot be empty".to_string());
        } else if content.chars().count() > MAX_PROMPT_CONTENT_LENGTH {
            errors.push(format!(
                "prompt content cannot exceed {MAX_PROMPT_CONTENT_LENGTH} characters"
            ));
        }
        errors
    }
}

impl SyncEntity for Prompt {
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
    fn test_prompt_key_pattern() {
        assert!(is_valid_prompt_key("abc"));
        assert!(is_valid_prompt_key("A-1_b"));
        assert!(!is_valid_prompt_key(""));
        assert!(!is_valid_prompt_key("a b"));
        assert!(!is_valid_prompt_key("ключ"));
        assert!(!is_valid_prompt_key("a/b"));
    }

    #[test]
    fn test_prompt_new_trims_and_drops_blank_description() {
        let prompt = Prompt::new(" greet ", " Greeting ", " Hello! ", Some("   ".to_string()));
        assert_eq!(prompt.key, "greet");
        assert_eq!(prompt.title, "Greeting");
        assert_eq!(prompt.content, "Hello!");
        assert_eq!(prompt.description, None);
        assert_eq!(prompt.created_at, prompt.updated_at);
    }

    #[test]
    fn test_validate_collects_all_messages() {
        let prompt = Prompt::new_at("bad key", "", "", None, 1);
        let errors = prompt.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("letters, digits"));
    }
}
