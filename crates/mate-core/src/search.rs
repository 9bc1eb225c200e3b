//! Case-insensitive substring search over notes and prompts.

use crate::models::{Note, Prompt};

/// Notes whose content or source title contains `query`.
///
/// A blank query matches everything.
pub fn search_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let Some(needle) = needle(query) else {
        return notes.to_vec();
    };
    notes
        .iter()
        .filter(|note| contains(&note.content, &needle) || contains(&note.source_title, &needle))
        .cloned()
        .collect()
}

/// Prompts whose key, title, content, or description contains `query`.
///
/// A blank query matches everything.
pub fn search_prompts(prompts: &[Prompt], query: &str) -> Vec<Prompt> {
    let Some(needle) = needle(query) else {
        return prompts.to_vec();
    };
    prompts
        .iter()
        .filter(|prompt| {
            contains(&prompt.key, &needle)
                || contains(&prompt.title, &needle)
                || contains(&prompt.content, &needle)
                || prompt
                    .description
                    .as_deref()
                    .is_some_and(|description| contains(description, &needle))
        })
        .cloned()
        .collect()
}

fn needle(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
