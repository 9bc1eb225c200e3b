//! Export helpers for live notes and prompts.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::{Note, Prompt, SyncSnapshot};

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// JSON export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub exported_at: i64,
    pub notes: Vec<&'a Note>,
    pub prompts: Vec<&'a Prompt>,
}

/// Render live entries of `snapshot` as pretty-printed JSON.
pub fn render_json_export(snapshot: &SyncSnapshot, exported_at: i64) -> serde_json::Result<String> {
    let document = ExportDocument {
        exported_at,
        notes: snapshot.notes.iter().filter(|note| !note.deleted).collect(),
        prompts: snapshot
            .prompts
            .iter()
            .filter(|prompt| !prompt.deleted)
            .collect(),
    };
    serde_json::to_string_pretty(&document)
}

/// Render live entries of `snapshot` as Markdown, one frontmatter block per
/// note and per prompt.
#[must_use]
pub fn render_markdown_export(snapshot: &SyncSnapshot) -> String {
    let mut output = String::new();

    let notes = snapshot.notes.iter().filter(|note| !note.deleted);
    for (index, note) in notes.enumerate() {
        if index > 0 {
            output.push('\n');
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", note.id);
        let _ = writeln!(output, "category: {}", note.category);
        if !note.source_url.is_empty() {
            let _ = writeln!(output, "source_url: {}", note.source_url);
        }
        if !note.source_title.is_empty() {
            let _ = writeln!(output, "source_title: {}", note.source_title);
        }
        let _ = writeln!(output, "created_at: {}", note.created_at);
        let _ = writeln!(output, "updated_at: {}", note.updated_at);
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        output.push_str(&note.content);
        output.push('\n');
    }

    let mut prompts = snapshot.prompts.iter().filter(|prompt| !prompt.deleted).peekable();
    if prompts.peek().is_some() {
        if !output.is_empty() {
            output.push('\n');
        }
        let _ = writeln!(output, "# Prompts");
        for prompt in prompts {
            let _ = writeln!(output);
            let _ = writeln!(output, "## {} (`{}`)", prompt.title, prompt.key);
            if let Some(description) = &prompt.description {
                let _ = writeln!(output);
                let _ = writeln!(output, "> {description}");
            }
            let _ = writeln!(output);
            output.push_str(&prompt.content);
            output.push('\n');
        }
    }

    output
}

/// Render `snapshot` in the selected format.
pub fn render_export(
    snapshot: &SyncSnapshot,
    format: ExportFormat,
    exported_at: i64,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(snapshot, exported_at),
        ExportFormat::Markdown => Ok(render_markdown_export(snapshot)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("mate-export-{timestamp_ms}.{}", format.extension())
}
