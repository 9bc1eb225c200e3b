use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mate_core::models::is_valid_prompt_key;
use mate_core::sync::SYNC_AREA;
use mate_core::util::truncate_text;
use mate_core::{LibSqlStore, Note, Prompt, SyncService, TombstoneStore};
use serde::Serialize;

use crate::commands::editor::Editor;
use crate::error::CliError;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Largest unit first; anything under a minute is "just now"
const AGE_UNITS: [(i64, &str); 6] = [
    (365 * DAY_MS, "y"),
    (30 * DAY_MS, "mo"),
    (7 * DAY_MS, "w"),
    (DAY_MS, "d"),
    (HOUR_MS, "h"),
    (MINUTE_MS, "m"),
];

/// Local stores opened from one database file
pub struct Workspace {
    pub store: TombstoneStore,
    pub sync: SyncService,
}

/// Open the note/prompt store and the sync service over the same database
pub async fn open_workspace(db_path: &Path) -> Result<Workspace, CliError> {
    let local = LibSqlStore::open(db_path).await?;
    let sync_area = local.area(SYNC_AREA);
    let store = TombstoneStore::new(Arc::new(local));
    let sync = SyncService::new(store.clone(), Arc::new(sync_area));
    Ok(Workspace { store, sync })
}

/// `--json` shape of a listed note
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub preview: String,
    pub age: String,
    #[serde(flatten)]
    pub note: Note,
}

impl NoteRow {
    pub fn new(note: &Note, now_ms: i64) -> Self {
        Self {
            preview: note_preview(note, 80),
            age: format_relative_time(note.updated_at, now_ms),
            note: note.clone(),
        }
    }
}

/// Live notes, newest first, optionally limited
pub fn newest_first(mut notes: Vec<Note>, limit: usize) -> Vec<Note> {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    notes.truncate(limit);
    notes
}

/// Find a live note by full id or by a unique id prefix
pub async fn resolve_note(query: &str, store: &TombstoneStore) -> Result<Note, CliError> {
    let notes = store.get_all_live_notes().await?;
    if let Some(exact) = notes.iter().find(|note| note.id.as_str() == query) {
        return Ok(exact.clone());
    }

    let mut candidates = notes
        .into_iter()
        .filter(|note| note.id.as_str().starts_with(query));
    let Some(first) = candidates.next() else {
        return Err(CliError::NoteNotFound(query.to_string()));
    };
    let others = candidates.take(2).collect::<Vec<_>>();
    if others.is_empty() {
        return Ok(first);
    }

    let listed = std::iter::once(&first)
        .chain(&others)
        .map(|note| short_id(note.id.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    Err(CliError::AmbiguousNoteId(format!(
        "'{query}' matches several notes: {listed}"
    )))
}

/// Find a live prompt by its trigger key
pub async fn resolve_prompt(key: &str, store: &TombstoneStore) -> Result<Prompt, CliError> {
    let key = normalize_prompt_key(key)?;
    store
        .get_prompt_by_key(&key)
        .await?
        .ok_or(CliError::PromptNotFound(key))
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn format_note_lines(notes: &[Note], now_ms: i64) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            format!(
                "{:<13}  {:<11}  {:<40}  {}",
                short_id(note.id.as_str()),
                note.category.as_str(),
                note_preview(note, 40),
                format_relative_time(note.updated_at, now_ms)
            )
        })
        .collect()
}

pub fn format_prompt_lines(prompts: &[Prompt]) -> Vec<String> {
    let key_width = prompts
        .iter()
        .map(|prompt| prompt.key.chars().count())
        .max()
        .unwrap_or(0);

    prompts
        .iter()
        .map(|prompt| {
            let title = truncate_text(&prompt.title, 40);
            format!("{:<key_width$}  {title}", prompt.key)
        })
        .collect()
}

/// First line with runs of whitespace collapsed
pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let headline = note
        .content
        .lines()
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    truncate_text(&headline, max_chars)
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    AGE_UNITS
        .iter()
        .find(|(span, _)| elapsed >= *span)
        .map_or_else(
            || "just now".to_string(),
            |(span, suffix)| format!("{}{suffix} ago", elapsed / span),
        )
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(moment) => moment.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp_ms.to_string(),
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Show only the first and last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 8 {
        return "*".repeat(count);
    }
    let head = secret.chars().take(4).collect::<String>();
    let tail = secret.chars().skip(count - 4).collect::<String>();
    format!("{head}...{tail}")
}

/// Trimmed text, or `None` when nothing but whitespace is left
pub fn normalize_content(content: &str) -> Option<String> {
    Some(content.trim())
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    normalize_content(id).ok_or(CliError::EmptyNoteId)
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    normalize_content(query).ok_or(CliError::EmptySearchQuery)
}

pub fn normalize_prompt_key(key: &str) -> Result<String, CliError> {
    let key = normalize_content(key).ok_or(CliError::EmptyPromptKey)?;
    if is_valid_prompt_key(&key) {
        Ok(key)
    } else {
        Err(CliError::Core(mate_core::Error::Validation(format!(
            "prompt key '{key}' may only contain letters, digits, '-' and '_'"
        ))))
    }
}

/// Content from arguments, then piped stdin, then the user's editor
pub fn resolve_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }
    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }
    Editor::from_env().edit("")?.ok_or(CliError::EmptyContent)
}

/// Whole of stdin when it is a pipe; `None` for an interactive terminal
pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let mut stdin = io::stdin().lock();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut piped = String::new();
    stdin.read_to_string(&mut piped)?;
    Ok(normalize_content(&piped))
}

/// `--db-path`, then `MATE_DB_PATH`, then the per-user data directory
pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("MATE_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_default()
                .join("mate")
                .join("mate.db")
        })
}

/// Write `rendered` to `output_path`, or to stdout when no path is given
pub fn write_output(rendered: &str, output_path: Option<&Path>) -> Result<(), CliError> {
    match output_path {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
