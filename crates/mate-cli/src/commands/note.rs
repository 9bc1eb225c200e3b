use std::path::Path;

use mate_core::search::search_notes;
use mate_core::NoteCategory;

use crate::commands::common::{
    format_note_lines, format_timestamp, newest_first, normalize_content,
    normalize_note_identifier, normalize_search_query, now_ms, open_workspace, resolve_content,
    resolve_note, NoteRow,
};
use crate::commands::editor::Editor;
use crate::error::CliError;

pub async fn run_note_add(
    content_parts: &[String],
    category: Option<NoteCategory>,
    source_url: Option<&str>,
    source_title: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let content = resolve_content(content_parts)?;
    let workspace = open_workspace(db_path).await?;
    let category = match category {
        Some(category) => category,
        None => workspace.store.get_settings().await?.default_category,
    };

    let note = workspace
        .store
        .create_note(
            &content,
            category,
            source_url.unwrap_or_default(),
            source_title.unwrap_or_default(),
        )
        .await?;
    println!("{}", note.id);
    Ok(())
}

pub async fn run_note_list(
    limit: usize,
    category: Option<NoteCategory>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let notes = match category {
        Some(category) => workspace.store.get_notes_by_category(category).await?,
        None => workspace.store.get_all_live_notes().await?,
    };
    print_notes(&newest_first(notes, limit), as_json)
}

pub async fn run_note_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let workspace = open_workspace(db_path).await?;
    let note = resolve_note(&normalized_id, &workspace.store).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    println!("id:       {}", note.id);
    println!("category: {}", note.category);
    if !note.source_title.is_empty() {
        println!("title:    {}", note.source_title);
    }
    if !note.source_url.is_empty() {
        println!("source:   {}", note.source_url);
    }
    println!("created:  {}", format_timestamp(note.created_at));
    println!("updated:  {}", format_timestamp(note.updated_at));
    println!();
    println!("{}", note.content);
    Ok(())
}

pub async fn run_note_edit(
    id: &str,
    category: Option<NoteCategory>,
    content_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let workspace = open_workspace(db_path).await?;
    let mut note = resolve_note(&normalized_id, &workspace.store).await?;

    let edited_content = if let Some(content) = normalize_content(&content_parts.join(" ")) {
        content
    } else if category.is_some() {
        note.content.clone()
    } else {
        Editor::from_env()
            .edit(&note.content)?
            .ok_or(CliError::EmptyEditedContent)?
    };

    let new_category = category.unwrap_or(note.category);
    if edited_content == note.content && new_category == note.category {
        println!("{}", note.id);
        return Ok(());
    }

    note.content = edited_content;
    note.category = new_category;
    let updated = workspace.store.update_note(note).await?;
    println!("{}", updated.id);
    Ok(())
}

pub async fn run_note_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let workspace = open_workspace(db_path).await?;
    let note = resolve_note(&normalized_id, &workspace.store).await?;

    workspace.store.delete_note(&note.id).await?;
    println!("{}", note.id);
    Ok(())
}

pub async fn run_note_search(
    query: &str,
    limit: usize,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let query = normalize_search_query(query)?;
    let workspace = open_workspace(db_path).await?;
    let notes = workspace.store.get_all_live_notes().await?;
    let matches = newest_first(search_notes(&notes, &query), limit);
    print_notes(&matches, as_json)
}

fn print_notes(notes: &[mate_core::Note], as_json: bool) -> Result<(), CliError> {
    let now = now_ms();
    if as_json {
        let rows = notes
            .iter()
            .map(|note| NoteRow::new(note, now))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        for line in format_note_lines(notes, now) {
            println!("{line}");
        }
    }
    Ok(())
}
