use std::path::Path;

use mate_core::search::search_prompts;
use mate_core::{Prompt, TombstoneStore};

use crate::commands::common::{
    format_prompt_lines, format_timestamp, normalize_content, normalize_prompt_key,
    normalize_search_query, open_workspace, resolve_content, resolve_prompt,
};
use crate::commands::editor::Editor;
use crate::error::CliError;

pub async fn run_prompt_add(
    key: &str,
    title: Option<&str>,
    description: Option<String>,
    content_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let key = normalize_prompt_key(key)?;
    let content = resolve_content(content_parts)?;
    let title = title
        .and_then(normalize_content)
        .unwrap_or_else(|| key.clone());

    let workspace = open_workspace(db_path).await?;
    let prompt = workspace
        .store
        .create_prompt(&key, &title, &content, description)
        .await?;
    println!("{}", prompt.key);
    Ok(())
}

pub async fn run_prompt_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let mut prompts = workspace.store.get_all_live_prompts().await?;
    prompts.sort_by(|a, b| a.key.cmp(&b.key));
    print_prompts(&prompts, as_json)
}

pub async fn run_prompt_search(query: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let query = normalize_search_query(query)?;
    let workspace = open_workspace(db_path).await?;
    let matches = find_prompts(&workspace.store, &query).await?;
    print_prompts(&matches, as_json)
}

/// Live prompts matching `query`, ordered by key
pub async fn find_prompts(store: &TombstoneStore, query: &str) -> Result<Vec<Prompt>, CliError> {
    let prompts = store.get_all_live_prompts().await?;
    let mut matches = search_prompts(&prompts, query);
    matches.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(matches)
}

fn print_prompts(prompts: &[Prompt], as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&prompts)?);
    } else if prompts.is_empty() {
        println!("No prompts found.");
    } else {
        for line in format_prompt_lines(prompts) {
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn run_prompt_show(key: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let prompt = resolve_prompt(key, &workspace.store).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&prompt)?);
        return Ok(());
    }

    println!("key:     {}", prompt.key);
    println!("title:   {}", prompt.title);
    if let Some(description) = &prompt.description {
        println!("about:   {description}");
    }
    println!("updated: {}", format_timestamp(prompt.updated_at));
    println!();
    println!("{}", prompt.content);
    Ok(())
}

pub async fn run_prompt_edit(
    key: &str,
    new_key: Option<&str>,
    title: Option<&str>,
    description: Option<String>,
    content_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let mut prompt = resolve_prompt(key, &workspace.store).await?;
    let touches_metadata = new_key.is_some() || title.is_some() || description.is_some();

    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        prompt.content = content;
    } else if !touches_metadata {
        prompt.content = Editor::from_env()
            .edit(&prompt.content)?
            .ok_or(CliError::EmptyEditedContent)?;
    }

    if let Some(new_key) = new_key {
        prompt.key = normalize_prompt_key(new_key)?;
    }
    if let Some(title) = title {
        prompt.title = title.trim().to_string();
    }
    if let Some(description) = description {
        prompt.description = normalize_content(&description);
    }

    let updated = workspace.store.update_prompt(prompt).await?;
    println!("{}", updated.key);
    Ok(())
}

pub async fn run_prompt_delete(key: &str, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let prompt = resolve_prompt(key, &workspace.store).await?;

    workspace.store.delete_prompt(&prompt.id).await?;
    println!("{}", prompt.key);
    Ok(())
}

pub async fn run_prompt_expand(key: &str, db_path: &Path) -> Result<(), CliError> {
    let key = normalize_prompt_key(key)?;
    let workspace = open_workspace(db_path).await?;
    let content = workspace
        .store
        .expand_prompt(&key)
        .await
        .map_err(|error| match error {
            mate_core::Error::NotFound(_) => CliError::PromptNotFound(key.clone()),
            other => CliError::Core(other),
        })?;
    println!("{content}");
    Ok(())
}
