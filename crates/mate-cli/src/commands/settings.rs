use std::path::Path;

use mate_core::NoteCategory;

use crate::commands::common::{normalize_content, open_workspace};
use crate::error::CliError;

pub async fn run_settings_show(db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let settings = workspace.store.get_settings().await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub async fn run_settings_set(
    default_category: Option<NoteCategory>,
    notifications: Option<bool>,
    prompt_trigger: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let mut settings = workspace.store.get_settings().await?;

    if let Some(category) = default_category {
        settings.default_category = category;
    }
    if let Some(enabled) = notifications {
        settings.enable_notifications = enabled;
    }
    if let Some(trigger) = prompt_trigger {
        settings.shortcut_keys.prompt_trigger =
            normalize_content(trigger).ok_or(CliError::EmptyContent)?;
    }

    workspace.store.update_settings(&settings).await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
