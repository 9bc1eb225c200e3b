use std::path::Path;

use crate::commands::common::open_workspace;
use crate::error::CliError;

/// Wipe notes, prompts and settings. Sync configuration is kept.
pub async fn run_clear(confirmed: bool, db_path: &Path) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ConfirmationRequired);
    }

    let workspace = open_workspace(db_path).await?;
    workspace.store.clear_all().await?;
    println!("All local data cleared");
    Ok(())
}
