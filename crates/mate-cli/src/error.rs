use std::io;

use mate_core::sync::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] mate_core::Error),
    #[error(transparent)]
    Store(#[from] mate_core::StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No content provided")]
    EmptyContent,
    #[error("Edited content cannot be empty")]
    EmptyEditedContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Prompt key cannot be empty")]
    EmptyPromptKey,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("No prompt with key: {0}")]
    PromptNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Sync failed: {0}")]
    SyncFailed(String),
    #[error(
        "Sync is not configured. Run `mate sync config set --url <URL> --generate-key --enabled true` first."
    )]
    SyncNotConfigured,
    #[error("Auto-sync is off. Run `mate sync config set --auto-sync true` first.")]
    AutoSyncDisabled,
    #[error("Refusing to delete all data without --yes")]
    ConfirmationRequired,
}

impl CliError {
    /// Fold the "not configured" sync error into the CLI's own hint
    pub fn from_sync(error: SyncError) -> Self {
        match error {
            SyncError::NotConfigured => Self::SyncNotConfigured,
            other => Self::Sync(other),
        }
    }
}
