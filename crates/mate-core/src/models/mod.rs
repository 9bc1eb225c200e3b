//! Data models for Mate

mod coerce;
mod id;
mod note;
mod prompt;
mod settings;
mod snapshot;

pub use id::EntityId;
pub use note::{Note, NoteCategory, MAX_NOTES, MAX_NOTE_CONTENT_LENGTH};
pub use prompt::{is_valid_prompt_key, Prompt, MAX_PROMPTS, MAX_PROMPT_CONTENT_LENGTH};
pub use settings::{AppSettings, ShortcutConfig};
pub use snapshot::SyncSnapshot;

/// Shared view over notes and prompts used by the merge and tombstone logic.
pub trait SyncEntity: Clone {
    /// Stable identifier, unique within its collection
    fn id(&self) -> &EntityId;
    /// Last mutation timestamp (Unix ms)
    fn updated_at(&self) -> i64;
    /// Soft-delete flag
    fn is_deleted(&self) -> bool;
    /// Tombstone timestamp (Unix ms), when deleted
    fn deleted_at(&self) -> Option<i64>;

    /// Whether the entity is visible to the user
    fn is_live(&self) -> bool {
        !self.is_deleted()
    }
}
