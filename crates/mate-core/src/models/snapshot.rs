//! Sync snapshot: the unit exchanged with the relay

use serde::{Deserialize, Serialize};

use super::{AppSettings, Note, Prompt, SyncEntity};

/// Full dataset of one device or of the relay.
///
/// Sync snapshots carry tombstoned entries so deletions propagate; display
/// exports carry only live entries. On the wire the notes collection is called
/// `records`; `notes` is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    #[serde(rename = "records", alias = "notes", default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default)]
    pub last_sync_time: Option<i64>,
}

impl SyncSnapshot {
    /// Count of tombstoned entries across both collections
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.notes.iter().filter(|note| note.is_deleted()).count()
            + self.prompts.iter().filter(|prompt| prompt.is_deleted()).count()
    }
}
