//! Last-write-wins merge of sync snapshots.
//!
//! The relay runs this on every request: its stored snapshot is the base and
//! the client's entries are applied on top. An incoming entry replaces a
//! stored one only when its `updatedAt` is strictly greater, so equal
//! timestamps keep the stored value. Tombstones are ordinary entries here; a
//! newer delete beats an older edit and a newer edit beats an older delete.

use std::collections::HashMap;

use crate::models::{EntityId, SyncEntity, SyncSnapshot};

/// Per-collection merge counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming entries whose id was unknown
    pub inserted: usize,
    /// Stored entries overwritten by a strictly newer incoming entry
    pub replaced: usize,
    /// Incoming entries discarded as stale or tied
    pub discarded: usize,
}

/// Result of merging one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMerge<T> {
    pub entries: Vec<T>,
    pub stats: MergeStats,
}

/// Result of merging a client snapshot into the stored one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMerge {
    pub snapshot: SyncSnapshot,
    pub notes: MergeStats,
    pub prompts: MergeStats,
}

/// Merge `incoming` entries into `stored` by id.
///
/// Stored order is preserved; unknown incoming entries are appended in the
/// order they arrive. Nothing is ever dropped, tombstones included.
pub fn merge_collection<T: SyncEntity>(stored: Vec<T>, incoming: Vec<T>) -> CollectionMerge<T> {
    let mut entries: Vec<T> = Vec::with_capacity(stored.len() + incoming.len());
    let mut positions: HashMap<EntityId, usize> = HashMap::with_capacity(stored.len());
    let mut stats = MergeStats::default();

    for entry in stored {
        if let Some(&index) = positions.get(entry.id()) {
            entries[index] = entry;
        } else {
            positions.insert(entry.id().clone(), entries.len());
            entries.push(entry);
        }
    }

    for entry in incoming {
        if let Some(&index) = positions.get(entry.id()) {
            if entry.updated_at() > entries[index].updated_at() {
                entries[index] = entry;
                stats.replaced += 1;
            } else {
                stats.discarded += 1;
            }
        } else {
            positions.insert(entry.id().clone(), entries.len());
            entries.push(entry);
            stats.inserted += 1;
        }
    }

    CollectionMerge { entries, stats }
}

/// Merge a client snapshot with the relay's stored snapshot.
///
/// Notes and prompts merge independently by LWW. Settings are taken from the
/// client wholesale and `lastSyncTime` is set to `now`.
pub fn merge_snapshots(
    client: SyncSnapshot,
    stored: Option<SyncSnapshot>,
    now: i64,
) -> SnapshotMerge {
    let (stored_notes, stored_prompts) =
        stored.map_or_else(Default::default, |snapshot| (snapshot.notes, snapshot.prompts));

    let notes = merge_collection(stored_notes, client.notes);
    let prompts = merge_collection(stored_prompts, client.prompts);

    SnapshotMerge {
        snapshot: SyncSnapshot {
            notes: notes.entries,
            prompts: prompts.entries,
            settings: client.settings,
            last_sync_time: Some(now),
        },
        notes: notes.stats,
        prompts: prompts.stats,
    }
}
