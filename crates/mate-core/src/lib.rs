//! mate-core - Core library for Mate
//!
//! This crate contains the shared models, the tombstone-aware local store, the
//! last-write-wins merge used by the relay, and the local sync client used by
//! every Mate front end.

pub mod db;
pub mod error;
pub mod export;
pub mod kv;
pub mod merge;
pub mod messages;
pub mod models;
pub mod search;
pub mod store;
pub mod sync;
pub mod util;

pub use db::LibSqlStore;
pub use error::{Error, Result};
pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use merge::{merge_snapshots, SnapshotMerge};
pub use models::{AppSettings, EntityId, Note, NoteCategory, Prompt, SyncSnapshot};
pub use store::TombstoneStore;
pub use sync::{SyncConfig, SyncService, SyncState, SyncStatus};
