//! Tombstone store: the only mutation surface for notes, prompts and settings.
//!
//! Everything lives in three JSON blobs of a [`KeyValueStore`]. Deletes are
//! soft: an entry is flagged `deleted` and kept so sync can carry the delete to
//! other devices. Physical removal only happens through
//! [`TombstoneStore::cleanup_tombstones`], which never leaves this device.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::models::{
    AppSettings, EntityId, Note, NoteCategory, Prompt, SyncEntity, SyncSnapshot, MAX_NOTES,
    MAX_PROMPTS,
};
use crate::util::{system_clock, Clock};

/// Storage key of the notes collection
pub const NOTES_KEY: &str = "notes";
/// Storage key of the prompts collection
pub const PROMPTS_KEY: &str = "prompts";
/// Storage key of the settings object
pub const SETTINGS_KEY: &str = "settings";

/// Entries physically removed by a cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub notes: usize,
    pub prompts: usize,
}

impl CleanupReport {
    pub const fn total(&self) -> usize {
        self.notes + self.prompts
    }
}

/// Notes, prompts and settings persisted with soft deletes.
#[derive(Clone)]
pub struct TombstoneStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl TombstoneStore {
    /// Create a store over `kv` using the system clock
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(kv, system_clock())
    }

    /// Create a store over `kv` with an explicit clock
    pub fn with_clock(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self { kv, clock }
    }

    /// Current time according to the store's clock
    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Timestamp for a mutation of an entity last stamped at `previous`.
    ///
    /// Never goes backwards, so a local edit always outranks the version it
    /// was made from even if the wall clock stepped back.
    fn next_timestamp(&self, previous: i64) -> i64 {
        self.now().max(previous.saturating_add(1))
    }

    // ---------------------------------------------------------------------
    // Notes
    // ---------------------------------------------------------------------

    /// Capture a new note
    pub async fn create_note(
        &self,
        content: &str,
        category: NoteCategory,
        source_url: &str,
        source_title: &str,
    ) -> Result<Note> {
        let note = Note::new_at(content, category, source_url, source_title, self.now());
        self.save_note(note).await
    }

    /// Upsert a note by id.
    ///
    /// New notes are appended as given. Existing notes are replaced and get a
    /// fresh `updatedAt`. Reusing the id of a tombstoned note is rejected; a
    /// recreated note needs a new id.
    pub async fn save_note(&self, mut note: Note) -> Result<Note> {
        let errors = note.validate();
        if !errors.is_empty() {
            return Err(Error::validation(&errors));
        }

        let mut notes: Vec<Note> = self.read_collection(NOTES_KEY).await?;
        if let Some(existing) = notes.iter_mut().find(|existing| existing.id == note.id) {
            if existing.deleted {
                return Err(Error::Validation(format!(
                    "note {} was deleted; create a new note instead",
                    note.id
                )));
            }
            note.created_at = existing.created_at;
            note.updated_at = self.next_timestamp(existing.updated_at);
            note.deleted = false;
            note.deleted_at = None;
            *existing = note.clone();
        } else {
            ensure_capacity(&notes, MAX_NOTES, "notes")?;
            notes.push(note.clone());
        }

        self.write_collection(NOTES_KEY, &notes).await?;
        tracing::debug!(id = %note.id, "Saved note");
        Ok(note)
    }

    /// Fetch a live note by id
    pub async fn get_note(&self, id: &EntityId) -> Result<Option<Note>> {
        Ok(self
            .get_all_live_notes()
            .await?
            .into_iter()
            .find(|note| &note.id == id))
    }

    /// Live notes in `category`, in storage order
    pub async fn get_notes_by_category(&self, category: NoteCategory) -> Result<Vec<Note>> {
        let mut notes = self.get_all_live_notes().await?;
        notes.retain(|note| note.category == category);
        Ok(notes)
    }

    /// All live notes; missing timestamps read as "now"
    pub async fn get_all_live_notes(&self) -> Result<Vec<Note>> {
        let now = self.now();
        let notes: Vec<Note> = self.read_collection(NOTES_KEY).await?;
        Ok(notes
            .into_iter()
            .filter(Note::is_live)
            .map(|mut note| {
                if note.created_at == 0 {
                    note.created_at = now;
                }
                if note.updated_at == 0 {
                    note.updated_at = now;
                }
                note
            })
            .collect())
    }

    /// Update an existing live note
    pub async fn update_note(&self, note: Note) -> Result<Note> {
        if self.get_note(&note.id).await?.is_none() {
            return Err(Error::NotFound(format!("note {}", note.id)));
        }
        self.save_note(note).await
    }

    /// Soft-delete a live note
    pub async fn delete_note(&self, id: &EntityId) -> Result<()> {
        let mut notes: Vec<Note> = self.read_collection(NOTES_KEY).await?;
        let note = notes
            .iter_mut()
            .find(|note| &note.id == id && note.is_live())
            .ok_or_else(|| Error::NotFound(format!("note {id}")))?;

        let now = self.next_timestamp(note.updated_at);
        note.deleted = true;
        note.deleted_at = Some(now);
        note.updated_at = now;

        self.write_collection(NOTES_KEY, &notes).await?;
        tracing::debug!(%id, "Deleted note");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Prompts
    // ---------------------------------------------------------------------

    /// Create a new prompt
    pub async fn create_prompt(
        &self,
        key: &str,
        title: &str,
        content: &str,
        description: Option<String>,
    ) -> Result<Prompt> {
        let prompt = Prompt::new_at(key, title, content, description, self.now());
        self.save_prompt(prompt).await
    }

    /// Upsert a prompt by id.
    ///
    /// Fails with [`Error::DuplicateKey`] when another live prompt already
    /// uses the key. Keys of tombstoned prompts are free for reuse.
    pub async fn save_prompt(&self, mut prompt: Prompt) -> Result<Prompt> {
        let errors = prompt.validate();
        if !errors.is_empty() {
            return Err(Error::validation(&errors));
        }

        let mut prompts: Vec<Prompt> = self.read_collection(PROMPTS_KEY).await?;
        if prompts
            .iter()
            .any(|other| other.is_live() && other.key == prompt.key && other.id != prompt.id)
        {
            return Err(Error::DuplicateKey(prompt.key));
        }

        if let Some(existing) = prompts.iter_mut().find(|existing| existing.id == prompt.id) {
            if existing.deleted {
                return Err(Error::Validation(format!(
                    "prompt {} was deleted; create a new prompt instead",
                    prompt.id
                )));
            }
            prompt.created_at = existing.created_at;
            prompt.updated_at = self.next_timestamp(existing.updated_at);
            prompt.deleted = false;
            prompt.deleted_at = None;
            *existing = prompt.clone();
        } else {
            ensure_capacity(&prompts, MAX_PROMPTS, "prompts")?;
            prompts.push(prompt.clone());
        }

        self.write_collection(PROMPTS_KEY, &prompts).await?;
        tracing::debug!(id = %prompt.id, key = %prompt.key, "Saved prompt");
        Ok(prompt)
    }

    /// All live prompts; missing timestamps read as "now"
    pub async fn get_all_live_prompts(&self) -> Result<Vec<Prompt>> {
        let now = self.now();
        let prompts: Vec<Prompt> = self.read_collection(PROMPTS_KEY).await?;
        Ok(prompts
            .into_iter()
            .filter(Prompt::is_live)
            .map(|mut prompt| {
                if prompt.created_at == 0 {
                    prompt.created_at = now;
                }
                if prompt.updated_at == 0 {
                    prompt.updated_at = now;
                }
                prompt
            })
            .collect())
    }

    /// Fetch a live prompt by id
    pub async fn get_prompt(&self, id: &EntityId) -> Result<Option<Prompt>> {
        Ok(self
            .get_all_live_prompts()
            .await?
            .into_iter()
            .find(|prompt| &prompt.id == id))
    }

    /// Fetch the live prompt bound to `key`
    pub async fn get_prompt_by_key(&self, key: &str) -> Result<Option<Prompt>> {
        Ok(self
            .get_all_live_prompts()
            .await?
            .into_iter()
            .find(|prompt| prompt.key == key))
    }

    /// Text a trigger for `key` expands to
    pub async fn expand_prompt(&self, key: &str) -> Result<String> {
        self.get_prompt_by_key(key.trim())
            .await?
            .map(|prompt| prompt.content)
            .ok_or_else(|| Error::NotFound(format!("prompt key {key}")))
    }

    /// Update an existing live prompt
    pub async fn update_prompt(&self, prompt: Prompt) -> Result<Prompt> {
        if self.get_prompt(&prompt.id).await?.is_none() {
            return Err(Error::NotFound(format!("prompt {}", prompt.id)));
        }
        self.save_prompt(prompt).await
    }

    /// Soft-delete a live prompt
    pub async fn delete_prompt(&self, id: &EntityId) -> Result<()> {
        let mut prompts: Vec<Prompt> = self.read_collection(PROMPTS_KEY).await?;
        let prompt = prompts
            .iter_mut()
            .find(|prompt| &prompt.id == id && prompt.is_live())
            .ok_or_else(|| Error::NotFound(format!("prompt {id}")))?;

        let now = self.next_timestamp(prompt.updated_at);
        prompt.deleted = true;
        prompt.deleted_at = Some(now);
        prompt.updated_at = now;

        self.write_collection(PROMPTS_KEY, &prompts).await?;
        tracing::debug!(%id, "Deleted prompt");
        Ok(())
    }

    /// Whether no live prompt other than `exclude_id` uses `key`
    pub async fn is_key_unique(&self, key: &str, exclude_id: Option<&EntityId>) -> Result<bool> {
        Ok(!self
            .get_all_live_prompts()
            .await?
            .iter()
            .any(|prompt| prompt.key == key && Some(&prompt.id) != exclude_id))
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Stored settings merged over defaults
    pub async fn get_settings(&self) -> Result<AppSettings> {
        match self.kv.get_one(SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(AppSettings::default()),
        }
    }

    /// Replace stored settings
    pub async fn update_settings(&self, settings: &AppSettings) -> Result<()> {
        self.kv
            .set_one(SETTINGS_KEY, serde_json::to_string(settings)?)
            .await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    /// Live data only, for display and export
    pub async fn export_all(&self) -> Result<SyncSnapshot> {
        Ok(SyncSnapshot {
            notes: self.get_all_live_notes().await?,
            prompts: self.get_all_live_prompts().await?,
            settings: self.get_settings().await?,
            last_sync_time: None,
        })
    }

    /// Everything, tombstones included; the only input to the sync protocol
    pub async fn export_all_for_sync(&self) -> Result<SyncSnapshot> {
        Ok(SyncSnapshot {
            notes: self.read_collection(NOTES_KEY).await?,
            prompts: self.read_collection(PROMPTS_KEY).await?,
            settings: self.get_settings().await?,
            last_sync_time: None,
        })
    }

    /// Overwrite all three blobs with `snapshot`; no merging happens here
    pub async fn import_snapshot(&self, snapshot: &SyncSnapshot) -> Result<()> {
        self.kv
            .set(vec![
                (NOTES_KEY.to_string(), serde_json::to_string(&snapshot.notes)?),
                (
                    PROMPTS_KEY.to_string(),
                    serde_json::to_string(&snapshot.prompts)?,
                ),
                (
                    SETTINGS_KEY.to_string(),
                    serde_json::to_string(&snapshot.settings)?,
                ),
            ])
            .await?;
        tracing::debug!(
            notes = snapshot.notes.len(),
            prompts = snapshot.prompts.len(),
            "Imported snapshot"
        );
        Ok(())
    }

    /// Physically drop tombstones older than `retention`.
    ///
    /// Local only: peers that have not seen a purged tombstone may resurrect
    /// the entry on their next sync, so keep the retention generous.
    pub async fn cleanup_tombstones(&self, retention: Duration) -> Result<CleanupReport> {
        let retention_ms = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
        let now = self.now();

        let notes: Vec<Note> = self.read_collection(NOTES_KEY).await?;
        let prompts: Vec<Prompt> = self.read_collection(PROMPTS_KEY).await?;
        let (notes, purged_notes) = retain_fresh(notes, now, retention_ms);
        let (prompts, purged_prompts) = retain_fresh(prompts, now, retention_ms);

        let report = CleanupReport {
            notes: purged_notes,
            prompts: purged_prompts,
        };
        if report.total() == 0 {
            return Ok(report);
        }

        self.write_collection(NOTES_KEY, &notes).await?;
        self.write_collection(PROMPTS_KEY, &prompts).await?;
        tracing::info!(
            notes = report.notes,
            prompts = report.prompts,
            "Purged expired tombstones"
        );
        Ok(report)
    }

    /// Remove notes, prompts and settings
    pub async fn clear_all(&self) -> Result<()> {
        self.kv.clear().await?;
        Ok(())
    }

    async fn read_collection<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.kv.get_one(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_collection<T>(&self, key: &str, items: &[T]) -> Result<()>
    where
        T: Serialize + Sync,
    {
        self.kv.set_one(key, serde_json::to_string(items)?).await?;
        Ok(())
    }
}

fn ensure_capacity<T: SyncEntity>(items: &[T], limit: usize, label: &str) -> Result<()> {
    let live = items.iter().filter(|item| item.is_live()).count();
    if live >= limit {
        return Err(Error::Validation(format!(
            "cannot store more than {limit} {label}"
        )));
    }
    Ok(())
}

fn retain_fresh<T: SyncEntity>(items: Vec<T>, now: i64, retention_ms: i64) -> (Vec<T>, usize) {
    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| {
            if !item.is_deleted() {
                return true;
            }
            let deleted_at = item.deleted_at().unwrap_or_else(|| item.updated_at());
            now.saturating_sub(deleted_at) <= retention_ms
        })
        .collect();
    let purged = before - kept.len();
    (kept, purged)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn fixed_clock(start: i64) -> (Arc<AtomicI64>, Clock) {
        let time = Arc::new(AtomicI64::new(start));
        let handle = Arc::clone(&time);
        (time, Arc::new(move || handle.load(Ordering::SeqCst)))
    }

    fn setup() -> (Arc<AtomicI64>, TombstoneStore) {
        let (time, clock) = fixed_clock(1_000);
        (
            time,
            TombstoneStore::with_clock(Arc::new(MemoryStore::new()), clock),
        )
    }

    #[tokio::test]
    async fn test_create_and_list_by_category() {
        let (_, store) = setup();
        store
            .create_note("idea", NoteCategory::Inspiration, "https://a", "A")
            .await
            .unwrap();
        store
            .create_note("chore", NoteCategory::Todo, "https://b", "B")
            .await
            .unwrap();

        let todos = store.get_notes_by_category(NoteCategory::Todo).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "chore");
        assert_eq!(todos[0].created_at, 1_000);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_and_keeps_created_at() {
        let (time, store) = setup();
        let mut note = store
            .create_note("draft", NoteCategory::Other, "", "")
            .await
            .unwrap();

        time.store(2_000, Ordering::SeqCst);
        note.content = "final".to_string();
        note.created_at = 5;
        let updated = store.update_note(note).await.unwrap();

        assert_eq!(updated.content, "final");
        assert_eq!(updated.created_at, 1_000);
        assert_eq!(updated.updated_at, 2_000);
    }

    #[tokio::test]
    async fn test_update_never_regresses_updated_at() {
        let (time, store) = setup();
        let note = store
            .create_note("draft", NoteCategory::Other, "", "")
            .await
            .unwrap();

        time.store(500, Ordering::SeqCst);
        let updated = store.update_note(note).await.unwrap();
        assert_eq!(updated.updated_at, 1_001);
    }

    #[tokio::test]
    async fn test_delete_is_a_tombstone() {
        let (time, store) = setup();
        let note = store
            .create_note("bye", NoteCategory::Other, "", "")
            .await
            .unwrap();

        time.store(3_000, Ordering::SeqCst);
        store.delete_note(&note.id).await.unwrap();

        assert!(store.get_note(&note.id).await.unwrap().is_none());
        assert!(store.get_all_live_notes().await.unwrap().is_empty());

        let sync = store.export_all_for_sync().await.unwrap();
        assert_eq!(sync.notes.len(), 1);
        assert!(sync.notes[0].deleted);
        assert_eq!(sync.notes[0].deleted_at, Some(3_000));
        assert_eq!(sync.notes[0].updated_at, 3_000);

        assert!(matches!(
            store.delete_note(&note.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_tombstoned_id_cannot_be_recreated() {
        let (_, store) = setup();
        let note = store
            .create_note("bye", NoteCategory::Other, "", "")
            .await
            .unwrap();
        store.delete_note(&note.id).await.unwrap();

        assert!(matches!(
            store.save_note(note.clone()).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            store.update_note(note).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_note_is_rejected() {
        let (_, store) = setup();
        let err = store
            .create_note("   ", NoteCategory::Other, "", "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_live_prompt_key_is_rejected() {
        let (_, store) = setup();
        store
            .create_prompt("greet", "Greeting", "Hello", None)
            .await
            .unwrap();

        let err = store
            .create_prompt("greet", "Other", "Hi", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(key) if key == "greet"));
    }

    #[tokio::test]
    async fn test_tombstoned_prompt_key_can_be_reused() {
        let (_, store) = setup();
        let old = store
            .create_prompt("greet", "Greeting", "Hello", None)
            .await
            .unwrap();
        store.delete_prompt(&old.id).await.unwrap();

        assert!(store.is_key_unique("greet", None).await.unwrap());
        let new = store
            .create_prompt("greet", "Greeting v2", "Hey", None)
            .await
            .unwrap();
        assert_ne!(new.id, old.id);

        let found = store.get_prompt_by_key("greet").await.unwrap().unwrap();
        assert_eq!(found.id, new.id);
    }

    #[tokio::test]
    async fn test_prompt_can_keep_its_own_key_on_update() {
        let (_, store) = setup();
        let mut prompt = store
            .create_prompt("greet", "Greeting", "Hello", None)
            .await
            .unwrap();
        assert!(store.is_key_unique("greet", Some(&prompt.id)).await.unwrap());
        assert!(!store.is_key_unique("greet", None).await.unwrap());

        prompt.content = "Hello there".to_string();
        let updated = store.update_prompt(prompt).await.unwrap();
        assert_eq!(updated.content, "Hello there");
    }

    #[tokio::test]
    async fn test_expand_prompt_by_key() {
        let (_, store) = setup();
        store
            .create_prompt("sig", "Signature", "Best regards", None)
            .await
            .unwrap();

        assert_eq!(store.expand_prompt("sig").await.unwrap(), "Best regards");
        assert!(matches!(
            store.expand_prompt("missing").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_prompt_key_is_rejected() {
        let (_, store) = setup();
        let err = store
            .create_prompt("has space", "T", "C", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_sync_export_roundtrip_is_stable() {
        let (_, store) = setup();
        let kept = store
            .create_note("kept", NoteCategory::Todo, "https://a", "A")
            .await
            .unwrap();
        let gone = store
            .create_note("gone", NoteCategory::Other, "", "")
            .await
            .unwrap();
        store.delete_note(&gone.id).await.unwrap();
        store.create_prompt("k", "T", "C", None).await.unwrap();

        let first = store.export_all_for_sync().await.unwrap();
        store.import_snapshot(&first).await.unwrap();
        let second = store.export_all_for_sync().await.unwrap();

        assert_eq!(
            serde_json::to_string(&first.notes).unwrap(),
            serde_json::to_string(&second.notes).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.prompts).unwrap(),
            serde_json::to_string(&second.prompts).unwrap()
        );

        let display = store.export_all().await.unwrap();
        assert_eq!(display.notes.len(), 1);
        assert_eq!(display.notes[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_import_overwrites_everything() {
        let (_, store) = setup();
        store
            .create_note("local", NoteCategory::Other, "", "")
            .await
            .unwrap();

        let remote = SyncSnapshot {
            notes: vec![Note::new_at("remote", NoteCategory::Todo, "", "", 7)],
            prompts: Vec::new(),
            settings: AppSettings {
                enable_notifications: false,
                ..AppSettings::default()
            },
            last_sync_time: Some(8),
        };
        store.import_snapshot(&remote).await.unwrap();

        let notes = store.get_all_live_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "remote");
        assert!(!store.get_settings().await.unwrap().enable_notifications);
    }

    #[tokio::test]
    async fn test_cleanup_purges_only_expired_tombstones() {
        let (time, store) = setup();
        let old = store
            .create_note("old", NoteCategory::Other, "", "")
            .await
            .unwrap();
        let recent = store
            .create_note("recent", NoteCategory::Other, "", "")
            .await
            .unwrap();
        store
            .create_note("live", NoteCategory::Other, "", "")
            .await
            .unwrap();

        time.store(10_000, Ordering::SeqCst);
        store.delete_note(&old.id).await.unwrap();
        time.store(50_000, Ordering::SeqCst);
        store.delete_note(&recent.id).await.unwrap();

        time.store(60_000, Ordering::SeqCst);
        let report = store
            .cleanup_tombstones(Duration::from_millis(20_000))
            .await
            .unwrap();
        assert_eq!(report, CleanupReport { notes: 1, prompts: 0 });

        let remaining = store.export_all_for_sync().await.unwrap();
        assert_eq!(remaining.notes.len(), 2);
        assert!(remaining.notes.iter().all(|note| note.id != old.id));
    }

    #[tokio::test]
    async fn test_live_reads_fill_missing_timestamps() {
        let kv = Arc::new(MemoryStore::new());
        kv.set_one(
            NOTES_KEY,
            r#"[{"id":"legacy","content":"x","category":"other"}]"#.to_string(),
        )
        .await
        .unwrap();
        let legacy = TombstoneStore::with_clock(kv, Arc::new(|| 42));

        let notes = legacy.get_all_live_notes().await.unwrap();
        assert_eq!(notes[0].created_at, 42);
        assert_eq!(notes[0].updated_at, 42);
    }

    #[tokio::test]
    async fn test_settings_default_and_update() {
        let (_, store) = setup();
        assert_eq!(store.get_settings().await.unwrap(), AppSettings::default());

        let settings = AppSettings {
            default_category: NoteCategory::Principle,
            ..AppSettings::default()
        };
        store.update_settings(&settings).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), settings);
    }
}
