use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use mate_core::{EntityId, Note, NoteCategory};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::time::sleep;

use crate::cli::{Cli, CompletionShell, ExportFormat};
use crate::commands::cleanup::{retention_from_days, run_cleanup};
use crate::commands::clear::run_clear;
use crate::commands::common::{
    format_relative_time, mask_secret, newest_first, normalize_content,
    normalize_note_identifier, normalize_prompt_key, normalize_search_query, note_preview,
    open_workspace, resolve_db_path, resolve_note, resolve_prompt,
};
use crate::commands::completions::render_completions;
use crate::commands::export::run_export;
use crate::commands::note::{run_note_add, run_note_delete, run_note_edit};
use crate::commands::prompt::{
    find_prompts, run_prompt_add, run_prompt_delete, run_prompt_edit, run_prompt_search,
};
use crate::commands::settings::run_settings_set;
use crate::commands::sync::{run_sync, run_sync_config_reset, run_sync_config_set, SyncConfigArgs};
use crate::error::CliError;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mate.db");
    (dir, path)
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn note_with_id(id: &str, content: &str) -> Note {
    let mut note = Note::new(content, NoteCategory::Other, "", "");
    note.id = EntityId::from(id);
    note
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_content_keeps_multiline_text() {
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn identifiers_and_queries_reject_blank_input() {
    assert!(matches!(
        normalize_note_identifier("   "),
        Err(CliError::EmptyNoteId)
    ));
    assert!(matches!(
        normalize_search_query(""),
        Err(CliError::EmptySearchQuery)
    ));
    assert_eq!(normalize_note_identifier(" abc ").unwrap(), "abc");
}

#[test]
fn prompt_keys_must_use_the_key_alphabet() {
    assert_eq!(normalize_prompt_key(" greet_1 ").unwrap(), "greet_1");
    assert!(matches!(
        normalize_prompt_key(""),
        Err(CliError::EmptyPromptKey)
    ));
    assert!(matches!(
        normalize_prompt_key("two words"),
        Err(CliError::Core(mate_core::Error::Validation(_)))
    ));
}

#[test]
fn format_relative_time_buckets() {
    let now = 1_700_000_000_000;
    assert_eq!(format_relative_time(now - 5_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d ago");
    assert_eq!(format_relative_time(now - 400 * 86_400_000, now), "1y ago");
}

#[test]
fn note_preview_collapses_whitespace_and_truncates() {
    let note = Note::new("a   very    long first line\nsecond", NoteCategory::Todo, "", "");
    assert_eq!(note_preview(&note, 100), "a very long first line");
    assert_eq!(note_preview(&note, 10), "a very ...");
}

#[test]
fn mask_secret_hides_the_middle() {
    assert_eq!(mask_secret(""), "(not set)");
    assert_eq!(mask_secret("short"), "*****");
    assert_eq!(mask_secret("abcd1234efgh5678"), "abcd...5678");
}

#[test]
fn newest_first_sorts_and_limits() {
    let mut old = note_with_id("old", "old");
    old.updated_at = 1;
    let mut new = note_with_id("new", "new");
    new.updated_at = 2;

    let sorted = newest_first(vec![old, new], 1);
    assert_eq!(sorted.len(), 1);
    assert_eq!(sorted[0].id.as_str(), "new");
}

#[test]
fn resolve_db_path_prefers_cli_argument() {
    let explicit = PathBuf::from("/tmp/explicit.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
}

#[test]
fn retention_is_measured_in_whole_days() {
    assert_eq!(retention_from_days(0), Duration::ZERO);
    assert_eq!(retention_from_days(2), Duration::from_secs(2 * 86_400));
}

#[test]
fn generate_key_flag_fills_the_api_key() {
    let update = SyncConfigArgs {
        generate_key: true,
        ..SyncConfigArgs::default()
    }
    .into_update();
    let key = update.api_key.unwrap();
    assert_eq!(key.len(), 32);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_parses_bare_sync_and_nested_config() {
    let cli = Cli::try_parse_from(["mate", "sync"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(crate::cli::Commands::Sync { command: None })
    ));

    let cli = Cli::try_parse_from([
        "mate",
        "sync",
        "config",
        "set",
        "--url",
        "https://relay.example.com",
        "--enabled",
        "true",
    ]);
    assert!(cli.is_ok());
}

#[test]
fn cli_rejects_api_key_with_generate_key() {
    let result = Cli::try_parse_from([
        "mate",
        "sync",
        "config",
        "set",
        "--api-key",
        "abc",
        "--generate-key",
    ]);
    assert!(result.is_err());
}

#[test]
fn completions_mention_the_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("mate"));
}

#[tokio::test]
async fn note_add_uses_default_category_from_settings() {
    let (_dir, db_path) = temp_db();
    run_settings_set(Some(NoteCategory::Principle), None, None, &db_path)
        .await
        .unwrap();

    run_note_add(&words("stay curious"), None, None, None, &db_path)
        .await
        .unwrap();

    let workspace = open_workspace(&db_path).await.unwrap();
    let notes = workspace.store.get_all_live_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "stay curious");
    assert_eq!(notes[0].category, NoteCategory::Principle);
}

#[tokio::test]
async fn resolve_note_matches_exact_id_and_unique_prefix() {
    let (_dir, db_path) = temp_db();
    let workspace = open_workspace(&db_path).await.unwrap();
    workspace
        .store
        .save_note(note_with_id("abc-1", "first"))
        .await
        .unwrap();
    workspace
        .store
        .save_note(note_with_id("abd-2", "second"))
        .await
        .unwrap();

    let exact = resolve_note("abc-1", &workspace.store).await.unwrap();
    assert_eq!(exact.content, "first");

    let by_prefix = resolve_note("abd", &workspace.store).await.unwrap();
    assert_eq!(by_prefix.content, "second");

    let ambiguous = resolve_note("ab", &workspace.store).await;
    assert!(matches!(ambiguous, Err(CliError::AmbiguousNoteId(_))));

    let missing = resolve_note("zzz", &workspace.store).await;
    assert!(matches!(missing, Err(CliError::NoteNotFound(_))));
}

#[tokio::test]
async fn note_edit_and_delete_by_prefix() {
    let (_dir, db_path) = temp_db();
    let workspace = open_workspace(&db_path).await.unwrap();
    workspace
        .store
        .save_note(note_with_id("edit-me", "draft"))
        .await
        .unwrap();

    run_note_edit("edit", Some(NoteCategory::Todo), &words("final text"), &db_path)
        .await
        .unwrap();
    let note = resolve_note("edit-me", &workspace.store).await.unwrap();
    assert_eq!(note.content, "final text");
    assert_eq!(note.category, NoteCategory::Todo);

    run_note_delete("edit", &db_path).await.unwrap();
    assert!(workspace.store.get_all_live_notes().await.unwrap().is_empty());

    let tombstones = workspace.store.export_all_for_sync().await.unwrap();
    assert_eq!(tombstones.tombstone_count(), 1);
}

#[tokio::test]
async fn prompt_add_edit_and_delete() {
    let (_dir, db_path) = temp_db();
    run_prompt_add("greet", None, None, &words("Hello there"), &db_path)
        .await
        .unwrap();

    let workspace = open_workspace(&db_path).await.unwrap();
    let prompt = resolve_prompt("greet", &workspace.store).await.unwrap();
    assert_eq!(prompt.title, "greet");
    assert_eq!(prompt.content, "Hello there");

    run_prompt_edit("greet", Some("hi"), Some("Hi"), None, &[], &db_path)
        .await
        .unwrap();
    assert_eq!(
        workspace.store.expand_prompt("hi").await.unwrap(),
        "Hello there"
    );
    assert!(matches!(
        resolve_prompt("greet", &workspace.store).await,
        Err(CliError::PromptNotFound(_))
    ));

    run_prompt_delete("hi", &db_path).await.unwrap();
    assert!(workspace.store.get_all_live_prompts().await.unwrap().is_empty());

    // Deleted keys are free again
    run_prompt_add("hi", None, None, &words("again"), &db_path)
        .await
        .unwrap();
}

#[tokio::test]
async fn prompt_search_matches_any_field_and_skips_deleted() {
    let (_dir, db_path) = temp_db();
    run_prompt_add("sig", Some("Signature"), None, &words("Best regards"), &db_path)
        .await
        .unwrap();
    run_prompt_add(
        "addr",
        None,
        Some("home address".to_string()),
        &words("1 Main St"),
        &db_path,
    )
    .await
    .unwrap();
    run_prompt_add("bye", None, None, &words("Regards, gone"), &db_path)
        .await
        .unwrap();
    run_prompt_delete("bye", &db_path).await.unwrap();

    let workspace = open_workspace(&db_path).await.unwrap();
    let keys = |prompts: Vec<mate_core::Prompt>| {
        prompts.into_iter().map(|prompt| prompt.key).collect::<Vec<_>>()
    };
    assert_eq!(
        keys(find_prompts(&workspace.store, "REGARDS").await.unwrap()),
        vec!["sig"]
    );
    assert_eq!(
        keys(find_prompts(&workspace.store, "address").await.unwrap()),
        vec!["addr"]
    );
    assert!(find_prompts(&workspace.store, "nothing here")
        .await
        .unwrap()
        .is_empty());

    assert!(matches!(
        run_prompt_search("   ", false, &db_path).await,
        Err(CliError::EmptySearchQuery)
    ));
}

#[tokio::test]
async fn duplicate_prompt_key_is_rejected() {
    let (_dir, db_path) = temp_db();
    run_prompt_add("sig", None, None, &words("one"), &db_path)
        .await
        .unwrap();

    let result = run_prompt_add("sig", None, None, &words("two"), &db_path).await;
    assert!(matches!(
        result,
        Err(CliError::Core(mate_core::Error::DuplicateKey(_)))
    ));
}

#[tokio::test]
async fn sync_requires_configuration() {
    let (_dir, db_path) = temp_db();
    let result = run_sync(&db_path).await;
    assert!(matches!(result, Err(CliError::SyncNotConfigured)));
}

#[tokio::test]
async fn sync_config_set_and_reset() {
    let (_dir, db_path) = temp_db();
    let args = SyncConfigArgs {
        url: Some("https://relay.example.com/".to_string()),
        generate_key: true,
        enabled: Some(true),
        ..SyncConfigArgs::default()
    };
    run_sync_config_set(args, &db_path).await.unwrap();

    let workspace = open_workspace(&db_path).await.unwrap();
    let config = workspace.sync.get_config().await.unwrap();
    assert_eq!(config.worker_url, "https://relay.example.com");
    assert!(config.is_ready());
    assert!(workspace.sync.get_state().await.unwrap().is_configured);

    run_sync_config_reset(&db_path).await.unwrap();
    assert!(!workspace.sync.is_configured().await.unwrap());
}

#[tokio::test]
async fn sync_config_set_rejects_bad_url() {
    let (_dir, db_path) = temp_db();
    let args = SyncConfigArgs {
        url: Some("relay.example.com".to_string()),
        ..SyncConfigArgs::default()
    };
    let result = run_sync_config_set(args, &db_path).await;
    assert!(matches!(result, Err(CliError::Sync(_))));
}

#[tokio::test]
async fn cleanup_purges_expired_tombstones_only() {
    let (_dir, db_path) = temp_db();
    let workspace = open_workspace(&db_path).await.unwrap();
    workspace
        .store
        .save_note(note_with_id("gone", "gone"))
        .await
        .unwrap();
    workspace
        .store
        .save_note(note_with_id("kept", "kept"))
        .await
        .unwrap();
    workspace.store.delete_note(&EntityId::from("gone")).await.unwrap();

    run_cleanup(30, &db_path).await.unwrap();
    let snapshot = workspace.store.export_all_for_sync().await.unwrap();
    assert_eq!(snapshot.tombstone_count(), 1);

    sleep(Duration::from_millis(5)).await;
    run_cleanup(0, &db_path).await.unwrap();
    let snapshot = workspace.store.export_all_for_sync().await.unwrap();
    assert_eq!(snapshot.tombstone_count(), 0);
    assert_eq!(snapshot.notes.len(), 1);

    let state = workspace.sync.get_state().await.unwrap();
    assert!(state.last_cleanup_time.is_some());
}

#[tokio::test]
async fn export_into_directory_uses_suggested_name() {
    let (dir, db_path) = temp_db();
    run_note_add(&words("exported note"), None, None, None, &db_path)
        .await
        .unwrap();
    let workspace = open_workspace(&db_path).await.unwrap();
    workspace
        .store
        .save_note(note_with_id("deleted", "deleted note"))
        .await
        .unwrap();
    workspace.store.delete_note(&EntityId::from("deleted")).await.unwrap();

    let out_dir = dir.path().join("exports");
    std::fs::create_dir_all(&out_dir).unwrap();
    run_export(ExportFormat::Json, Some(&out_dir), &db_path)
        .await
        .unwrap();

    let files = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("mate-export-"));
    assert!(name.ends_with(".json"));

    let body = std::fs::read_to_string(&files[0]).unwrap();
    assert!(body.contains("exported note"));
    assert!(!body.contains("deleted note"));
}

#[tokio::test]
async fn clear_requires_confirmation_and_keeps_sync_config() {
    let (_dir, db_path) = temp_db();
    run_note_add(&words("to be wiped"), None, None, None, &db_path)
        .await
        .unwrap();
    run_sync_config_set(
        SyncConfigArgs {
            url: Some("https://relay.example.com".to_string()),
            api_key: Some("k".repeat(32)),
            ..SyncConfigArgs::default()
        },
        &db_path,
    )
    .await
    .unwrap();

    assert!(matches!(
        run_clear(false, &db_path).await,
        Err(CliError::ConfirmationRequired)
    ));

    run_clear(true, &db_path).await.unwrap();
    let workspace = open_workspace(&db_path).await.unwrap();
    assert!(workspace.store.get_all_live_notes().await.unwrap().is_empty());
    assert!(workspace.sync.is_configured().await.unwrap());
}
