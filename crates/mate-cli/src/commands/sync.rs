use std::path::Path;

use mate_core::sync::{generate_api_key, SyncConfigUpdate, SyncOutcome};
use serde::Serialize;

use crate::commands::common::{format_timestamp, mask_secret, open_workspace};
use crate::error::CliError;

/// Flags of `mate sync config set`
#[derive(Debug, Default)]
pub struct SyncConfigArgs {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub generate_key: bool,
    pub enabled: Option<bool>,
    pub auto_sync: Option<bool>,
    pub interval: Option<u32>,
}

impl SyncConfigArgs {
    pub fn into_update(self) -> SyncConfigUpdate {
        let api_key = if self.generate_key {
            Some(generate_api_key())
        } else {
            self.api_key
        };
        SyncConfigUpdate {
            worker_url: self.url,
            api_key,
            enabled: self.enabled,
            auto_sync: self.auto_sync,
            sync_interval: self.interval,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncConfigView {
    worker_url: String,
    api_key: String,
    enabled: bool,
    auto_sync: bool,
    sync_interval: u32,
}

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let outcome = workspace.sync.sync().await.map_err(CliError::from_sync)?;
    report_outcome(&outcome)
}

fn report_outcome(outcome: &SyncOutcome) -> Result<(), CliError> {
    if !outcome.success {
        return Err(CliError::SyncFailed(
            outcome.error.clone().unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    println!("Sync completed at {}", format_timestamp(outcome.last_sync_time));
    if let Some(report) = outcome.cleanup.filter(|report| report.total() > 0) {
        println!(
            "Purged {} expired tombstone(s) ({} notes, {} prompts)",
            report.total(),
            report.notes,
            report.prompts
        );
    }
    Ok(())
}

pub async fn run_sync_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let state = workspace.sync.get_state().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("status:       {}", state.status);
    println!(
        "configured:   {}",
        if state.is_configured { "yes" } else { "no" }
    );
    println!(
        "last sync:    {}",
        state
            .last_sync_time
            .map_or_else(|| "never".to_string(), format_timestamp)
    );
    if let Some(cleanup) = state.last_cleanup_time {
        println!("last cleanup: {}", format_timestamp(cleanup));
    }
    if let Some(message) = &state.last_error_message {
        println!("last error:   {message}");
    }
    Ok(())
}

pub async fn run_sync_config_set(args: SyncConfigArgs, db_path: &Path) -> Result<(), CliError> {
    let generated = args.generate_key;
    let workspace = open_workspace(db_path).await?;
    let config = workspace.sync.update_config(args.into_update()).await?;
    // Auto-sync only runs under `mate sync watch`
    workspace.sync.stop_auto_sync();

    if generated {
        println!("API key: {}", config.api_key);
        println!("Use the same key on every device that should share data.");
    }
    print_config_lines(&config);
    Ok(())
}

pub async fn run_sync_config_show(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let config = workspace.sync.get_config().await?;

    if as_json {
        let view = SyncConfigView {
            worker_url: config.worker_url.clone(),
            api_key: mask_secret(&config.api_key),
            enabled: config.enabled,
            auto_sync: config.auto_sync,
            sync_interval: config.sync_interval,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_config_lines(&config);
    }
    Ok(())
}

fn print_config_lines(config: &mate_core::SyncConfig) {
    let url = if config.worker_url.is_empty() {
        "(not set)"
    } else {
        config.worker_url.as_str()
    };
    println!("url:        {url}");
    println!("api key:    {}", mask_secret(&config.api_key));
    println!("enabled:    {}", config.enabled);
    println!("auto sync:  {}", config.auto_sync);
    println!("interval:   {} min", config.sync_interval);
}

pub async fn run_sync_config_reset(db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    workspace.sync.reset_config().await?;
    println!("Sync configuration removed");
    Ok(())
}

pub fn run_generate_key() {
    println!("{}", generate_api_key());
}

pub async fn run_sync_watch(db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let config = workspace.sync.get_config().await?;
    if !config.is_ready() {
        return Err(CliError::SyncNotConfigured);
    }

    let outcome = workspace.sync.sync().await.map_err(CliError::from_sync)?;
    if let Err(error) = report_outcome(&outcome) {
        eprintln!("{error}");
    }

    if !workspace.sync.start_auto_sync().await? {
        return Err(CliError::AutoSyncDisabled);
    }
    println!(
        "Syncing every {} minute(s); press Ctrl-C to stop",
        config.sync_interval
    );

    tokio::signal::ctrl_c().await?;
    workspace.sync.stop_auto_sync();
    Ok(())
}
