//! Mate CLI - capture notes and expand prompts from the terminal
//!
//! Shares its storage format and sync protocol with every other Mate front
//! end, so a terminal and a browser can sync through the same relay.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{
    Cli, Commands, NoteCommands, PromptCommands, SettingsCommands, SyncCommands,
    SyncConfigCommands,
};
use crate::commands::cleanup::run_cleanup;
use crate::commands::clear::run_clear;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::export::run_export;
use crate::commands::note::{
    run_note_add, run_note_delete, run_note_edit, run_note_list, run_note_search, run_note_show,
};
use crate::commands::prompt::{
    run_prompt_add, run_prompt_delete, run_prompt_edit, run_prompt_expand, run_prompt_list,
    run_prompt_search, run_prompt_show,
};
use crate::commands::settings::{run_settings_set, run_settings_show};
use crate::commands::sync::{
    run_generate_key, run_sync, run_sync_config_reset, run_sync_config_set, run_sync_config_show,
    run_sync_status, run_sync_watch, SyncConfigArgs,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mate=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Some(Commands::Note { command }) => match command {
            NoteCommands::Add {
                content,
                category,
                url,
                title,
            } => {
                run_note_add(
                    &content,
                    category.map(Into::into),
                    url.as_deref(),
                    title.as_deref(),
                    &db_path,
                )
                .await?;
            }
            NoteCommands::List {
                limit,
                category,
                json,
            } => run_note_list(limit, category.map(Into::into), json, &db_path).await?,
            NoteCommands::Show { id, json } => run_note_show(&id, json, &db_path).await?,
            NoteCommands::Edit {
                id,
                category,
                content,
            } => run_note_edit(&id, category.map(Into::into), &content, &db_path).await?,
            NoteCommands::Delete { id } => run_note_delete(&id, &db_path).await?,
            NoteCommands::Search { query, limit, json } => {
                run_note_search(&query, limit, json, &db_path).await?;
            }
        },
        Some(Commands::Prompt { command }) => match command {
            PromptCommands::Add {
                key,
                title,
                description,
                content,
            } => run_prompt_add(&key, title.as_deref(), description, &content, &db_path).await?,
            PromptCommands::List { json } => run_prompt_list(json, &db_path).await?,
            PromptCommands::Show { key, json } => run_prompt_show(&key, json, &db_path).await?,
            PromptCommands::Edit {
                key,
                new_key,
                title,
                description,
                content,
            } => {
                run_prompt_edit(
                    &key,
                    new_key.as_deref(),
                    title.as_deref(),
                    description,
                    &content,
                    &db_path,
                )
                .await?;
            }
            PromptCommands::Delete { key } => run_prompt_delete(&key, &db_path).await?,
            PromptCommands::Expand { key } => run_prompt_expand(&key, &db_path).await?,
            PromptCommands::Search { query, json } => {
                run_prompt_search(&query, json, &db_path).await?;
            }
        },
        Some(Commands::Sync { command }) => match command.unwrap_or(SyncCommands::Run) {
            SyncCommands::Run => run_sync(&db_path).await?,
            SyncCommands::Status { json } => run_sync_status(json, &db_path).await?,
            SyncCommands::Config { command } => match command {
                SyncConfigCommands::Set {
                    url,
                    api_key,
                    generate_key,
                    enabled,
                    auto_sync,
                    interval,
                } => {
                    let args = SyncConfigArgs {
                        url,
                        api_key,
                        generate_key,
                        enabled,
                        auto_sync,
                        interval,
                    };
                    run_sync_config_set(args, &db_path).await?;
                }
                SyncConfigCommands::Show { json } => run_sync_config_show(json, &db_path).await?,
                SyncConfigCommands::Reset => run_sync_config_reset(&db_path).await?,
            },
            SyncCommands::GenerateKey => run_generate_key(),
            SyncCommands::Watch => run_sync_watch(&db_path).await?,
        },
        Some(Commands::Cleanup { retention_days }) => {
            run_cleanup(retention_days, &db_path).await?;
        }
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &db_path).await?;
        }
        Some(Commands::Settings { command }) => match command {
            SettingsCommands::Show => run_settings_show(&db_path).await?,
            SettingsCommands::Set {
                default_category,
                notifications,
                prompt_trigger,
            } => {
                run_settings_set(
                    default_category.map(Into::into),
                    notifications,
                    prompt_trigger.as_deref(),
                    &db_path,
                )
                .await?;
            }
        },
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Clear { yes }) => run_clear(yes, &db_path).await?,
        None => {
            // Quick capture mode: mate "my note"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_note_add(&cli.note, None, None, None, &db_path).await?;
            }
        }
    }

    Ok(())
}
