use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mate_core::NoteCategory;

#[derive(Parser)]
#[command(name = "mate")]
#[command(about = "Capture notes, reuse prompts, and sync them through a Mate relay")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Quick capture: mate "something worth keeping"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture and manage notes
    #[command(alias = "notes")]
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Manage reusable prompts
    #[command(alias = "prompts")]
    Prompt {
        #[command(subcommand)]
        command: PromptCommands,
    },
    /// Sync with a Mate relay
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Purge tombstones older than the retention window
    Cleanup {
        /// Keep tombstones younger than this many days
        #[arg(long, value_name = "DAYS", default_value_t = 30)]
        retention_days: u64,
    },
    /// Export live notes and prompts
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Delete every note, prompt and setting on this device
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note content (stdin or $EDITOR when omitted)
        content: Vec<String>,
        /// Category (defaults to the configured default category)
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Page the text came from
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Title of the page the text came from
        #[arg(long)]
        title: Option<String>,
    },
    /// List recent notes
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Only show notes in this category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a note in full
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Move the note to another category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Replacement content ($EDITOR when omitted and no category is given)
        content: Vec<String>,
    },
    /// Delete an existing note
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Search notes
    Search {
        /// Search query
        query: String,
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PromptCommands {
    /// Create a new prompt
    #[command(alias = "new")]
    Add {
        /// Trigger key (letters, digits, `-` and `_`)
        key: String,
        /// Display title (defaults to the key)
        #[arg(long)]
        title: Option<String>,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Prompt content (stdin or $EDITOR when omitted)
        content: Vec<String>,
    },
    /// List prompts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a prompt in full
    Show {
        /// Prompt key
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing prompt
    Edit {
        /// Prompt key
        key: String,
        /// Rename the trigger key
        #[arg(long, value_name = "KEY")]
        new_key: Option<String>,
        /// New display title
        #[arg(long)]
        title: Option<String>,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// Replacement content ($EDITOR when omitted and no other field changes)
        content: Vec<String>,
    },
    /// Delete an existing prompt
    Delete {
        /// Prompt key
        key: String,
    },
    /// Print the content a prompt key expands to
    Expand {
        /// Prompt key
        key: String,
    },
    /// Search prompts by key, title, content or description
    Search {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Run one sync round-trip (default)
    Run,
    /// Show the last sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the relay configuration
    Config {
        #[command(subcommand)]
        command: SyncConfigCommands,
    },
    /// Print a fresh random API key
    GenerateKey,
    /// Sync now, then keep syncing on the configured interval until Ctrl-C
    Watch,
}

#[derive(Subcommand)]
pub enum SyncConfigCommands {
    /// Update relay settings; omitted fields keep their value
    Set {
        /// Relay base URL (http:// or https://)
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Shared API key; devices with the same key share data
        #[arg(long, value_name = "KEY", conflicts_with = "generate_key")]
        api_key: Option<String>,
        /// Generate and store a new random API key
        #[arg(long)]
        generate_key: bool,
        /// Turn sync on or off
        #[arg(long, value_name = "BOOL")]
        enabled: Option<bool>,
        /// Turn periodic sync on or off
        #[arg(long, value_name = "BOOL")]
        auto_sync: Option<bool>,
        /// Minutes between automatic syncs (1-1440)
        #[arg(long, value_name = "MINUTES")]
        interval: Option<u32>,
    },
    /// Print the relay configuration with the API key masked
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the relay configuration and sync status
    Reset,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings as JSON
    Show,
    /// Update settings; omitted fields keep their value
    Set {
        /// Category preselected when capturing
        #[arg(long, value_enum)]
        default_category: Option<CategoryArg>,
        /// Show capture confirmations
        #[arg(long, value_name = "BOOL")]
        notifications: Option<bool>,
        /// Text pattern that opens the prompt picker
        #[arg(long, value_name = "PATTERN")]
        prompt_trigger: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CategoryArg {
    Inspiration,
    Todo,
    Principle,
    Other,
}

impl From<CategoryArg> for NoteCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Inspiration => Self::Inspiration,
            CategoryArg::Todo => Self::Todo,
            CategoryArg::Principle => Self::Principle,
            CategoryArg::Other => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for mate_core::export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
