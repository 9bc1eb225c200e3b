use std::env;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::commands::common::normalize_content;
use crate::error::CliError;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

/// External editor command, e.g. `code --wait` split into program and args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// `$VISUAL`, then `$EDITOR`, then the platform default
    pub fn from_env() -> Self {
        let configured = env::var("VISUAL").or_else(|_| env::var("EDITOR")).ok();
        Self::parse(configured.as_deref())
    }

    pub fn parse(command: Option<&str>) -> Self {
        let mut parts = command
            .map(str::split_whitespace)
            .into_iter()
            .flatten()
            .map(str::to_string);
        match parts.next() {
            Some(program) => Self {
                program,
                args: parts.collect(),
            },
            None => Self {
                program: FALLBACK_EDITOR.to_string(),
                args: Vec::new(),
            },
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Open `initial` in the editor and return the saved text, `None` if blank
    pub fn edit(&self, initial: &str) -> Result<Option<String>, CliError> {
        let scratch = scratch_file_path();
        std::fs::write(&scratch, initial)?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&scratch)
            .status();
        let edited = std::fs::read_to_string(&scratch);
        std::fs::remove_file(&scratch).ok();

        let status = status?;
        if !status.success() {
            return Err(CliError::EditorFailed(format!(
                "`{}` exited with {status}",
                self.program
            )));
        }
        Ok(normalize_content(&edited?))
    }
}

fn scratch_file_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    env::temp_dir().join(format!("mate-{}-{nanos}.md", std::process::id()))
}
