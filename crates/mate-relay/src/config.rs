use std::collections::HashMap;
use std::env;

use thiserror::Error;

/// Value of `MATE_RELAY_DB_PATH` selecting a non-persistent database
pub const IN_MEMORY_DB: &str = ":memory:";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_DB_PATH: &str = "mate-relay.db";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const MIN_MAX_BODY_BYTES: usize = 1024;
const MAX_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind_addr: String,
    /// Database file, or [`IN_MEMORY_DB`]
    pub db_path: String,
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "MATE_RELAY_BIND_ADDR", DEFAULT_BIND_ADDR);
        let db_path = value_or_default(&lookup, "MATE_RELAY_DB_PATH", DEFAULT_DB_PATH);

        let max_body_bytes = match optional_trimmed(&lookup, "MATE_RELAY_MAX_BODY_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "MATE_RELAY_MAX_BODY_BYTES must be an integer in \
                     [{MIN_MAX_BODY_BYTES}, {MAX_MAX_BODY_BYTES}]"
                ))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        if !(MIN_MAX_BODY_BYTES..=MAX_MAX_BODY_BYTES).contains(&max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "MATE_RELAY_MAX_BODY_BYTES must be in [{MIN_MAX_BODY_BYTES}, {MAX_MAX_BODY_BYTES}]"
            )));
        }

        Ok(Self {
            bind_addr,
            db_path,
            max_body_bytes,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY_DB
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
