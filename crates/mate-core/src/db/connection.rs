//! Local libSQL handle shared by every store area

use std::path::Path;

use libsql::{Builder, Connection};

use super::migrations;
use crate::kv::StoreResult;

const IN_MEMORY: &str = ":memory:";

/// Best-effort pragmas; in-memory databases reject WAL
const PRAGMAS: [&str; 2] = ["PRAGMA journal_mode = WAL", "PRAGMA synchronous = NORMAL"];

/// An open, migrated database file
pub struct Database {
    // Dropping the database closes the file, so it must outlive `conn`.
    _handle: libsql::Database,
    conn: Connection,
}

impl Database {
    /// Open (or create) the file at `path`, including missing parent directories
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
            _ => {}
        }
        Self::connect(&path.to_string_lossy()).await
    }

    pub async fn open_in_memory() -> StoreResult<Self> {
        Self::connect(IN_MEMORY).await
    }

    async fn connect(location: &str) -> StoreResult<Self> {
        let handle = Builder::new_local(location).build().await?;
        let conn = handle.connect()?;
        for pragma in PRAGMAS {
            if let Err(error) = conn.execute(pragma, ()).await {
                tracing::debug!(%error, pragma, "Skipped database pragma");
            }
        }
        migrations::run(&conn).await?;
        tracing::debug!(location, "Database ready");
        Ok(Self {
            _handle: handle,
            conn,
        })
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
