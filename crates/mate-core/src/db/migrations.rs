//! Schema upgrades for the key-value database

use libsql::{params, Connection, Transaction};

use crate::kv::StoreResult;

/// One schema step; `statements` run inside a single transaction
struct Migration {
    version: i64,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &["CREATE TABLE IF NOT EXISTS kv_entries (
            area TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (area, key)
        )"],
}];

/// Bring the schema up to the newest known version
pub async fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        (),
    )
    .await?;

    let applied = applied_version(conn).await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        let tx = conn.transaction().await?;
        if let Err(error) = apply(&tx, migration).await {
            tx.rollback().await.ok();
            return Err(error);
        }
        tx.commit().await?;
        tracing::info!(version = migration.version, "Applied schema migration");
    }
    Ok(())
}

async fn apply(tx: &Transaction, migration: &Migration) -> StoreResult<()> {
    for statement in migration.statements {
        tx.execute(statement, ()).await?;
    }
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        params![migration.version],
    )
    .await?;
    Ok(())
}

async fn applied_version(conn: &Connection) -> StoreResult<i64> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}
