use std::path::Path;
use std::time::Duration;

use mate_core::sync::TombstoneJanitor;

use crate::commands::common::open_workspace;
use crate::error::CliError;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub fn retention_from_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
}

pub async fn run_cleanup(retention_days: u64, db_path: &Path) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let janitor = TombstoneJanitor::new(
        retention_from_days(retention_days),
        workspace.sync.janitor().min_interval(),
    );
    let report = workspace.sync.run_cleanup(&janitor).await?;

    if report.total() == 0 {
        println!("No tombstones older than {retention_days} day(s)");
    } else {
        println!(
            "Purged {} tombstone(s) ({} notes, {} prompts)",
            report.total(),
            report.notes,
            report.prompts
        );
    }
    Ok(())
}
