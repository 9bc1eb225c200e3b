use std::path::{Path, PathBuf};

use mate_core::export::{render_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::{open_workspace, write_output};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let workspace = open_workspace(db_path).await?;
    let snapshot = workspace.store.export_all().await?;
    let exported_at = workspace.store.now();
    let rendered = render_export(&snapshot, format.into(), exported_at)?;

    let target = output_path.map(|path| resolve_export_target(path, format, exported_at));
    write_output(&rendered, target.as_deref())
}

/// A directory target gets a timestamped file name inside it
pub fn resolve_export_target(path: &Path, format: ExportFormat, exported_at: i64) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(format.into(), exported_at))
    } else {
        path.to_path_buf()
    }
}
