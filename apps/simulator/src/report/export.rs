use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::report::renderer::Report;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Report export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not move report into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Writes `report` as Markdown into `dir`, replacing any previous report
/// for the same candidate. The file appears atomically or not at all.
pub fn export_report(report: &Report, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;

    let target = dir.join(report.file_name());
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(report.to_markdown().as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(&target)?;

    Ok(target)
}
