//! Atomic TSV output
//!
//! Rows are staged into a temporary file in the destination directory
//! and renamed into place only once everything is written, so a failed
//! or interrupted run never leaves a partial manifest at the output
//! path and never disturbs a file left there by an earlier run.

use super::{ManifestRow, MANIFEST_COLUMNS};
use crate::error::{ManifestError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write the manifest for a fully successful run
pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<()> {
    let dir = output_dir(path);
    fs::create_dir_all(&dir)?;

    let mut staged = NamedTempFile::new_in(&dir)?;
    writeln!(staged, "{}", MANIFEST_COLUMNS.join("\t"))?;
    for row in rows {
        writeln!(staged, "{}", row.to_tsv_line())?;
    }
    staged.flush()?;

    debug!(rows = rows.len(), path = %path.display(), "persisting manifest");
    staged
        .persist(path)
        .map_err(|e| ManifestError::Io(e.error))?;

    Ok(())
}

/// Directory the output lands in; the staging file must live on the same
/// filesystem for the rename to be atomic.
fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
