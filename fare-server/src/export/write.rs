//! Atomic export to disk.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::pipeline::ResultSet;

use super::error::ExportError;
use super::format::{ExportFormat, to_bytes};

/// Write `rows` to `path`.
///
/// The bytes go to a temp file in the destination directory, which is
/// renamed over `path` only once fully written. On failure nothing is left
/// at `path`.
pub fn write_atomic(
    path: &Path,
    rows: &ResultSet,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let bytes = to_bytes(rows, format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    info!(path = %path.display(), rows = rows.len(), %format, "exported results");
    Ok(())
}
