//! Airport directory error types.

use std::path::PathBuf;

/// Errors that can occur when loading the airport directory.
#[derive(Debug, thiserror::Error)]
pub enum AirportError {
    /// The file could not be opened
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV or lacks the expected header
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No usable rows were found
    #[error("no valid airports in directory")]
    Empty,
}
