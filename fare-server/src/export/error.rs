//! Export error types.

/// Errors that can occur while exporting results.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The finished temp file could not be moved into place
    #[error("failed to persist export: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("unknown export format {0:?} (expected csv, json or xlsx)")]
    UnknownFormat(String),
}
