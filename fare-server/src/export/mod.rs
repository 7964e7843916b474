//! Result export.
//!
//! CSV and JSON renditions of a ranked result set. The CSV header is the
//! row type's field list in its fixed column order.

mod error;
mod format;
mod write;

pub use error::ExportError;
pub use format::{ExportFormat, to_bytes};
pub use write::write_atomic;
