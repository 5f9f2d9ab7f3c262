//! Exporter error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The project's column count is outside `1..=12`.
    #[error("Cannot export a {0}-column grid")]
    InvalidColumns(u8),

    /// Writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
