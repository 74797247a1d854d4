//! Error types for the weekly-report-pdf library

use thiserror::Error;

/// Result type alias using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur at the edges of report generation.
///
/// Layout and serialization never fail at runtime; these variants only cover
/// strict request parsing and file I/O.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Request body was not valid JSON for the report schema
    #[error("Invalid report request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// Reading a request or writing a document failed
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
