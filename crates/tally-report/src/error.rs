//! Report generation errors.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised while rendering or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure while writing the report.
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory does not exist and could not be created.
    #[error("failed to prepare report directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
