//! Service-layer errors.
//!
//! Wraps the domain and storage errors and adds the failure modes that only
//! exist at this layer: the checkout persist timeout and malformed
//! import/backup files.

use thiserror::Error;

/// Convenience alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by the sales service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation (empty cart, quantity cap, ...).
    #[error(transparent)]
    Core(#[from] tally_core::CoreError),

    /// Storage failure.
    #[error(transparent)]
    Db(#[from] tally_db::DbError),

    /// Checkout persist did not complete within the guard window.
    ///
    /// The cart is left intact so the sale can be retried.
    #[error("checkout timed out after {seconds}s; the sale was not recorded")]
    CheckoutTimeout { seconds: u64 },

    /// Backup or export file I/O failure.
    #[error("file operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backup or import file is not valid JSON.
    #[error("malformed data file: {0}")]
    Json(#[from] serde_json::Error),

    /// Import file parsed but is missing required data.
    #[error("invalid import file: {0}")]
    InvalidImport(String),
}
