//! Error types for database operations.
//!
//! Every error aborts the surrounding transaction; none of them leaves a
//! partially applied sync behind.

use locus_core::{RecordId, ShopId};
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// The submitted collection failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] locus_core::Error),

    /// The shop does not exist.
    #[error("Shop not found: {0}")]
    ShopNotFound(ShopId),

    /// The location does not exist in the caller's shop.
    #[error("Location not found: {0}")]
    LocationNotFound(RecordId),

    /// A submitted id is already owned by another shop.
    #[error("{kind} {id} belongs to another shop")]
    ForeignRecord { kind: &'static str, id: String },

    /// A submitted row references something outside the caller's shop.
    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    /// Duplicate key.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A stored row could not be decoded.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    /// Configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The validation error, if this is one
    pub fn validation(&self) -> Option<&locus_core::Error> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

// Errors cross the executor's worker threads.
fn _assert_error_send<T: Send>() {}
fn _error_is_send() {
    _assert_error_send::<Error>();
}
