//! Error types for locus-core
//!
//! Everything here is a validation error: raised before a transaction
//! touches storage, and safe to surface to the caller as-is.

use crate::definition::DefinitionKind;
use crate::translation::TargetRef;
use crate::value::ValueTarget;
use crate::{RecordId, ShopId};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: DefinitionKind, name: String },

    #[error("Duplicate language code: {0}")]
    DuplicateLanguageCode(String),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: DefinitionKind, id: RecordId },

    #[error("Duplicate translation for language {language_id} and target {target}")]
    DuplicateTranslation {
        language_id: RecordId,
        target: TargetRef,
    },

    #[error("Duplicate value for location {location_id} and {target}")]
    DuplicateValue {
        location_id: RecordId,
        target: ValueTarget,
    },

    #[error("{record} belongs to shop {actual}, not {expected}")]
    ShopMismatch {
        record: String,
        expected: ShopId,
        actual: ShopId,
    },

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown fixed translation key: {0}")]
    UnknownFixedKey(String),

    #[error("Translation target must set exactly one column, found {0}")]
    InvalidTarget(usize),
}

impl Error {
    /// Whether this is a uniqueness violation on a name or language code
    pub fn is_duplicate_name(&self) -> bool {
        matches!(
            self,
            Error::DuplicateName { .. } | Error::DuplicateLanguageCode(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
