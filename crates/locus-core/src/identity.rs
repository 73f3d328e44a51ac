//! Identity types for shops and tenant-owned records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a shop (tenant)
///
/// Every other record is owned by exactly one shop.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(pub String);

impl ShopId {
    /// Create a new shop ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ShopId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ShopId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque, client-assigned identifier of a record
///
/// Used for definitions, languages and locations. The value is chosen by the
/// client on create and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Create a new record ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Key of the cell at (`row`, `column`)
///
/// The row id is length-prefixed so no pair of ids can concatenate into
/// another pair's key. Column keys are `kind:id` with a colon-free kind, so
/// the remainder decodes unambiguously too.
pub(crate) fn cell_key(row: &RecordId, column: impl fmt::Display) -> String {
    format!("{}:{}\u{1f}{}", row.0.len(), row, column)
}
