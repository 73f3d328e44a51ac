//! Store configuration, loaded from RON.
//!
//! ```ron
//! (
//!     path: Some("data/locus.db"),
//!     executor: (chunk_size: 5),
//! )
//! ```
//!
//! Every field is optional; omitted fields take their defaults.

use crate::error::Result;
use locus_core::ExecutorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for [`Store::from_config`](crate::Store::from_config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; `None` keeps the store in memory
    pub path: Option<PathBuf>,
    /// Chunking of update writes
    pub executor: ExecutorConfig,
}

impl StoreConfig {
    /// Parse a configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}
