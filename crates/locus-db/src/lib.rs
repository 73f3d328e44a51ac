//! Locus DB - Transactional reconciliation store using native_db
//!
//! Persists each shop's configuration and keeps it consistent:
//! - Definitions (search filters, custom fields, custom actions, languages)
//! - Per-location value rows for every custom field and custom action
//! - The (language x target) translation matrix
//!
//! Every `Store::sync_*` call diffs a complete desired collection against
//! storage and applies the result, with its cascades, in one transaction.

#[macro_use]
mod macros;

mod audit;
mod cascade;
mod config;
mod error;
mod lifecycle;
mod models;
mod query;
mod reorder;
mod report;
mod store;
mod sync;
mod table;

pub use audit::AuditReport;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use report::{CascadeReport, SyncOutcome, SyncReport};
pub use store::Store;
