//! Locus Core - Reconciliation planning for store-locator configuration
//!
//! Each shop (tenant) owns ordered collections of definitions (search filters,
//! custom fields, custom actions, languages), per-location value rows bound to
//! those definitions, and a translation matrix over (language x target). This
//! crate holds the storage-free half of keeping them consistent:
//!
//! - Identity and domain types (`ShopId`, `RecordId`, the definition variants,
//!   `TargetRef`, `ValueRow`, `Translation`)
//! - `IdentitySet` and the `Plan` diff of current vs desired state
//! - Uniqueness and ownership guards run before any write
//! - The single-step position swap
//! - `ChunkedExecutor` for bounded-concurrency writes
//! - `CascadePlan` derivation over the value and translation matrices
//!
//! Persistence and the transactional boundary live in `locus-db`.

mod cascade;
mod definition;
mod error;
mod executor;
pub mod guard;
mod identity;
mod identity_set;
mod location;
mod matrix;
mod plan;
mod position;
mod translation;
mod value;

pub use cascade::{CascadeContext, CascadePlan, TranslationScope};
pub use definition::{
    sort_for_display, ActionKind, CustomAction, CustomField, Definition, DefinitionKind, Language,
    Positioned, Record, SearchFilter,
};
pub use error::{Error, Result};
pub use executor::{ChunkedExecutor, ExecutorConfig, DEFAULT_CHUNK_SIZE};
pub use identity::{RecordId, ShopId};
pub use identity_set::IdentitySet;
pub use location::{Location, Shop};
pub use matrix::{CellMatrix, MatrixDiff, TranslationMatrix, ValueMatrix};
pub use plan::Plan;
pub use position::{swap_with_neighbor, Direction};
pub use translation::{
    translation_storage_key, FixedKey, TargetColumns, TargetRef, Translation, TranslationKey,
};
pub use value::{value_storage_key, ValueKey, ValueRow, ValueTarget};
