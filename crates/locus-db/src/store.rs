//! Database store wrapper.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::*;
use locus_core::{
    CascadeContext, ChunkedExecutor, ExecutorConfig, RecordId, ShopId, TargetRef, ValueTarget,
};
use native_db::transaction::{RTransaction, RwTransaction};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredShop>().unwrap();
    models.define::<StoredLocation>().unwrap();
    models.define::<StoredSearchFilter>().unwrap();
    models.define::<StoredCustomField>().unwrap();
    models.define::<StoredCustomAction>().unwrap();
    models.define::<StoredLanguage>().unwrap();
    models.define::<StoredValueRow>().unwrap();
    models.define::<StoredTranslation>().unwrap();
    models
});

/// Database store for shop configuration.
///
/// Every mutating call runs in exactly one read-write transaction: it either
/// commits in full or leaves storage untouched.
pub struct Store {
    pub(crate) db: Database<'static>,
    pub(crate) executor: ChunkedExecutor,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self::with_database(db, ExecutorConfig::default()))
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self::with_database(db, ExecutorConfig::default()))
    }

    /// Open a store as described by a configuration.
    ///
    /// Without a `path` the store lives in memory.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let mut store = match &config.path {
            Some(path) => Self::open(path)?,
            None => Self::in_memory()?,
        };
        store.executor = ChunkedExecutor::new(config.executor.clone());
        tracing::debug!(
            path = ?config.path,
            chunk_size = store.executor.chunk_size(),
            "store opened"
        );
        Ok(store)
    }

    fn with_database(db: Database<'static>, executor: ExecutorConfig) -> Self {
        Self {
            db,
            executor: ChunkedExecutor::new(executor),
        }
    }

    /// Items written per executor chunk.
    pub fn chunk_size(&self) -> usize {
        self.executor.chunk_size()
    }
}

/// Fail with [`Error::ShopNotFound`] unless the shop exists.
pub(crate) fn ensure_shop(tx: &RwTransaction<'_>, shop: &ShopId) -> Result<()> {
    let stored: Option<StoredShop> = tx.get().primary(shop.0.clone())?;
    match stored {
        Some(_) => Ok(()),
        None => Err(Error::ShopNotFound(shop.clone())),
    }
}

/// Same as [`ensure_shop`], inside a read transaction.
pub(crate) fn read_shop(tx: &RTransaction<'_>, shop: &ShopId) -> Result<StoredShop> {
    let stored: Option<StoredShop> = tx.get().primary(shop.0.clone())?;
    stored.ok_or_else(|| Error::ShopNotFound(shop.clone()))
}

macro_rules! cascade_context {
    ($tx:expr, $shop:expr) => {{
        let shop: &ShopId = $shop;
        let key = shop.as_str();
        let locations = scan_exact!($tx, StoredLocation, StoredLocationKey::shop_id, shop_id, key);
        let languages = scan_exact!($tx, StoredLanguage, StoredLanguageKey::shop_id, shop_id, key);
        let filters =
            scan_exact!($tx, StoredSearchFilter, StoredSearchFilterKey::shop_id, shop_id, key);
        let fields =
            scan_exact!($tx, StoredCustomField, StoredCustomFieldKey::shop_id, shop_id, key);
        let actions =
            scan_exact!($tx, StoredCustomAction, StoredCustomActionKey::shop_id, shop_id, key);

        let value_targets: Vec<ValueTarget> = fields
            .iter()
            .map(|f| ValueTarget::CustomField(RecordId(f.id.clone())))
            .chain(
                actions
                    .iter()
                    .map(|a| ValueTarget::CustomAction(RecordId(a.id.clone()))),
            )
            .collect();
        let definition_targets: Vec<TargetRef> = filters
            .iter()
            .map(|f| TargetRef::SearchFilter(RecordId(f.id.clone())))
            .chain(fields.iter().map(|f| TargetRef::CustomField(RecordId(f.id.clone()))))
            .chain(actions.iter().map(|a| TargetRef::CustomAction(RecordId(a.id.clone()))))
            .collect();

        CascadeContext::new(
            shop.clone(),
            locations.into_iter().map(|l| RecordId(l.id)),
            languages.into_iter().map(|l| RecordId(l.id)),
            value_targets,
            definition_targets,
        )
    }};
}

/// Capture the shop state a cascade is derived against.
pub(crate) fn load_context(tx: &RwTransaction<'_>, shop: &ShopId) -> Result<CascadeContext> {
    Ok(cascade_context!(tx, shop))
}

/// Same as [`load_context`], inside a read transaction.
pub(crate) fn read_context(tx: &RTransaction<'_>, shop: &ShopId) -> Result<CascadeContext> {
    Ok(cascade_context!(tx, shop))
}
