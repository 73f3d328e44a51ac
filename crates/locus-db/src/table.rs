//! Per-variant storage capability for definitions.
//!
//! The sync pipeline is written once against [`Table`]; each definition
//! variant supplies the row conversion and the native_db calls for its own
//! stored model.

use crate::error::{Error, Result};
use crate::models::*;
use chrono::{DateTime, Utc};
use locus_core::{
    CustomAction, CustomField, Definition, Language, RecordId, SearchFilter, ShopId,
};
use native_db::transaction::{RTransaction, RwTransaction};

/// Storage operations for one definition variant.
pub(crate) trait Table: Definition + Sized {
    /// The native_db model this variant is stored as.
    type Stored: Send;

    /// Encode for storage.
    fn to_stored(&self, now: DateTime<Utc>) -> Self::Stored;

    /// All rows of the shop, inside a write transaction.
    fn load(tx: &RwTransaction<'_>, shop: &ShopId) -> Result<Vec<Self>>;

    /// All rows of the shop, inside a read transaction.
    fn list(tx: &RTransaction<'_>, shop: &ShopId) -> Result<Vec<Self>>;

    /// The shop owning `id`, if the row exists in any shop.
    fn owner(tx: &RwTransaction<'_>, id: &RecordId) -> Result<Option<ShopId>>;

    /// Insert a new row; fails if the key exists.
    fn insert(tx: &RwTransaction<'_>, stored: Self::Stored) -> Result<()>;

    /// Overwrite a row.
    fn upsert(tx: &RwTransaction<'_>, stored: Self::Stored) -> Result<()>;

    /// Remove a row if it exists.
    fn remove(tx: &RwTransaction<'_>, id: &RecordId) -> Result<()>;
}

macro_rules! definition_table {
    ($domain:ty, $stored:ident, $key:ident) => {
        impl Table for $domain {
            type Stored = $stored;

            fn to_stored(&self, now: DateTime<Utc>) -> $stored {
                $stored::from_domain(self, now)
            }

            fn load(tx: &RwTransaction<'_>, shop: &ShopId) -> Result<Vec<Self>> {
                let rows = scan_exact!(tx, $stored, $key::shop_id, shop_id, shop.as_str());
                rows.into_iter().map($stored::into_domain).collect()
            }

            fn list(tx: &RTransaction<'_>, shop: &ShopId) -> Result<Vec<Self>> {
                let rows = scan_exact!(tx, $stored, $key::shop_id, shop_id, shop.as_str());
                rows.into_iter().map($stored::into_domain).collect()
            }

            fn owner(tx: &RwTransaction<'_>, id: &RecordId) -> Result<Option<ShopId>> {
                let stored: Option<$stored> = tx.get().primary(id.0.clone())?;
                Ok(stored.map(|s| ShopId(s.shop_id)))
            }

            fn insert(tx: &RwTransaction<'_>, stored: $stored) -> Result<()> {
                tx.insert(stored)?;
                Ok(())
            }

            fn upsert(tx: &RwTransaction<'_>, stored: $stored) -> Result<()> {
                tx.upsert(stored)?;
                Ok(())
            }

            fn remove(tx: &RwTransaction<'_>, id: &RecordId) -> Result<()> {
                let stored: Option<$stored> = tx.get().primary(id.0.clone())?;
                if let Some(s) = stored {
                    tx.remove(s)?;
                }
                Ok(())
            }
        }
    };
}

definition_table!(SearchFilter, StoredSearchFilter, StoredSearchFilterKey);
definition_table!(CustomField, StoredCustomField, StoredCustomFieldKey);
definition_table!(CustomAction, StoredCustomAction, StoredCustomActionKey);
definition_table!(Language, StoredLanguage, StoredLanguageKey);

/// Fail with [`Error::ForeignRecord`] if any of `ids` is already taken.
///
/// Called for creates only: an id absent from the caller's shop but present
/// in storage belongs to another shop and must not be adopted.
pub(crate) fn ensure_unclaimed<'a, D: Table>(
    tx: &RwTransaction<'_>,
    ids: impl IntoIterator<Item = &'a RecordId>,
) -> Result<()> {
    for id in ids {
        if D::owner(tx, id)?.is_some() {
            return Err(Error::ForeignRecord {
                kind: D::KIND.as_str(),
                id: id.0.clone(),
            });
        }
    }
    Ok(())
}
