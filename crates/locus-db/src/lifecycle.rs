//! Shop and location lifecycle.
//!
//! Creating a location is what triggers the location cascade: the new
//! location gets one empty value row per custom field and custom action of
//! its shop, in the same transaction.

use crate::cascade::{apply_cascade, value_rows_for_location};
use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{ensure_shop, load_context, read_shop, Store};
use crate::sync::ensure_location;
use chrono::Utc;
use locus_core::{CascadePlan, Location, RecordId, Shop, ShopId};
use native_db::transaction::RwTransaction;

impl Store {
    /// Register a new shop.
    pub fn create_shop(&self, shop: Shop) -> Result<Shop> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredShop> = rw.get().primary(shop.id.0.clone())?;
        if existing.is_some() {
            return Err(Error::DuplicateKey(format!("shop {}", shop.id)));
        }
        rw.insert(StoredShop::from_shop(&shop, Utc::now()))?;
        rw.commit()?;

        tracing::info!(shop = %shop.id, "shop created");
        Ok(shop)
    }

    /// Get a shop by ID.
    pub fn shop(&self, id: &ShopId) -> Result<Shop> {
        let r = self.db.r_transaction()?;
        read_shop(&r, id).map(StoredShop::into_shop)
    }

    /// Delete a shop and every row it owns.
    pub fn delete_shop(&self, id: &ShopId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredShop> = rw.get().primary(id.0.clone())?;
        let Some(stored) = stored else {
            return Err(Error::ShopNotFound(id.clone()));
        };

        let removed = remove_shop_rows(&rw, id)?;
        rw.remove(stored)?;
        rw.commit()?;

        tracing::info!(shop = %id, rows = removed, "shop deleted");
        Ok(())
    }

    /// Create a location with one empty value row per field and action.
    pub fn create_location(&self, location: Location) -> Result<Location> {
        let span = tracing::info_span!("create_location", shop = %location.shop_id, location = %location.id);
        let _enter = span.enter();

        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, &location.shop_id)?;

        let existing: Option<StoredLocation> = rw.get().primary(location.id.0.clone())?;
        match existing {
            Some(other) if other.shop_id == location.shop_id.as_str() => {
                return Err(Error::DuplicateKey(format!("location {}", location.id)));
            }
            Some(_) => {
                return Err(Error::ForeignRecord {
                    kind: "location",
                    id: location.id.0.clone(),
                });
            }
            None => {}
        }

        // The context is captured before the insert so the new location is
        // not yet one of its rows.
        let ctx = load_context(&rw, &location.shop_id)?;
        let cascade = CascadePlan::for_new_location(&location.id, &ctx);

        let now = Utc::now();
        rw.insert(StoredLocation::from_location(&location, now))?;
        let report = apply_cascade(&rw, &cascade, now)?;
        rw.commit()?;

        tracing::info!(value_rows_created = report.value_rows_created, "location created");
        Ok(location)
    }

    /// Delete a location together with its value rows.
    pub fn delete_location(&self, shop: &ShopId, id: &RecordId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;
        let stored = ensure_location(&rw, shop, id)?;

        let rows = value_rows_for_location(&rw, id)?;
        let removed = rows.len();
        for row in rows {
            rw.remove(row)?;
        }
        rw.remove(stored)?;
        rw.commit()?;

        tracing::info!(shop = %shop, location = %id, value_rows_deleted = removed, "location deleted");
        Ok(())
    }

    /// All locations of a shop, by ID.
    pub fn locations(&self, shop: &ShopId) -> Result<Vec<Location>> {
        let r = self.db.r_transaction()?;
        read_shop(&r, shop)?;

        let rows = scan_exact!(r, StoredLocation, StoredLocationKey::shop_id, shop_id, shop.as_str());
        let mut locations: Vec<Location> = rows.into_iter().map(StoredLocation::into_location).collect();
        locations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(locations)
    }
}

/// Remove every tenant-owned row of `shop`, dependents first.
fn remove_shop_rows(tx: &RwTransaction<'_>, shop: &ShopId) -> Result<usize> {
    let key = shop.as_str();
    let mut removed = 0;

    macro_rules! remove_all {
        ($stored:ty, $key:expr) => {
            for row in scan_exact!(tx, $stored, $key, shop_id, key) {
                tx.remove(row)?;
                removed += 1;
            }
        };
    }

    remove_all!(StoredTranslation, StoredTranslationKey::shop_id);
    remove_all!(StoredValueRow, StoredValueRowKey::shop_id);
    remove_all!(StoredSearchFilter, StoredSearchFilterKey::shop_id);
    remove_all!(StoredCustomField, StoredCustomFieldKey::shop_id);
    remove_all!(StoredCustomAction, StoredCustomActionKey::shop_id);
    remove_all!(StoredLanguage, StoredLanguageKey::shop_id);
    remove_all!(StoredLocation, StoredLocationKey::shop_id);

    Ok(removed)
}
