//! Read-only views of a shop's configuration.

use crate::cascade::{read_translations_for_shop, read_value_rows_for_location};
use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{read_shop, Store};
use crate::table::Table;
use locus_core::{
    sort_for_display, CustomAction, CustomField, Language, Record, RecordId, SearchFilter, ShopId,
    Translation, ValueRow,
};

impl Store {
    /// Search filters of a shop, in display order.
    pub fn search_filters(&self, shop: &ShopId) -> Result<Vec<SearchFilter>> {
        self.list_definitions(shop)
    }

    /// Custom fields of a shop, in display order.
    pub fn custom_fields(&self, shop: &ShopId) -> Result<Vec<CustomField>> {
        self.list_definitions(shop)
    }

    /// Custom actions of a shop, in display order.
    pub fn custom_actions(&self, shop: &ShopId) -> Result<Vec<CustomAction>> {
        self.list_definitions(shop)
    }

    /// Languages of a shop, by code.
    pub fn languages(&self, shop: &ShopId) -> Result<Vec<Language>> {
        self.list_definitions(shop)
    }

    fn list_definitions<D: Table>(&self, shop: &ShopId) -> Result<Vec<D>> {
        let r = self.db.r_transaction()?;
        read_shop(&r, shop)?;
        let mut items = D::list(&r, shop)?;
        sort_for_display(&mut items);
        Ok(items)
    }

    /// The shop's full translation matrix, by language then target.
    pub fn translations(&self, shop: &ShopId) -> Result<Vec<Translation>> {
        let r = self.db.r_transaction()?;
        read_shop(&r, shop)?;
        let mut items = read_translations_for_shop(&r, shop)?
            .into_iter()
            .map(StoredTranslation::into_translation)
            .collect::<Result<Vec<_>>>()?;
        items.sort_by_key(|t| t.key());
        Ok(items)
    }

    /// Value rows of one location, by target.
    pub fn location_values(&self, shop: &ShopId, location_id: &RecordId) -> Result<Vec<ValueRow>> {
        let r = self.db.r_transaction()?;
        read_shop(&r, shop)?;
        let location: Option<StoredLocation> = r.get().primary(location_id.0.clone())?;
        match location {
            Some(location) if location.shop_id == shop.as_str() => {}
            _ => return Err(Error::LocationNotFound(location_id.clone())),
        }

        let mut items = read_value_rows_for_location(&r, location_id)?
            .into_iter()
            .map(StoredValueRow::into_row)
            .collect::<Result<Vec<_>>>()?;
        items.sort_by(|a, b| a.target.cmp(&b.target));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::store_with_shop;
    use chrono::Utc;

    #[test]
    fn test_corrupt_action_kind_surfaces() {
        let (store, shop) = store_with_shop("acme");
        store
            .sync_custom_actions(&shop, vec![CustomAction::new("book", "acme", "Book", 0)])
            .unwrap();

        let rw = store.db.rw_transaction().unwrap();
        let mut stored = StoredCustomAction::from_domain(
            &CustomAction::new("book", "acme", "Book", 0),
            Utc::now(),
        );
        stored.kind = "mailto".into();
        rw.upsert(stored).unwrap();
        rw.commit().unwrap();

        assert!(matches!(store.custom_actions(&shop), Err(Error::InvalidRow(_))));
    }

    #[test]
    fn test_reads_require_shop() {
        let (store, _) = store_with_shop("acme");
        let ghost = ShopId::from("ghost");
        assert!(matches!(store.search_filters(&ghost), Err(Error::ShopNotFound(_))));
        assert!(matches!(store.translations(&ghost), Err(Error::ShopNotFound(_))));
    }
}
