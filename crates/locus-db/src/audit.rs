//! Completeness audit of the dependent tables.
//!
//! A healthy shop stores exactly one value row per (location, field or
//! action) and exactly one translation per (language, target). The sync
//! pipeline keeps it that way; the audit checks, and `repair` restores it for
//! data written by other means.

use crate::cascade::{
    read_translations_for_shop, read_value_rows_for_shop, translations_for_shop,
    value_rows_for_shop,
};
use crate::error::Result;
use crate::models::*;
use crate::store::{ensure_shop, load_context, read_context, read_shop, Store};
use chrono::Utc;
use locus_core::{
    translation_storage_key, value_storage_key, CascadeContext, MatrixDiff, RecordId, ShopId,
    TargetRef, Translation, ValueRow, ValueTarget,
};
use native_db::transaction::RwTransaction;

/// Cells that break matrix completeness for one shop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// (location, target) cells
    pub value_cells: MatrixDiff<RecordId, ValueTarget>,
    /// (language, target) cells
    pub translation_cells: MatrixDiff<RecordId, TargetRef>,
}

impl AuditReport {
    /// True when nothing is missing or orphaned
    pub fn is_clean(&self) -> bool {
        self.value_cells.is_clean() && self.translation_cells.is_clean()
    }

    fn build(
        ctx: &CascadeContext,
        value_rows: Vec<StoredValueRow>,
        translations: Vec<StoredTranslation>,
    ) -> Result<Self> {
        let value_cells = value_rows
            .into_iter()
            .map(|row| Ok((RecordId(row.location_id.clone()), row.target()?)))
            .collect::<Result<Vec<_>>>()?;
        let translation_cells = translations
            .into_iter()
            .map(|row| Ok((RecordId(row.language_id.clone()), row.target()?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            value_cells: ctx.value_matrix().diff(value_cells),
            translation_cells: ctx.translation_matrix().diff(translation_cells),
        })
    }
}

impl Store {
    /// Compare a shop's dependent rows against its expected matrices.
    pub fn audit(&self, shop: &ShopId) -> Result<AuditReport> {
        let r = self.db.r_transaction()?;
        read_shop(&r, shop)?;
        let ctx = read_context(&r, shop)?;
        AuditReport::build(
            &ctx,
            read_value_rows_for_shop(&r, shop)?,
            read_translations_for_shop(&r, shop)?,
        )
    }

    /// Create missing cells empty and delete orphaned ones.
    ///
    /// Returns the audit the repair acted on.
    pub fn repair(&self, shop: &ShopId) -> Result<AuditReport> {
        let span = tracing::info_span!("repair", shop = %shop);
        let _enter = span.enter();

        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;
        let ctx = load_context(&rw, shop)?;
        let report = AuditReport::build(
            &ctx,
            value_rows_for_shop(&rw, shop)?,
            translations_for_shop(&rw, shop)?,
        )?;
        if report.is_clean() {
            return Ok(report);
        }

        let now = Utc::now();
        for (location, target) in &report.value_cells.orphaned {
            remove_value_cell(&rw, location, target)?;
        }
        for (language, target) in &report.translation_cells.orphaned {
            remove_translation_cell(&rw, language, target)?;
        }
        for (location, target) in &report.value_cells.missing {
            let row = ValueRow::empty(shop.clone(), location.clone(), target.clone());
            rw.insert(StoredValueRow::from_row(&row, now))?;
        }
        for (language, target) in &report.translation_cells.missing {
            let translation = Translation::empty(shop.clone(), language.clone(), target.clone());
            rw.insert(StoredTranslation::from_translation(&translation, now))?;
        }
        rw.commit()?;

        tracing::warn!(
            value_rows_missing = report.value_cells.missing.len(),
            value_rows_orphaned = report.value_cells.orphaned.len(),
            translations_missing = report.translation_cells.missing.len(),
            translations_orphaned = report.translation_cells.orphaned.len(),
            "repaired shop"
        );
        Ok(report)
    }
}

fn remove_value_cell(tx: &RwTransaction<'_>, location: &RecordId, target: &ValueTarget) -> Result<()> {
    let stored: Option<StoredValueRow> = tx.get().primary(value_storage_key(location, target))?;
    if let Some(row) = stored {
        tx.remove(row)?;
    }
    Ok(())
}

fn remove_translation_cell(
    tx: &RwTransaction<'_>,
    language: &RecordId,
    target: &TargetRef,
) -> Result<()> {
    let stored: Option<StoredTranslation> =
        tx.get().primary(translation_storage_key(language, target))?;
    if let Some(row) = stored {
        tx.remove(row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::store_with_shop;
    use locus_core::{CustomField, FixedKey, Language, Location};

    fn seeded() -> (Store, ShopId) {
        let (store, shop) = store_with_shop("acme");
        store
            .sync_languages(&shop, vec![Language::new("en", "acme", "en")])
            .unwrap();
        store
            .sync_custom_fields(&shop, vec![CustomField::new("hours", "acme", "Hours", 0)])
            .unwrap();
        store.create_location(Location::new("L1", "acme", "Main St")).unwrap();
        (store, shop)
    }

    #[test]
    fn test_synced_shop_is_clean() {
        let (store, shop) = seeded();
        let report = store.audit(&shop).unwrap();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_repair_restores_missing_and_orphaned() {
        let (store, shop) = seeded();
        let hours = ValueTarget::CustomField(RecordId::from("hours"));
        let phone = TargetRef::Fixed(FixedKey::Phone);

        // Damage storage behind the engine's back.
        let rw = store.db.rw_transaction().unwrap();
        remove_value_cell(&rw, &RecordId::from("L1"), &hours).unwrap();
        remove_translation_cell(&rw, &RecordId::from("en"), &phone).unwrap();
        let stray = ValueRow::empty(
            shop.clone(),
            RecordId::from("L1"),
            ValueTarget::CustomAction(RecordId::from("deleted")),
        );
        rw.insert(StoredValueRow::from_row(&stray, Utc::now())).unwrap();
        rw.commit().unwrap();

        let report = store.audit(&shop).unwrap();
        assert_eq!(report.value_cells.missing, vec![(RecordId::from("L1"), hours.clone())]);
        assert_eq!(report.value_cells.orphaned, vec![(RecordId::from("L1"), stray.target.clone())]);
        assert_eq!(report.translation_cells.missing, vec![(RecordId::from("en"), phone)]);
        assert!(report.translation_cells.orphaned.is_empty());

        let repaired = store.repair(&shop).unwrap();
        assert_eq!(repaired, report);
        assert!(store.audit(&shop).unwrap().is_clean());

        let values = store.location_values(&shop, &RecordId::from("L1")).unwrap();
        assert_eq!(values, vec![ValueRow::empty(shop.clone(), RecordId::from("L1"), hours)]);
    }

    #[test]
    fn test_repair_clean_shop_is_noop() {
        let (store, shop) = seeded();
        let before = store.translations(&shop).unwrap();
        assert!(store.repair(&shop).unwrap().is_clean());
        assert_eq!(store.translations(&shop).unwrap(), before);
    }
}
