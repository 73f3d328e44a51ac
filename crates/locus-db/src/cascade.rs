//! Applying cascades and reading dependent rows.

use crate::error::Result;
use crate::models::*;
use crate::report::CascadeReport;
use chrono::{DateTime, Utc};
use locus_core::{CascadePlan, RecordId, ShopId, TranslationScope, ValueTarget};
use native_db::transaction::{RTransaction, RwTransaction};

/// Apply a cascade plan: deletes first, then creates.
///
/// Creates use `insert`, so a cell that already exists fails the call instead
/// of being silently overwritten.
pub(crate) fn apply_cascade(
    tx: &RwTransaction<'_>,
    cascade: &CascadePlan,
    now: DateTime<Utc>,
) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();

    for target in &cascade.value_targets_to_delete {
        for row in value_rows_for_target(tx, target)? {
            tx.remove(row)?;
            report.value_rows_deleted += 1;
        }
    }

    for scope in &cascade.translations_to_delete {
        let rows = match scope {
            TranslationScope::Target(target) => {
                let key = target.storage_key();
                scan_exact!(tx, StoredTranslation, StoredTranslationKey::target_key, target_key, &key)
            }
            TranslationScope::Language(id) => scan_exact!(
                tx,
                StoredTranslation,
                StoredTranslationKey::language_id,
                language_id,
                id.as_str()
            ),
        };
        for row in rows {
            tx.remove(row)?;
            report.translations_deleted += 1;
        }
    }

    for row in &cascade.value_rows_to_create {
        tx.insert(StoredValueRow::from_row(row, now))?;
        report.value_rows_created += 1;
    }

    for translation in &cascade.translations_to_create {
        tx.insert(StoredTranslation::from_translation(translation, now))?;
        report.translations_created += 1;
    }

    if report != CascadeReport::default() {
        tracing::debug!(
            value_rows_created = report.value_rows_created,
            value_rows_deleted = report.value_rows_deleted,
            translations_created = report.translations_created,
            translations_deleted = report.translations_deleted,
            "cascade applied"
        );
    }
    Ok(report)
}

/// Every value row of one custom field or custom action.
pub(crate) fn value_rows_for_target(
    tx: &RwTransaction<'_>,
    target: &ValueTarget,
) -> Result<Vec<StoredValueRow>> {
    let rows = scan_exact!(
        tx,
        StoredValueRow,
        StoredValueRowKey::definition_id,
        definition_id,
        target.definition_id().as_str()
    );
    Ok(rows
        .into_iter()
        .filter(|row| row.target_kind == target.kind_str())
        .collect())
}

/// Every value row of one location.
pub(crate) fn value_rows_for_location(
    tx: &RwTransaction<'_>,
    location_id: &RecordId,
) -> Result<Vec<StoredValueRow>> {
    Ok(scan_exact!(
        tx,
        StoredValueRow,
        StoredValueRowKey::location_id,
        location_id,
        location_id.as_str()
    ))
}

/// Every value row of one location, inside a read transaction.
pub(crate) fn read_value_rows_for_location(
    tx: &RTransaction<'_>,
    location_id: &RecordId,
) -> Result<Vec<StoredValueRow>> {
    Ok(scan_exact!(
        tx,
        StoredValueRow,
        StoredValueRowKey::location_id,
        location_id,
        location_id.as_str()
    ))
}

/// Every value row of the shop.
pub(crate) fn value_rows_for_shop(
    tx: &RwTransaction<'_>,
    shop: &ShopId,
) -> Result<Vec<StoredValueRow>> {
    Ok(scan_exact!(
        tx,
        StoredValueRow,
        StoredValueRowKey::shop_id,
        shop_id,
        shop.as_str()
    ))
}

/// Every translation row of the shop.
pub(crate) fn translations_for_shop(
    tx: &RwTransaction<'_>,
    shop: &ShopId,
) -> Result<Vec<StoredTranslation>> {
    Ok(scan_exact!(
        tx,
        StoredTranslation,
        StoredTranslationKey::shop_id,
        shop_id,
        shop.as_str()
    ))
}

/// Every translation row of the shop, inside a read transaction.
pub(crate) fn read_translations_for_shop(
    tx: &RTransaction<'_>,
    shop: &ShopId,
) -> Result<Vec<StoredTranslation>> {
    Ok(scan_exact!(
        tx,
        StoredTranslation,
        StoredTranslationKey::shop_id,
        shop_id,
        shop.as_str()
    ))
}

/// Every value row of the shop, inside a read transaction.
pub(crate) fn read_value_rows_for_shop(
    tx: &RTransaction<'_>,
    shop: &ShopId,
) -> Result<Vec<StoredValueRow>> {
    Ok(scan_exact!(
        tx,
        StoredValueRow,
        StoredValueRowKey::shop_id,
        shop_id,
        shop.as_str()
    ))
}
