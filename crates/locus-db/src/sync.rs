//! Transactional reconciliation of shop collections.
//!
//! Every `sync_*` call takes the caller's complete desired state for one
//! collection and makes storage match it:
//!
//! 1. validate the desired rows (uniqueness, shop ownership) without a transaction
//! 2. open a read-write transaction and diff against the persisted rows
//! 3. apply deletes, then creates, then the dependent-row cascade
//! 4. apply updates through the [`ChunkedExecutor`](locus_core::ChunkedExecutor)
//! 5. re-read the collection and commit
//!
//! Any error returns before `commit`, and dropping the uncommitted
//! transaction rolls everything back.
//!
//! Concurrent syncs for the same shop are serialised by the store but not
//! versioned: the last one to commit wins.

use crate::cascade::{apply_cascade, translations_for_shop, value_rows_for_location};
use crate::error::{Error, Result};
use crate::models::*;
use crate::report::{SyncOutcome, SyncReport};
use crate::store::{ensure_shop, load_context, Store};
use crate::table::{ensure_unclaimed, Table};
use chrono::{DateTime, Utc};
use locus_core::{
    guard, sort_for_display, CascadePlan, CustomAction, CustomField, Definition, IdentitySet,
    Language, Plan, Record, RecordId, SearchFilter, ShopId, Translation, ValueRow,
};
use native_db::transaction::RwTransaction;

impl Store {
    /// Reconcile a shop's search filters.
    pub fn sync_search_filters(
        &self,
        shop: &ShopId,
        desired: Vec<SearchFilter>,
    ) -> Result<Vec<SearchFilter>> {
        self.sync_definitions(shop, desired).map(|o| o.items)
    }

    /// Reconcile a shop's search filters and report what changed.
    pub fn sync_search_filters_with_report(
        &self,
        shop: &ShopId,
        desired: Vec<SearchFilter>,
    ) -> Result<SyncOutcome<SearchFilter>> {
        self.sync_definitions(shop, desired)
    }

    /// Reconcile a shop's custom fields.
    ///
    /// New fields get an empty value row per location and an empty
    /// translation per language; removed fields take theirs with them.
    pub fn sync_custom_fields(
        &self,
        shop: &ShopId,
        desired: Vec<CustomField>,
    ) -> Result<Vec<CustomField>> {
        self.sync_definitions(shop, desired).map(|o| o.items)
    }

    /// Reconcile a shop's custom fields and report what changed.
    pub fn sync_custom_fields_with_report(
        &self,
        shop: &ShopId,
        desired: Vec<CustomField>,
    ) -> Result<SyncOutcome<CustomField>> {
        self.sync_definitions(shop, desired)
    }

    /// Reconcile a shop's custom actions.
    pub fn sync_custom_actions(
        &self,
        shop: &ShopId,
        desired: Vec<CustomAction>,
    ) -> Result<Vec<CustomAction>> {
        self.sync_definitions(shop, desired).map(|o| o.items)
    }

    /// Reconcile a shop's custom actions and report what changed.
    pub fn sync_custom_actions_with_report(
        &self,
        shop: &ShopId,
        desired: Vec<CustomAction>,
    ) -> Result<SyncOutcome<CustomAction>> {
        self.sync_definitions(shop, desired)
    }

    /// Reconcile a shop's languages.
    ///
    /// New languages get an empty translation for every target; removed
    /// languages take all their translations with them.
    pub fn sync_languages(&self, shop: &ShopId, desired: Vec<Language>) -> Result<Vec<Language>> {
        self.sync_definitions(shop, desired).map(|o| o.items)
    }

    /// Reconcile a shop's languages and report what changed.
    pub fn sync_languages_with_report(
        &self,
        shop: &ShopId,
        desired: Vec<Language>,
    ) -> Result<SyncOutcome<Language>> {
        self.sync_definitions(shop, desired)
    }

    fn sync_definitions<D: Table>(&self, shop: &ShopId, desired: Vec<D>) -> Result<SyncOutcome<D>> {
        let span = tracing::info_span!("sync", shop = %shop, kind = D::KIND.as_str());
        let _enter = span.enter();

        guard::validate_shop(shop, &desired, |d: &D| d.shop_id()).map_err(rejected)?;
        let desired = guard::validate_definitions(desired).map_err(rejected)?;

        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;

        let current: IdentitySet<D> = D::load(&rw, shop)?.into_iter().collect();
        let plan = Plan::build(&current, &desired);
        ensure_unclaimed::<D>(&rw, plan.to_create.iter().map(|d| d.id()))?;

        let ctx = load_context(&rw, shop)?;
        let cascade = CascadePlan::for_definitions(&plan, &ctx);
        tracing::debug!(
            writes = plan.write_count(),
            create = plan.to_create.len(),
            update = plan.to_update.len(),
            delete = plan.to_delete.len(),
            unchanged = plan.unchanged.len(),
            "plan built"
        );

        let mut report = SyncReport::from_plan(&plan);
        let now = Utc::now();

        for deleted in &plan.to_delete {
            D::remove(&rw, deleted.id())?;
        }
        for created in &plan.to_create {
            D::insert(&rw, created.to_stored(now))?;
        }
        report.cascade = apply_cascade(&rw, &cascade, now)?;
        self.executor.run(
            plan.to_update,
            |row: D| Ok(row.to_stored(now)),
            |stored| D::upsert(&rw, stored),
        )?;

        let mut items = D::load(&rw, shop)?;
        sort_for_display(&mut items);
        rw.commit()?;

        log_committed(&report);
        Ok(SyncOutcome { items, report })
    }

    /// Reconcile a shop's translations.
    ///
    /// Rows are matched by (language, target). A persisted cell missing from
    /// `desired` is reset to the empty string rather than deleted, so the
    /// translation matrix stays complete.
    pub fn sync_translations(
        &self,
        shop: &ShopId,
        desired: Vec<Translation>,
    ) -> Result<Vec<Translation>> {
        self.sync_translations_with_report(shop, desired)
            .map(|o| o.items)
    }

    /// Reconcile a shop's translations and report what changed.
    pub fn sync_translations_with_report(
        &self,
        shop: &ShopId,
        desired: Vec<Translation>,
    ) -> Result<SyncOutcome<Translation>> {
        let span = tracing::info_span!("sync", shop = %shop, kind = "translation");
        let _enter = span.enter();

        guard::validate_shop(shop, &desired, |t: &Translation| &t.shop_id).map_err(rejected)?;
        let desired = guard::validate_translations(desired).map_err(rejected)?;

        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;

        let ctx = load_context(&rw, shop)?;
        for translation in desired.iter() {
            if !ctx.has_translation_cell(&translation.language_id, &translation.target) {
                return Err(unknown_reference(format!(
                    "translation for language {} and target {}",
                    translation.language_id, translation.target
                )));
            }
        }

        let current = decode_translations(translations_for_shop(&rw, shop)?)?;
        let plan = Plan::build(&current, &desired);
        let report = self.apply_cells(&rw, plan)?;

        let mut items = decode_translations(translations_for_shop(&rw, shop)?)?.into_vec();
        items.sort_by(|a, b| a.key().cmp(&b.key()));
        rw.commit()?;

        log_committed(&report);
        Ok(SyncOutcome { items, report })
    }

    /// Reconcile the field and action values of one location.
    ///
    /// Rows are matched by target. A persisted value missing from `desired`
    /// is reset to the empty string; every field and action keeps exactly one
    /// row per location.
    pub fn sync_location_values(
        &self,
        shop: &ShopId,
        location_id: &RecordId,
        desired: Vec<ValueRow>,
    ) -> Result<()> {
        self.sync_location_values_with_report(shop, location_id, desired)
            .map(|_| ())
    }

    /// Reconcile the values of one location and report what changed.
    pub fn sync_location_values_with_report(
        &self,
        shop: &ShopId,
        location_id: &RecordId,
        desired: Vec<ValueRow>,
    ) -> Result<SyncReport> {
        let span = tracing::info_span!("sync", shop = %shop, kind = "value", location = %location_id);
        let _enter = span.enter();

        guard::validate_shop(shop, &desired, |v: &ValueRow| &v.shop_id).map_err(rejected)?;
        if let Some(row) = desired.iter().find(|v| &v.location_id != location_id) {
            return Err(unknown_reference(format!(
                "value for location {} submitted for location {}",
                row.location_id, location_id
            )));
        }
        let desired = guard::validate_values(desired).map_err(rejected)?;

        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;
        ensure_location(&rw, shop, location_id)?;

        let ctx = load_context(&rw, shop)?;
        for row in desired.iter() {
            if !ctx.has_value_target(&row.target) {
                return Err(unknown_reference(format!("value target {}", row.target)));
            }
        }

        let current = value_rows_for_location(&rw, location_id)?
            .into_iter()
            .map(StoredValueRow::into_row)
            .collect::<Result<IdentitySet<ValueRow>>>()?;
        let plan = Plan::build(&current, &desired);
        let report = self.apply_cells(&rw, plan)?;
        rw.commit()?;

        log_committed(&report);
        Ok(report)
    }

    /// Apply a plan over dependent cells.
    ///
    /// Cells are never deleted here: a cell absent from the desired state is
    /// blanked instead (and skipped if already blank). Resets are reported as
    /// updates.
    fn apply_cells<C: Cell>(&self, tx: &RwTransaction<'_>, plan: Plan<C>) -> Result<SyncReport> {
        let mut report = SyncReport::from_plan(&plan);
        let resets: Vec<C> = plan
            .to_delete
            .iter()
            .filter(|cell| !cell.is_blank())
            .map(Cell::blank)
            .collect();
        report.deleted = 0;
        report.updated += resets.len();
        report.unchanged += plan.to_delete.len() - resets.len();

        let now = Utc::now();
        for created in &plan.to_create {
            C::insert(tx, created.encode(now))?;
        }

        let updates: Vec<C> = plan.to_update.into_iter().chain(resets).collect();
        self.executor.run(
            updates,
            |cell: C| Ok(cell.encode(now)),
            |stored| C::upsert(tx, stored),
        )?;
        Ok(report)
    }
}

/// Storage operations for a dependent cell.
trait Cell: Record {
    type Stored: Send;

    fn encode(&self, now: DateTime<Utc>) -> Self::Stored;
    fn is_blank(&self) -> bool;
    fn blank(&self) -> Self;
    fn insert(tx: &RwTransaction<'_>, stored: Self::Stored) -> Result<()>;
    fn upsert(tx: &RwTransaction<'_>, stored: Self::Stored) -> Result<()>;
}

impl Cell for Translation {
    type Stored = StoredTranslation;

    fn encode(&self, now: DateTime<Utc>) -> StoredTranslation {
        StoredTranslation::from_translation(self, now)
    }

    fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    fn blank(&self) -> Self {
        Translation::empty(
            self.shop_id.clone(),
            self.language_id.clone(),
            self.target.clone(),
        )
    }

    fn insert(tx: &RwTransaction<'_>, stored: StoredTranslation) -> Result<()> {
        tx.insert(stored)?;
        Ok(())
    }

    fn upsert(tx: &RwTransaction<'_>, stored: StoredTranslation) -> Result<()> {
        tx.upsert(stored)?;
        Ok(())
    }
}

impl Cell for ValueRow {
    type Stored = StoredValueRow;

    fn encode(&self, now: DateTime<Utc>) -> StoredValueRow {
        StoredValueRow::from_row(self, now)
    }

    fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    fn blank(&self) -> Self {
        ValueRow::empty(
            self.shop_id.clone(),
            self.location_id.clone(),
            self.target.clone(),
        )
    }

    fn insert(tx: &RwTransaction<'_>, stored: StoredValueRow) -> Result<()> {
        tx.insert(stored)?;
        Ok(())
    }

    fn upsert(tx: &RwTransaction<'_>, stored: StoredValueRow) -> Result<()> {
        tx.upsert(stored)?;
        Ok(())
    }
}

/// Fail with [`Error::LocationNotFound`] unless the location exists in `shop`.
pub(crate) fn ensure_location(
    tx: &RwTransaction<'_>,
    shop: &ShopId,
    location_id: &RecordId,
) -> Result<StoredLocation> {
    let stored: Option<StoredLocation> = tx.get().primary(location_id.0.clone())?;
    match stored {
        Some(location) if location.shop_id == shop.as_str() => Ok(location),
        _ => Err(Error::LocationNotFound(location_id.clone())),
    }
}

pub(crate) fn decode_translations(
    rows: Vec<StoredTranslation>,
) -> Result<IdentitySet<Translation>> {
    rows.into_iter()
        .map(StoredTranslation::into_translation)
        .collect()
}

fn rejected(err: locus_core::Error) -> Error {
    tracing::warn!(error = %err, "sync rejected");
    Error::Validation(err)
}

fn unknown_reference(what: String) -> Error {
    tracing::warn!(reference = %what, "sync rejected");
    Error::UnknownReference(what)
}

fn log_committed(report: &SyncReport) {
    tracing::info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        unchanged = report.unchanged,
        value_rows_created = report.cascade.value_rows_created,
        value_rows_deleted = report.cascade.value_rows_deleted,
        translations_created = report.cascade.translations_created,
        translations_deleted = report.cascade.translations_deleted,
        "sync committed"
    );
}
