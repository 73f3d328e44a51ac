//! Cascade derivation
//!
//! Turns a definition-level [`Plan`] into the dependent-row operations that
//! keep value rows and translations complete. Derivation is pure; the store
//! applies the resulting [`CascadePlan`] inside the same transaction as the
//! definition writes.
//!
//! | change                        | value rows               | translations                  |
//! |-------------------------------|--------------------------|-------------------------------|
//! | custom field/action created   | one per location         | one per language              |
//! | custom field/action deleted   | all for the definition   | all for the definition        |
//! | search filter created         | -                        | one per language              |
//! | search filter deleted         | -                        | all for the filter            |
//! | language created              | -                        | one per target                |
//! | language deleted              | -                        | all for the language          |
//! | location created              | one per field/action     | -                             |

use crate::definition::{Definition, DefinitionKind};
use crate::matrix::{TranslationMatrix, ValueMatrix};
use crate::plan::Plan;
use crate::translation::{TargetRef, Translation};
use crate::value::{ValueRow, ValueTarget};
use crate::{RecordId, ShopId};

/// The shop state a cascade is derived against
#[derive(Debug, Clone)]
pub struct CascadeContext {
    shop_id: ShopId,
    values: ValueMatrix,
    translations: TranslationMatrix,
}

impl CascadeContext {
    /// Capture the shop's current locations, languages and definitions
    pub fn new(
        shop_id: ShopId,
        locations: impl IntoIterator<Item = RecordId>,
        languages: impl IntoIterator<Item = RecordId>,
        value_targets: impl IntoIterator<Item = ValueTarget>,
        definition_targets: impl IntoIterator<Item = TargetRef>,
    ) -> Self {
        Self {
            shop_id,
            values: ValueMatrix::new(locations, value_targets),
            translations: TranslationMatrix::for_shop(languages, definition_targets),
        }
    }

    /// The shop this context describes
    pub fn shop_id(&self) -> &ShopId {
        &self.shop_id
    }

    /// Expected value cells
    pub fn value_matrix(&self) -> &ValueMatrix {
        &self.values
    }

    /// Expected translation cells
    pub fn translation_matrix(&self) -> &TranslationMatrix {
        &self.translations
    }

    /// Whether a location belongs to the shop
    pub fn has_location(&self, location_id: &RecordId) -> bool {
        self.values.rows().any(|id| id == location_id)
    }

    /// Whether a value target belongs to the shop
    pub fn has_value_target(&self, target: &ValueTarget) -> bool {
        self.values.columns().any(|t| t == target)
    }

    /// Whether a translation cell is expected in the shop
    pub fn has_translation_cell(&self, language_id: &RecordId, target: &TargetRef) -> bool {
        self.translations.contains(language_id, target)
    }
}

/// Which translation rows a delete cascade removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationScope {
    /// Every language's row for one target
    Target(TargetRef),
    /// Every target's row for one language
    Language(RecordId),
}

/// Dependent-row operations derived from a definition plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Value rows whose definitions are being deleted
    pub value_targets_to_delete: Vec<ValueTarget>,
    /// Empty value rows for new definitions or a new location
    pub value_rows_to_create: Vec<ValueRow>,
    /// Translation rows to remove, by scope
    pub translations_to_delete: Vec<TranslationScope>,
    /// Empty translation rows for new targets or new languages
    pub translations_to_create: Vec<Translation>,
}

impl CascadePlan {
    /// Derive the cascade for a definition plan
    ///
    /// Updates never cascade: ids are immutable and dependent rows are keyed
    /// by id only.
    pub fn for_definitions<D: Definition>(plan: &Plan<D>, ctx: &CascadeContext) -> Self {
        let mut cascade = CascadePlan::default();

        for deleted in &plan.to_delete {
            let id = deleted.id();
            if let Some(target) = D::KIND.value_target(id) {
                cascade.value_targets_to_delete.push(target);
            }
            if let Some(target) = D::KIND.translation_target(id) {
                cascade
                    .translations_to_delete
                    .push(TranslationScope::Target(target));
            }
            if D::KIND == DefinitionKind::Language {
                cascade
                    .translations_to_delete
                    .push(TranslationScope::Language(id.clone()));
            }
        }

        for created in &plan.to_create {
            let id = created.id();
            if let Some(target) = D::KIND.value_target(id) {
                cascade.push_values(ctx, ctx.values.cells_for_new_column(&target));
            }
            if let Some(target) = D::KIND.translation_target(id) {
                cascade.push_translations(ctx, ctx.translations.cells_for_new_column(&target));
            }
            if D::KIND == DefinitionKind::Language {
                cascade.push_translations(ctx, ctx.translations.cells_for_new_row(id));
            }
        }

        cascade
    }

    /// Derive the cascade for a newly created location
    pub fn for_new_location(location_id: &RecordId, ctx: &CascadeContext) -> Self {
        let mut cascade = CascadePlan::default();
        cascade.push_values(ctx, ctx.values.cells_for_new_row(location_id));
        cascade
    }

    fn push_values(&mut self, ctx: &CascadeContext, cells: Vec<(RecordId, ValueTarget)>) {
        self.value_rows_to_create.extend(
            cells
                .into_iter()
                .map(|(location, target)| ValueRow::empty(ctx.shop_id.clone(), location, target)),
        );
    }

    fn push_translations(&mut self, ctx: &CascadeContext, cells: Vec<(RecordId, TargetRef)>) {
        self.translations_to_create.extend(
            cells
                .into_iter()
                .map(|(language, target)| Translation::empty(ctx.shop_id.clone(), language, target)),
        );
    }

    /// True when the cascade writes nothing
    pub fn is_empty(&self) -> bool {
        self.value_targets_to_delete.is_empty()
            && self.value_rows_to_create.is_empty()
            && self.translations_to_delete.is_empty()
            && self.translations_to_create.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity_set::IdentitySet;
    use crate::{CustomField, FixedKey, Language, SearchFilter};

    fn id(s: &str) -> RecordId {
        RecordId::from(s)
    }

    fn context() -> CascadeContext {
        CascadeContext::new(
            ShopId::from("shop"),
            vec![id("L1"), id("L2")],
            vec![id("en"), id("fr")],
            vec![ValueTarget::CustomField(id("f1"))],
            vec![
                TargetRef::CustomField(id("f1")),
                TargetRef::SearchFilter(id("sf1")),
            ],
        )
    }

    fn plan<D: Definition>(current: Vec<D>, desired: Vec<D>) -> Plan<D> {
        let current: IdentitySet<D> = current.into_iter().collect();
        let desired: IdentitySet<D> = desired.into_iter().collect();
        Plan::build(&current, &desired)
    }

    #[test]
    fn test_custom_field_create() {
        let existing = CustomField::new("f1", "shop", "Hours", 0);
        let added = CustomField::new("f2", "shop", "Parking", 1);
        let cascade = CascadePlan::for_definitions(
            &plan(vec![existing.clone()], vec![existing, added]),
            &context(),
        );

        assert_eq!(cascade.value_rows_to_create.len(), 2);
        assert!(cascade
            .value_rows_to_create
            .iter()
            .all(|row| row.value.is_empty() && row.target == ValueTarget::CustomField(id("f2"))));
        assert_eq!(cascade.translations_to_create.len(), 2);
        assert!(cascade
            .translations_to_create
            .iter()
            .all(|t| t.target == TargetRef::CustomField(id("f2"))));
        assert!(cascade.value_targets_to_delete.is_empty());
    }

    #[test]
    fn test_custom_field_delete() {
        let existing = CustomField::new("f1", "shop", "Hours", 0);
        let cascade = CascadePlan::for_definitions(&plan(vec![existing], vec![]), &context());

        assert_eq!(
            cascade.value_targets_to_delete,
            vec![ValueTarget::CustomField(id("f1"))]
        );
        assert_eq!(
            cascade.translations_to_delete,
            vec![TranslationScope::Target(TargetRef::CustomField(id("f1")))]
        );
        assert!(cascade.value_rows_to_create.is_empty());
    }

    #[test]
    fn test_search_filter_has_no_value_rows() {
        let added = SearchFilter::new("sf2", "shop", "Parking", 0);
        let cascade = CascadePlan::for_definitions(&plan(vec![], vec![added]), &context());
        assert!(cascade.value_rows_to_create.is_empty());
        assert_eq!(cascade.translations_to_create.len(), 2);
    }

    #[test]
    fn test_language_create_covers_every_target() {
        let added = Language::new("de", "shop", "de");
        let cascade = CascadePlan::for_definitions(&plan(vec![], vec![added]), &context());

        // Fixed keys plus the custom field and the search filter.
        assert_eq!(cascade.translations_to_create.len(), FixedKey::ALL.len() + 2);
        assert!(cascade
            .translations_to_create
            .iter()
            .all(|t| t.language_id == id("de")));
    }

    #[test]
    fn test_language_delete() {
        let existing = Language::new("en", "shop", "en");
        let cascade = CascadePlan::for_definitions(&plan(vec![existing], vec![]), &context());
        assert_eq!(
            cascade.translations_to_delete,
            vec![TranslationScope::Language(id("en"))]
        );
    }

    #[test]
    fn test_update_does_not_cascade() {
        let before = CustomField::new("f1", "shop", "Hours", 0);
        let mut after = before.clone();
        after.name = "Opening hours".into();
        let cascade = CascadePlan::for_definitions(&plan(vec![before], vec![after]), &context());
        assert!(cascade.is_empty());
    }

    #[test]
    fn test_new_location() {
        let ctx = context();
        let cascade = CascadePlan::for_new_location(&id("L3"), &ctx);
        assert_eq!(cascade.value_rows_to_create.len(), 1);
        assert_eq!(cascade.value_rows_to_create[0].location_id, id("L3"));
        assert!(ctx.has_location(&id("L1")));
        assert!(!ctx.has_location(&id("L3")));
    }
}
