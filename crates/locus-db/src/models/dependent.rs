//! Value-row and translation models.
//!
//! Primary keys are derived from the cell coordinates, so one cell can only
//! ever map to one row.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use locus_core::{RecordId, ShopId, TargetColumns, TargetRef, Translation, ValueRow, ValueTarget};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored per-location value of a custom field or custom action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 20, version = 1)]
#[native_db]
pub struct StoredValueRow {
    /// Primary key - (location, target) cell key.
    #[primary_key]
    pub key: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Location the value belongs to.
    #[secondary_key]
    pub location_id: String,
    /// Custom field or custom action ID.
    #[secondary_key]
    pub definition_id: String,
    /// "custom_field" or "custom_action".
    pub target_kind: String,
    pub value: String,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredValueRow {
    /// Create from a value row.
    pub fn from_row(row: &ValueRow, now: DateTime<Utc>) -> Self {
        Self {
            key: row.storage_key(),
            shop_id: row.shop_id.0.clone(),
            location_id: row.location_id.0.clone(),
            definition_id: row.target.definition_id().0.clone(),
            target_kind: row.target.kind_str().to_string(),
            value: row.value.clone(),
            updated_at: now,
        }
    }

    /// The cell target.
    pub fn target(&self) -> Result<ValueTarget> {
        ValueTarget::from_parts(&self.target_kind, RecordId(self.definition_id.clone()))
            .ok_or_else(|| Error::InvalidRow(format!("value row {}: kind {}", self.key, self.target_kind)))
    }

    /// Convert to a value row.
    pub fn into_row(self) -> Result<ValueRow> {
        let target = self.target()?;
        Ok(ValueRow {
            shop_id: ShopId(self.shop_id),
            location_id: RecordId(self.location_id),
            target,
            value: self.value,
        })
    }
}

/// Stored translation.
///
/// The target is kept as four nullable columns, exactly one of which is set;
/// `target_key` mirrors it as a single lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 21, version = 1)]
#[native_db]
pub struct StoredTranslation {
    /// Primary key - (language, target) cell key.
    #[primary_key]
    pub key: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Language ID.
    #[secondary_key]
    pub language_id: String,
    /// Target lookup key.
    #[secondary_key]
    pub target_key: String,
    pub fixed_key: Option<String>,
    pub search_filter_id: Option<String>,
    pub custom_field_id: Option<String>,
    pub custom_action_id: Option<String>,
    pub value: String,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredTranslation {
    /// Create from a translation.
    pub fn from_translation(translation: &Translation, now: DateTime<Utc>) -> Self {
        let TargetColumns {
            fixed_key,
            search_filter_id,
            custom_field_id,
            custom_action_id,
        } = translation.target.columns();
        Self {
            key: translation.storage_key(),
            shop_id: translation.shop_id.0.clone(),
            language_id: translation.language_id.0.clone(),
            target_key: translation.target.storage_key(),
            fixed_key,
            search_filter_id,
            custom_field_id,
            custom_action_id,
            value: translation.value.clone(),
            updated_at: now,
        }
    }

    /// The cell target.
    pub fn target(&self) -> Result<TargetRef> {
        TargetRef::from_columns(TargetColumns {
            fixed_key: self.fixed_key.clone(),
            search_filter_id: self.search_filter_id.clone(),
            custom_field_id: self.custom_field_id.clone(),
            custom_action_id: self.custom_action_id.clone(),
        })
        .map_err(|e| Error::InvalidRow(format!("translation {}: {}", self.key, e)))
    }

    /// Convert to a translation.
    pub fn into_translation(self) -> Result<Translation> {
        let target = self.target()?;
        Ok(Translation {
            shop_id: ShopId(self.shop_id),
            language_id: RecordId(self.language_id),
            target,
            value: self.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::FixedKey;

    #[test]
    fn test_translation_columns() {
        let translation = Translation {
            shop_id: ShopId::from("shop"),
            language_id: RecordId::from("en"),
            target: TargetRef::SearchFilter(RecordId::from("sf1")),
            value: "Wheelchair".into(),
        };
        let stored = StoredTranslation::from_translation(&translation, Utc::now());
        assert_eq!(stored.search_filter_id.as_deref(), Some("sf1"));
        assert!(stored.fixed_key.is_none());
        assert_eq!(stored.target_key, "search_filter:sf1");
        assert_eq!(stored.into_translation().unwrap(), translation);
    }

    #[test]
    fn test_corrupt_translation_rejected() {
        let translation = Translation::empty(
            ShopId::from("shop"),
            RecordId::from("en"),
            TargetRef::Fixed(FixedKey::Phone),
        );
        let mut stored = StoredTranslation::from_translation(&translation, Utc::now());
        stored.custom_field_id = Some("f1".into());
        assert!(matches!(stored.into_translation(), Err(Error::InvalidRow(_))));
    }

    #[test]
    fn test_value_row_kind() {
        let row = ValueRow::empty(
            ShopId::from("shop"),
            RecordId::from("L1"),
            ValueTarget::CustomAction(RecordId::from("a1")),
        );
        let mut stored = StoredValueRow::from_row(&row, Utc::now());
        assert_eq!(stored.definition_id, "a1");
        assert_eq!(stored.clone().into_row().unwrap(), row);

        stored.target_kind = "bogus".into();
        assert!(matches!(stored.into_row(), Err(Error::InvalidRow(_))));
    }
}
