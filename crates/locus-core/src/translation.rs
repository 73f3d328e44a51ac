//! Translation targets and translation cells
//!
//! A translation is one cell of the (language x target) matrix. The target is
//! a tagged union: either a fixed storefront string or the id of a search
//! filter, custom field or custom action. Storage layers that need nullable
//! columns convert through [`TargetRef::columns`] and [`TargetRef::from_columns`].

use crate::definition::Record;
use crate::error::{Error, Result};
use crate::identity::cell_key;
use crate::{RecordId, ShopId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed storefront strings that always need a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixedKey {
    DirectionsLink,
    SearchPlaceholder,
    SearchButton,
    NoResults,
    OpenNow,
    Closed,
    Phone,
    Email,
    Website,
    Distance,
    Filters,
    ListView,
    MapView,
}

impl FixedKey {
    /// Every fixed key, in display order
    pub const ALL: [FixedKey; 13] = [
        FixedKey::DirectionsLink,
        FixedKey::SearchPlaceholder,
        FixedKey::SearchButton,
        FixedKey::NoResults,
        FixedKey::OpenNow,
        FixedKey::Closed,
        FixedKey::Phone,
        FixedKey::Email,
        FixedKey::Website,
        FixedKey::Distance,
        FixedKey::Filters,
        FixedKey::ListView,
        FixedKey::MapView,
    ];

    /// The camelCase key stored alongside the translation
    pub fn as_str(&self) -> &'static str {
        match self {
            FixedKey::DirectionsLink => "directionsLink",
            FixedKey::SearchPlaceholder => "searchPlaceholder",
            FixedKey::SearchButton => "searchButton",
            FixedKey::NoResults => "noResults",
            FixedKey::OpenNow => "openNow",
            FixedKey::Closed => "closed",
            FixedKey::Phone => "phone",
            FixedKey::Email => "email",
            FixedKey::Website => "website",
            FixedKey::Distance => "distance",
            FixedKey::Filters => "filters",
            FixedKey::ListView => "listView",
            FixedKey::MapView => "mapView",
        }
    }

    /// Parse a stored key
    pub fn parse(s: &str) -> Result<Self> {
        FixedKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownFixedKey(s.to_string()))
    }
}

impl fmt::Display for FixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a translation row translates
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    /// A fixed storefront string
    Fixed(FixedKey),
    /// A search filter's label
    SearchFilter(RecordId),
    /// A custom field's label
    CustomField(RecordId),
    /// A custom action's label
    CustomAction(RecordId),
}

/// Nullable-column form of a [`TargetRef`], exactly one of which is set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetColumns {
    pub fixed_key: Option<String>,
    pub search_filter_id: Option<String>,
    pub custom_field_id: Option<String>,
    pub custom_action_id: Option<String>,
}

impl TargetRef {
    /// The definition id behind this target, if it is not a fixed key
    pub fn definition_id(&self) -> Option<&RecordId> {
        match self {
            TargetRef::Fixed(_) => None,
            TargetRef::SearchFilter(id) | TargetRef::CustomField(id) | TargetRef::CustomAction(id) => {
                Some(id)
            }
        }
    }

    /// A single string identifying the target, usable as a lookup key
    pub fn storage_key(&self) -> String {
        match self {
            TargetRef::Fixed(key) => format!("fixed:{}", key.as_str()),
            TargetRef::SearchFilter(id) => format!("search_filter:{}", id),
            TargetRef::CustomField(id) => format!("custom_field:{}", id),
            TargetRef::CustomAction(id) => format!("custom_action:{}", id),
        }
    }

    /// Split into the four nullable columns
    pub fn columns(&self) -> TargetColumns {
        let mut columns = TargetColumns::default();
        match self {
            TargetRef::Fixed(key) => columns.fixed_key = Some(key.as_str().to_string()),
            TargetRef::SearchFilter(id) => columns.search_filter_id = Some(id.0.clone()),
            TargetRef::CustomField(id) => columns.custom_field_id = Some(id.0.clone()),
            TargetRef::CustomAction(id) => columns.custom_action_id = Some(id.0.clone()),
        }
        columns
    }

    /// Rebuild from the four nullable columns
    ///
    /// Fails unless exactly one column is set.
    pub fn from_columns(columns: TargetColumns) -> Result<Self> {
        let set = [
            columns.fixed_key.is_some(),
            columns.search_filter_id.is_some(),
            columns.custom_field_id.is_some(),
            columns.custom_action_id.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        if set != 1 {
            return Err(Error::InvalidTarget(set));
        }

        if let Some(key) = columns.fixed_key {
            return FixedKey::parse(&key).map(TargetRef::Fixed);
        }
        if let Some(id) = columns.search_filter_id {
            return Ok(TargetRef::SearchFilter(RecordId(id)));
        }
        if let Some(id) = columns.custom_field_id {
            return Ok(TargetRef::CustomField(RecordId(id)));
        }
        match columns.custom_action_id {
            Some(id) => Ok(TargetRef::CustomAction(RecordId(id))),
            None => Err(Error::InvalidTarget(0)),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Identity of a translation cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TranslationKey {
    pub language_id: RecordId,
    pub target: TargetRef,
}

/// One translated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub shop_id: ShopId,
    pub language_id: RecordId,
    pub target: TargetRef,
    pub value: String,
}

impl Translation {
    /// An empty translation cell, as created by cascades
    pub fn empty(shop_id: ShopId, language_id: RecordId, target: TargetRef) -> Self {
        Self {
            shop_id,
            language_id,
            target,
            value: String::new(),
        }
    }

    /// Storage key, unique across all shops since language ids are
    pub fn storage_key(&self) -> String {
        translation_storage_key(&self.language_id, &self.target)
    }
}

impl Record for Translation {
    type Key = TranslationKey;

    fn key(&self) -> TranslationKey {
        TranslationKey {
            language_id: self.language_id.clone(),
            target: self.target.clone(),
        }
    }
}

/// Storage key of the (language, target) cell
pub fn translation_storage_key(language_id: &RecordId, target: &TargetRef) -> String {
    cell_key(language_id, target.storage_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_key_roundtrip() {
        for key in FixedKey::ALL {
            assert_eq!(FixedKey::parse(key.as_str()).unwrap(), key);
        }
        assert!(matches!(
            FixedKey::parse("nope"),
            Err(Error::UnknownFixedKey(_))
        ));
    }

    #[test]
    fn test_columns_exactly_one() {
        let target = TargetRef::CustomField(RecordId::from("f1"));
        let columns = target.columns();
        assert_eq!(columns.custom_field_id.as_deref(), Some("f1"));
        assert!(columns.fixed_key.is_none());
        assert!(columns.search_filter_id.is_none());
        assert!(columns.custom_action_id.is_none());
        assert_eq!(TargetRef::from_columns(columns).unwrap(), target);
    }

    #[test]
    fn test_columns_rejects_none_and_many() {
        assert!(matches!(
            TargetRef::from_columns(TargetColumns::default()),
            Err(Error::InvalidTarget(0))
        ));

        let both = TargetColumns {
            fixed_key: Some("phone".into()),
            search_filter_id: Some("sf".into()),
            ..Default::default()
        };
        assert!(matches!(
            TargetRef::from_columns(both),
            Err(Error::InvalidTarget(2))
        ));
    }

    #[test]
    fn test_storage_keys_distinguish_kinds() {
        let id = RecordId::from("x");
        let a = TargetRef::SearchFilter(id.clone()).storage_key();
        let b = TargetRef::CustomField(id.clone()).storage_key();
        assert_ne!(a, b);
        assert_eq!(TargetRef::Fixed(FixedKey::DirectionsLink).storage_key(), "fixed:directionsLink");
    }

    #[test]
    fn test_translation_key() {
        let t = Translation::empty(
            ShopId::from("shop"),
            RecordId::from("l1"),
            TargetRef::Fixed(FixedKey::Phone),
        );
        assert_eq!(t.key().language_id, RecordId::from("l1"));
        assert!(t.value.is_empty());
        assert_eq!(t.storage_key(), "2:l1\u{1f}fixed:phone");

        let spliced = translation_storage_key(
            &RecordId::from("l1\u{1f}custom_field:x"),
            &TargetRef::CustomField(RecordId::from("y")),
        );
        let plain = translation_storage_key(
            &RecordId::from("l1"),
            &TargetRef::CustomField(RecordId::from("x\u{1f}custom_field:y")),
        );
        assert_ne!(spliced, plain);
    }
}
