//! Per-location values for custom fields and custom actions

use crate::definition::Record;
use crate::identity::cell_key;
use crate::{RecordId, ShopId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The definition a value row belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueTarget {
    CustomField(RecordId),
    CustomAction(RecordId),
}

impl ValueTarget {
    /// The definition id
    pub fn definition_id(&self) -> &RecordId {
        match self {
            ValueTarget::CustomField(id) | ValueTarget::CustomAction(id) => id,
        }
    }

    /// Stored discriminant
    pub fn kind_str(&self) -> &'static str {
        match self {
            ValueTarget::CustomField(_) => "custom_field",
            ValueTarget::CustomAction(_) => "custom_action",
        }
    }

    /// Rebuild from a stored discriminant and id
    pub fn from_parts(kind: &str, id: RecordId) -> Option<Self> {
        match kind {
            "custom_field" => Some(ValueTarget::CustomField(id)),
            "custom_action" => Some(ValueTarget::CustomAction(id)),
            _ => None,
        }
    }
}

impl fmt::Display for ValueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind_str(), self.definition_id())
    }
}

/// Identity of a value cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueKey {
    pub location_id: RecordId,
    pub target: ValueTarget,
}

/// A location's value for one custom field or custom action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRow {
    pub shop_id: ShopId,
    pub location_id: RecordId,
    pub target: ValueTarget,
    pub value: String,
}

impl ValueRow {
    /// An empty value cell, as created by cascades
    pub fn empty(shop_id: ShopId, location_id: RecordId, target: ValueTarget) -> Self {
        Self {
            shop_id,
            location_id,
            target,
            value: String::new(),
        }
    }

    /// Storage key, unique across all shops since location ids are
    pub fn storage_key(&self) -> String {
        value_storage_key(&self.location_id, &self.target)
    }
}

impl Record for ValueRow {
    type Key = ValueKey;

    fn key(&self) -> ValueKey {
        ValueKey {
            location_id: self.location_id.clone(),
            target: self.target.clone(),
        }
    }
}

/// Storage key of the (location, target) cell
pub fn value_storage_key(location_id: &RecordId, target: &ValueTarget) -> String {
    cell_key(location_id, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_target_parts() {
        let target = ValueTarget::CustomAction(RecordId::from("a1"));
        let rebuilt = ValueTarget::from_parts(target.kind_str(), RecordId::from("a1"));
        assert_eq!(rebuilt, Some(target));
        assert_eq!(ValueTarget::from_parts("search_filter", RecordId::from("x")), None);
    }

    #[test]
    fn test_storage_key_per_cell() {
        let loc = RecordId::from("L");
        let a = value_storage_key(&loc, &ValueTarget::CustomField(RecordId::from("1")));
        let b = value_storage_key(&loc, &ValueTarget::CustomAction(RecordId::from("1")));
        assert_ne!(a, b);
    }

    #[test]
    fn test_storage_key_across_tenants() {
        // One shop's location "A" with field "x\u{1f}custom_field:y" must not
        // share a key with another shop's location "A\u{1f}custom_field:x" and field "y".
        let a = value_storage_key(
            &RecordId::from("A"),
            &ValueTarget::CustomField(RecordId::from("x\u{1f}custom_field:y")),
        );
        let b = value_storage_key(
            &RecordId::from("A\u{1f}custom_field:x"),
            &ValueTarget::CustomField(RecordId::from("y")),
        );
        assert_ne!(a, b);
    }
}
