//! Definition variants and the record capabilities the planner works over
//!
//! A definition is a tenant-owned configuration item that the storefront
//! renders: a search filter, a custom field, a custom action or a language.
//! All four share the same reconciliation shape; they differ in which
//! dependent rows they drive (see [`DefinitionKind`]).

use crate::translation::TargetRef;
use crate::value::ValueTarget;
use crate::{RecordId, ShopId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Something that can be diffed by identity
///
/// `Key` is the identity the planner matches current and desired rows on.
/// Two rows with the same key and different contents produce an update.
pub trait Record: Clone + PartialEq + Send + Sync {
    /// Identity of the record within one collection
    type Key: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// The identity of this record
    fn key(&self) -> Self::Key;
}

/// A tenant-owned definition
pub trait Definition: Record<Key = RecordId> {
    /// Which variant this is
    const KIND: DefinitionKind;

    /// Stable identifier
    fn id(&self) -> &RecordId;

    /// Owning shop
    fn shop_id(&self) -> &ShopId;

    /// The string that must be unique within the shop (name, or code for languages)
    fn unique_key(&self) -> &str;

    /// Display position, if this variant is ordered
    fn position(&self) -> Option<u32> {
        None
    }
}

/// A definition with a display position
pub trait Positioned: Definition {
    /// Overwrite the display position
    fn set_position(&mut self, position: u32);
}

/// The four definition variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    SearchFilter,
    CustomField,
    CustomAction,
    Language,
}

impl DefinitionKind {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::SearchFilter => "search_filter",
            DefinitionKind::CustomField => "custom_field",
            DefinitionKind::CustomAction => "custom_action",
            DefinitionKind::Language => "language",
        }
    }

    /// Value-row column driven by a definition of this kind, if any
    ///
    /// Only custom fields and custom actions carry per-location values.
    pub fn value_target(&self, id: &RecordId) -> Option<ValueTarget> {
        match self {
            DefinitionKind::CustomField => Some(ValueTarget::CustomField(id.clone())),
            DefinitionKind::CustomAction => Some(ValueTarget::CustomAction(id.clone())),
            DefinitionKind::SearchFilter | DefinitionKind::Language => None,
        }
    }

    /// Translation target represented by a definition of this kind, if any
    pub fn translation_target(&self, id: &RecordId) -> Option<TargetRef> {
        match self {
            DefinitionKind::SearchFilter => Some(TargetRef::SearchFilter(id.clone())),
            DefinitionKind::CustomField => Some(TargetRef::CustomField(id.clone())),
            DefinitionKind::CustomAction => Some(TargetRef::CustomAction(id.clone())),
            DefinitionKind::Language => None,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DefinitionKind::SearchFilter => "search filter",
            DefinitionKind::CustomField => "custom field",
            DefinitionKind::CustomAction => "custom action",
            DefinitionKind::Language => "language",
        };
        f.write_str(label)
    }
}

/// A storefront search filter (e.g. "Wheelchair accessible")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub id: RecordId,
    pub shop_id: ShopId,
    pub name: String,
    pub position: u32,
    pub enabled: bool,
    /// Show the filter as a badge in the location list
    pub show_in_list: bool,
    /// Show the filter inside the map popup
    pub show_in_map: bool,
}

impl SearchFilter {
    /// Create an enabled filter shown everywhere
    pub fn new(
        id: impl Into<RecordId>,
        shop_id: impl Into<ShopId>,
        name: impl Into<String>,
        position: u32,
    ) -> Self {
        Self {
            id: id.into(),
            shop_id: shop_id.into(),
            name: name.into(),
            position,
            enabled: true,
            show_in_list: true,
            show_in_map: true,
        }
    }
}

/// A free-text attribute every location carries a value for (e.g. "Hours")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: RecordId,
    pub shop_id: ShopId,
    pub name: String,
    pub position: u32,
    pub enabled: bool,
    pub show_in_list: bool,
    pub show_in_map: bool,
    /// Placeholder rendered when a location's value is empty
    pub default_value: String,
}

impl CustomField {
    /// Create an enabled field with no default value
    pub fn new(
        id: impl Into<RecordId>,
        shop_id: impl Into<ShopId>,
        name: impl Into<String>,
        position: u32,
    ) -> Self {
        Self {
            id: id.into(),
            shop_id: shop_id.into(),
            name: name.into(),
            position,
            enabled: true,
            show_in_list: true,
            show_in_map: true,
            default_value: String::new(),
        }
    }
}

/// How a custom action button behaves when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionKind {
    /// Navigate to the location's value as a URL
    #[default]
    Link,
    /// Run the location's value as a storefront script
    Script,
}

impl ActionKind {
    /// Stable storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Link => "link",
            ActionKind::Script => "script",
        }
    }

    /// Parse a storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "link" => Some(ActionKind::Link),
            "script" => Some(ActionKind::Script),
            _ => None,
        }
    }
}

/// A per-location call-to-action button (e.g. "Book a table")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAction {
    pub id: RecordId,
    pub shop_id: ShopId,
    pub name: String,
    pub position: u32,
    pub enabled: bool,
    pub show_in_list: bool,
    pub show_in_map: bool,
    pub kind: ActionKind,
    pub default_value: String,
    pub open_in_new_tab: bool,
}

impl CustomAction {
    /// Create an enabled link action
    pub fn new(
        id: impl Into<RecordId>,
        shop_id: impl Into<ShopId>,
        name: impl Into<String>,
        position: u32,
    ) -> Self {
        Self {
            id: id.into(),
            shop_id: shop_id.into(),
            name: name.into(),
            position,
            enabled: true,
            show_in_list: true,
            show_in_map: true,
            kind: ActionKind::Link,
            default_value: String::new(),
            open_in_new_tab: true,
        }
    }
}

/// A storefront language, identified within the shop by its code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: RecordId,
    pub shop_id: ShopId,
    /// Tenant-unique language code such as "en" or "fr"
    pub code: String,
    pub enabled: bool,
}

impl Language {
    /// Create an enabled language
    pub fn new(id: impl Into<RecordId>, shop_id: impl Into<ShopId>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shop_id: shop_id.into(),
            code: code.into(),
            enabled: true,
        }
    }
}

macro_rules! named_definition {
    ($ty:ty, $kind:expr) => {
        impl Record for $ty {
            type Key = RecordId;

            fn key(&self) -> RecordId {
                self.id.clone()
            }
        }

        impl Definition for $ty {
            const KIND: DefinitionKind = $kind;

            fn id(&self) -> &RecordId {
                &self.id
            }

            fn shop_id(&self) -> &ShopId {
                &self.shop_id
            }

            fn unique_key(&self) -> &str {
                &self.name
            }

            fn position(&self) -> Option<u32> {
                Some(self.position)
            }
        }

        impl Positioned for $ty {
            fn set_position(&mut self, position: u32) {
                self.position = position;
            }
        }
    };
}

named_definition!(SearchFilter, DefinitionKind::SearchFilter);
named_definition!(CustomField, DefinitionKind::CustomField);
named_definition!(CustomAction, DefinitionKind::CustomAction);

impl Record for Language {
    type Key = RecordId;

    fn key(&self) -> RecordId {
        self.id.clone()
    }
}

impl Definition for Language {
    const KIND: DefinitionKind = DefinitionKind::Language;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn shop_id(&self) -> &ShopId {
        &self.shop_id
    }

    fn unique_key(&self) -> &str {
        &self.code
    }
}

/// Sort definitions into display order: position first, then id
///
/// Unpositioned variants (languages) sort by unique key, then id.
pub fn sort_for_display<D: Definition>(items: &mut [D]) {
    items.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| match (a.position(), b.position()) {
                (None, None) => a.unique_key().cmp(b.unique_key()),
                _ => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.id().cmp(b.id()))
    });
}
