//! Definition models for database storage.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use locus_core::{
    ActionKind, CustomAction, CustomField, Language, RecordId, SearchFilter, ShopId,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored search filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 10, version = 1)]
#[native_db]
pub struct StoredSearchFilter {
    /// Primary key - filter ID.
    #[primary_key]
    pub id: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Display name, unique within the shop.
    pub name: String,
    /// Display position.
    pub position: u32,
    pub enabled: bool,
    pub show_in_list: bool,
    pub show_in_map: bool,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredSearchFilter {
    /// Create from a search filter.
    pub fn from_domain(filter: &SearchFilter, now: DateTime<Utc>) -> Self {
        Self {
            id: filter.id.0.clone(),
            shop_id: filter.shop_id.0.clone(),
            name: filter.name.clone(),
            position: filter.position,
            enabled: filter.enabled,
            show_in_list: filter.show_in_list,
            show_in_map: filter.show_in_map,
            updated_at: now,
        }
    }

    /// Convert to a search filter.
    pub fn into_domain(self) -> Result<SearchFilter> {
        Ok(SearchFilter {
            id: RecordId(self.id),
            shop_id: ShopId(self.shop_id),
            name: self.name,
            position: self.position,
            enabled: self.enabled,
            show_in_list: self.show_in_list,
            show_in_map: self.show_in_map,
        })
    }
}

/// Stored custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 11, version = 1)]
#[native_db]
pub struct StoredCustomField {
    /// Primary key - field ID.
    #[primary_key]
    pub id: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Display name, unique within the shop.
    pub name: String,
    /// Display position.
    pub position: u32,
    pub enabled: bool,
    pub show_in_list: bool,
    pub show_in_map: bool,
    /// Placeholder for empty values.
    pub default_value: String,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredCustomField {
    /// Create from a custom field.
    pub fn from_domain(field: &CustomField, now: DateTime<Utc>) -> Self {
        Self {
            id: field.id.0.clone(),
            shop_id: field.shop_id.0.clone(),
            name: field.name.clone(),
            position: field.position,
            enabled: field.enabled,
            show_in_list: field.show_in_list,
            show_in_map: field.show_in_map,
            default_value: field.default_value.clone(),
            updated_at: now,
        }
    }

    /// Convert to a custom field.
    pub fn into_domain(self) -> Result<CustomField> {
        Ok(CustomField {
            id: RecordId(self.id),
            shop_id: ShopId(self.shop_id),
            name: self.name,
            position: self.position,
            enabled: self.enabled,
            show_in_list: self.show_in_list,
            show_in_map: self.show_in_map,
            default_value: self.default_value,
        })
    }
}

/// Stored custom action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 12, version = 1)]
#[native_db]
pub struct StoredCustomAction {
    /// Primary key - action ID.
    #[primary_key]
    pub id: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Display name, unique within the shop.
    pub name: String,
    /// Display position.
    pub position: u32,
    pub enabled: bool,
    pub show_in_list: bool,
    pub show_in_map: bool,
    /// Action kind ("link" or "script").
    pub kind: String,
    pub default_value: String,
    pub open_in_new_tab: bool,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredCustomAction {
    /// Create from a custom action.
    pub fn from_domain(action: &CustomAction, now: DateTime<Utc>) -> Self {
        Self {
            id: action.id.0.clone(),
            shop_id: action.shop_id.0.clone(),
            name: action.name.clone(),
            position: action.position,
            enabled: action.enabled,
            show_in_list: action.show_in_list,
            show_in_map: action.show_in_map,
            kind: action.kind.as_str().to_string(),
            default_value: action.default_value.clone(),
            open_in_new_tab: action.open_in_new_tab,
            updated_at: now,
        }
    }

    /// Convert to a custom action.
    pub fn into_domain(self) -> Result<CustomAction> {
        let kind = ActionKind::parse(&self.kind).ok_or_else(|| {
            Error::InvalidRow(format!("custom action {}: kind {}", self.id, self.kind))
        })?;
        Ok(CustomAction {
            id: RecordId(self.id),
            shop_id: ShopId(self.shop_id),
            name: self.name,
            position: self.position,
            enabled: self.enabled,
            show_in_list: self.show_in_list,
            show_in_map: self.show_in_map,
            kind,
            default_value: self.default_value,
            open_in_new_tab: self.open_in_new_tab,
        })
    }
}

/// Stored language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 13, version = 1)]
#[native_db]
pub struct StoredLanguage {
    /// Primary key - language ID.
    #[primary_key]
    pub id: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    /// Language code, unique within the shop.
    pub code: String,
    pub enabled: bool,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredLanguage {
    /// Create from a language.
    pub fn from_domain(language: &Language, now: DateTime<Utc>) -> Self {
        Self {
            id: language.id.0.clone(),
            shop_id: language.shop_id.0.clone(),
            code: language.code.clone(),
            enabled: language.enabled,
            updated_at: now,
        }
    }

    /// Convert to a language.
    pub fn into_domain(self) -> Result<Language> {
        Ok(Language {
            id: RecordId(self.id),
            shop_id: ShopId(self.shop_id),
            code: self.code,
            enabled: self.enabled,
        })
    }
}
