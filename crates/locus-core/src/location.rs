//! Shops and locations
//!
//! Their lifecycle is driven from outside the reconciliation engine; they are
//! modelled here because value rows hang off locations.

use crate::{RecordId, ShopId};
use serde::{Deserialize, Serialize};

/// A tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
}

impl Shop {
    /// Create a shop
    pub fn new(id: impl Into<ShopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A physical store shown by the locator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: RecordId,
    pub shop_id: ShopId,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    /// Create an ungeocoded location
    pub fn new(id: impl Into<RecordId>, shop_id: impl Into<ShopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shop_id: shop_id.into(),
            name: name.into(),
            address: String::new(),
            latitude: None,
            longitude: None,
        }
    }
}
