//! Shop and location models.

use chrono::{DateTime, Utc};
use locus_core::{Location, RecordId, Shop, ShopId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored shop (tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredShop {
    /// Primary key - shop ID.
    #[primary_key]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl StoredShop {
    /// Create from a shop.
    pub fn from_shop(shop: &Shop, now: DateTime<Utc>) -> Self {
        Self {
            id: shop.id.0.clone(),
            name: shop.name.clone(),
            created_at: now,
        }
    }

    /// Convert to a shop.
    pub fn into_shop(self) -> Shop {
        Shop {
            id: ShopId(self.id),
            name: self.name,
        }
    }
}

/// Stored location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredLocation {
    /// Primary key - location ID.
    #[primary_key]
    pub id: String,
    /// Owning shop.
    #[secondary_key]
    pub shop_id: String,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl StoredLocation {
    /// Create from a location.
    pub fn from_location(location: &Location, now: DateTime<Utc>) -> Self {
        Self {
            id: location.id.0.clone(),
            shop_id: location.shop_id.0.clone(),
            name: location.name.clone(),
            address: location.address.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            updated_at: now,
        }
    }

    /// Convert to a location.
    pub fn into_location(self) -> Location {
        Location {
            id: RecordId(self.id),
            shop_id: ShopId(self.shop_id),
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
