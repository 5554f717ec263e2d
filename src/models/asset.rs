// src/models/asset.rs
//! Assets and their per-unit rows.
//!
//! An `Asset` is a logical batch of identical items. Each physical item is an
//! `AssetUnit` row in `asset_details`, created together with the asset and
//! later moved around by placement requests.

use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};

use crate::identity;

/// Unit status right after registration.
pub const STATUS_IN_STORAGE: i64 = 1;
/// Default status a placement moves units into.
pub const STATUS_PLACED: i64 = 2;

// ==================== ASSET ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub category_id: String,
    pub transaction_detail_id: Option<String>,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "qty")]
    pub quantity: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

// ==================== ASSET UNIT ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetUnit {
    pub id: String,
    pub asset_id: String,
    pub location_id: String,
    pub status: i64,
    pub updated_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl AssetUnit {
    pub fn in_storage(asset_id: &str, location_id: &str) -> Self {
        Self {
            id: identity::generate_id(),
            asset_id: asset_id.to_string(),
            location_id: location_id.to_string(),
            status: STATUS_IN_STORAGE,
            updated_at: None,
            removed_at: None,
        }
    }
}

// ==================== REQUESTS ====================

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "categoryId is required"))]
    pub category_id: String,

    #[serde(default, alias = "transcationDetailId")]
    pub transaction_detail_id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "name is required and cannot exceed 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(alias = "qty")]
    #[validate(range(min = 1, max = 10_000, message = "quantity must be between 1 and 10000"))]
    pub quantity: i64,

    #[serde(default)]
    pub image_url: String,

    #[validate(length(min = 1, message = "locationId is required"))]
    pub location_id: String,
}

impl CreateAssetRequest {
    pub fn into_asset(self, created_at: DateTime<Utc>) -> Asset {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(identity::generate_id);

        Asset {
            id,
            category_id: self.category_id,
            transaction_detail_id: self.transaction_detail_id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            image_url: self.image_url,
            created_at,
        }
    }
}

fn default_current_status() -> i64 {
    STATUS_IN_STORAGE
}

fn default_target_status() -> i64 {
    STATUS_PLACED
}

/// Move `quantity` units of an asset from `current_status` into
/// `target_status` at `location_id`. Omitted statuses and timestamp fall back
/// to 1, 2 and the current time.
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssetPlacement {
    #[serde(default)]
    pub asset_id: String,

    #[serde(default = "default_current_status")]
    pub current_status: i64,

    #[serde(default = "default_target_status")]
    pub target_status: i64,

    #[validate(length(min = 1, message = "locationId is required"))]
    pub location_id: String,

    #[serde(alias = "qty")]
    #[validate(range(min = 1, max = 10_000, message = "quantity must be between 1 and 10000"))]
    pub quantity: i64,

    #[serde(default = "Utc::now", alias = "updateAt")]
    pub updated_at: DateTime<Utc>,
}
