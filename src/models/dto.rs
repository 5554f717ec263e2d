// src/models/dto.rs
//! Response shapes for assets, joining the asset row with its category and
//! the location of every unit.

use serde::Serialize;
use chrono::{DateTime, Utc};

use super::{Asset, AssetCategory, AssetLocation, AssetUnit};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub id: String,
    pub transaction_detail_id: Option<String>,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub quantity: i64,
    pub category: AssetCategory,
}

impl AssetSummary {
    pub fn assemble(asset: Asset, category: AssetCategory) -> Self {
        Self {
            id: asset.id,
            transaction_detail_id: asset.transaction_detail_id,
            name: asset.name,
            description: asset.description,
            image_url: asset.image_url,
            quantity: asset.quantity,
            category,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetUnitView {
    pub id: String,
    pub status: i64,
    pub updated_at: Option<DateTime<Utc>>,
    pub location: AssetLocation,
}

impl AssetUnitView {
    pub fn assemble(unit: AssetUnit, location: AssetLocation) -> Self {
        Self {
            id: unit.id,
            status: unit.status,
            updated_at: unit.updated_at,
            location,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    #[serde(flatten)]
    pub summary: AssetSummary,
    pub asset_detail: Vec<AssetUnitView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_serializes_flat() {
        let asset = Asset {
            id: "a1".into(),
            category_id: "c1".into(),
            transaction_detail_id: None,
            name: "Projector".into(),
            description: "Ceiling mounted".into(),
            quantity: 1,
            image_url: String::new(),
            created_at: Utc::now(),
        };
        let category = AssetCategory { id: "c1".into(), name: "Electronics".into() };
        let location = AssetLocation { id: "l1".into(), name: "Warehouse".into() };
        let unit = AssetUnit::in_storage("a1", "l1");

        let detail = AssetDetail {
            summary: AssetSummary::assemble(asset, category),
            asset_detail: vec![AssetUnitView::assemble(unit, location)],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["category"]["name"], "Electronics");
        assert_eq!(json["assetDetail"][0]["location"]["id"], "l1");
        assert_eq!(json["assetDetail"][0]["status"], 1);
        assert!(json.get("categoryId").is_none());
    }
}
