// src/usecases/asset.rs
//! Asset registration, listing, detail assembly and unit placement.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Asset, AssetCategory, AssetDetail, AssetLocation, AssetPlacement, AssetSummary, AssetUnit,
    AssetUnitView, CreateAssetRequest,
};
use crate::repositories::{AssetRepository, PlacementWriteError};
use super::RecordUsecase;

pub struct AssetUsecase {
    repo: Arc<dyn AssetRepository>,
    locations: Arc<RecordUsecase<AssetLocation>>,
    categories: Arc<RecordUsecase<AssetCategory>>,
}

impl AssetUsecase {
    pub fn new(
        repo: Arc<dyn AssetRepository>,
        locations: Arc<RecordUsecase<AssetLocation>>,
        categories: Arc<RecordUsecase<AssetCategory>>,
    ) -> Self {
        Self { repo, locations, categories }
    }

    /// Looks up a referenced location; a missing one is the caller's mistake.
    async fn referenced_location(&self, id: &str) -> ApiResult<AssetLocation> {
        self.locations.get(id).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::unknown_reference("location", id),
            other => other,
        })
    }

    async fn referenced_category(&self, id: &str) -> ApiResult<AssetCategory> {
        self.categories.get(id).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::unknown_reference("category", id),
            other => other,
        })
    }

    /// Registers the asset together with one in-storage unit per item.
    #[tracing::instrument(skip_all, fields(name = %request.name, quantity = request.quantity))]
    pub async fn create_asset(&self, request: CreateAssetRequest) -> ApiResult<Asset> {
        request.validate()?;

        let location = self.referenced_location(&request.location_id).await?;
        self.referenced_category(&request.category_id).await?;

        let asset = request.into_asset(Utc::now());
        let units: Vec<AssetUnit> = (0..asset.quantity)
            .map(|_| AssetUnit::in_storage(&asset.id, &location.id))
            .collect();

        self.repo
            .create(&asset, &units)
            .await
            .map_err(|e| ApiError::persistence("failed to register new asset", e))?;

        info!(
            "Registered asset {} ({}) with {} units at {}",
            asset.name, asset.id, units.len(), location.name
        );
        Ok(asset)
    }

    pub async fn list_assets(&self) -> ApiResult<Vec<AssetSummary>> {
        let assets = self
            .repo
            .list()
            .await
            .map_err(|e| ApiError::persistence("failed to list assets", e))?;

        let mut summaries = Vec::with_capacity(assets.len());
        for asset in assets {
            let category = self.categories.get(&asset.category_id).await?;
            summaries.push(AssetSummary::assemble(asset, category));
        }

        Ok(summaries)
    }

    pub async fn asset_detail(&self, id: &str) -> ApiResult<AssetDetail> {
        if id.trim().is_empty() {
            return Err(ApiError::id_required());
        }

        let asset = self
            .repo
            .get_by_id(id)
            .await
            .map_err(|e| ApiError::persistence("failed to get asset", e))?
            .ok_or_else(|| ApiError::not_found("asset", id))?;

        let category = self.categories.get(&asset.category_id).await?;

        let units = self
            .repo
            .units(&asset.id)
            .await
            .map_err(|e| ApiError::persistence("failed to get asset units", e))?;

        let mut unit_views = Vec::with_capacity(units.len());
        for unit in units {
            let location = self.locations.get(&unit.location_id).await?;
            unit_views.push(AssetUnitView::assemble(unit, location));
        }

        Ok(AssetDetail {
            summary: AssetSummary::assemble(asset, category),
            asset_detail: unit_views,
        })
    }

    /// Moves `quantity` units sitting at `current_status` to the requested
    /// location and `target_status`.
    ///
    /// Returns the moved unit ids. An empty list means the asset does not have
    /// strictly more than `quantity` units at `current_status`; nothing is
    /// written in that case.
    #[tracing::instrument(skip_all, fields(asset_id = %placement.asset_id, quantity = placement.quantity))]
    pub async fn update_placement(&self, placement: AssetPlacement) -> ApiResult<Vec<String>> {
        placement.validate()?;
        if placement.asset_id.trim().is_empty() {
            return Err(ApiError::id_required());
        }
        self.referenced_location(&placement.location_id).await?;

        let available = self
            .repo
            .count_by_status(&placement.asset_id, placement.current_status)
            .await
            .map_err(|e| ApiError::persistence("failed to check asset availability", e))?;

        if available <= placement.quantity {
            warn!(
                "Placement of {} units of asset {} refused: {} available at status {}",
                placement.quantity, placement.asset_id, available, placement.current_status
            );
            return Ok(Vec::new());
        }

        let unit_ids = self
            .repo
            .unit_ids_by_status(&placement.asset_id, placement.current_status, placement.quantity)
            .await
            .map_err(|e| ApiError::persistence("failed to select asset units", e))?;

        self.repo
            .place_units(&unit_ids, &placement)
            .await
            .map_err(|e| match e {
                PlacementWriteError::Row { index, source } => ApiError::persistence(
                    format!("failed to update asset in looping index({})", index),
                    source,
                ),
                PlacementWriteError::Transaction(source) => {
                    ApiError::persistence("failed to commit asset placement", source)
                }
            })?;

        info!(
            "Placed {} units of asset {} at location {} (status {} -> {})",
            unit_ids.len(),
            placement.asset_id,
            placement.location_id,
            placement.current_status,
            placement.target_status
        );
        Ok(unit_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::models::{STATUS_IN_STORAGE, STATUS_PLACED};
    use crate::usecases::Usecases;
    use async_trait::async_trait;

    async fn seeded() -> (Usecases, AssetLocation, AssetLocation, AssetCategory) {
        let usecases = Usecases::new(memory_pool().await);

        let warehouse = usecases
            .locations
            .register(AssetLocation { id: "L1".into(), name: "Warehouse".into() })
            .await
            .unwrap();
        let office = usecases
            .locations
            .register(AssetLocation { id: "L2".into(), name: "Office".into() })
            .await
            .unwrap();
        let category = usecases
            .categories
            .register(AssetCategory { id: "C1".into(), name: "Electronics".into() })
            .await
            .unwrap();

        (usecases, warehouse, office, category)
    }

    fn create_request(quantity: i64, location_id: &str) -> CreateAssetRequest {
        CreateAssetRequest {
            id: None,
            category_id: "C1".into(),
            transaction_detail_id: None,
            name: "Laptop".into(),
            description: "14 inch".into(),
            quantity,
            image_url: "https://img.example/laptop.png".into(),
            location_id: location_id.into(),
        }
    }

    fn placement(asset_id: &str, quantity: i64, location_id: &str) -> AssetPlacement {
        AssetPlacement {
            asset_id: asset_id.into(),
            current_status: STATUS_IN_STORAGE,
            target_status: STATUS_PLACED,
            location_id: location_id.into(),
            quantity,
            updated_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn test_create_asset_detail_shows_every_unit_in_storage() {
        let (usecases, warehouse, _, category) = seeded().await;

        let asset = usecases.assets.create_asset(create_request(3, "L1")).await.unwrap();
        let detail = usecases.assets.asset_detail(&asset.id).await.unwrap();

        assert_eq!(detail.summary.quantity, 3);
        assert_eq!(detail.summary.category, category);
        assert_eq!(detail.asset_detail.len(), 3);
        assert!(detail
            .asset_detail
            .iter()
            .all(|u| u.status == STATUS_IN_STORAGE && u.location == warehouse));
    }

    #[actix_rt::test]
    async fn test_create_asset_with_unknown_location_is_rejected() {
        let (usecases, ..) = seeded().await;

        let err = usecases
            .assets
            .create_asset(create_request(2, "nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert!(usecases.assets.list_assets().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_create_asset_with_unknown_category_is_rejected() {
        let (usecases, ..) = seeded().await;

        let mut request = create_request(2, "L1");
        request.category_id = "C9".into();
        let err = usecases.assets.create_asset(request).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn test_create_asset_with_oversized_quantity_is_rejected() {
        let (usecases, ..) = seeded().await;

        let request: CreateAssetRequest = serde_json::from_str(
            r#"{"categoryId": "C1", "name": "X", "qty": 9223372036854775807, "locationId": "L1"}"#,
        )
        .unwrap();
        let err = usecases.assets.create_asset(request).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert!(usecases.assets.list_assets().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_list_assets_joins_category() {
        let (usecases, _, _, category) = seeded().await;
        usecases.assets.create_asset(create_request(1, "L1")).await.unwrap();

        let assets = usecases.assets.list_assets().await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].category, category);
        assert_eq!(assets[0].name, "Laptop");
    }

    #[actix_rt::test]
    async fn test_detail_of_missing_asset_is_not_found() {
        let (usecases, ..) = seeded().await;
        assert!(usecases.assets.asset_detail("missing").await.unwrap_err().is_not_found());
    }

    #[actix_rt::test]
    async fn test_placement_moves_exactly_quantity_units() {
        let (usecases, _, office, _) = seeded().await;
        let asset = usecases.assets.create_asset(create_request(5, "L1")).await.unwrap();

        let moved = usecases
            .assets
            .update_placement(placement(&asset.id, 2, "L2"))
            .await
            .unwrap();
        assert_eq!(moved.len(), 2);

        let detail = usecases.assets.asset_detail(&asset.id).await.unwrap();
        let placed: Vec<_> = detail
            .asset_detail
            .iter()
            .filter(|u| u.status == STATUS_PLACED)
            .collect();
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|u| u.location == office && moved.contains(&u.id)));
    }

    #[actix_rt::test]
    async fn test_placement_of_exactly_available_count_is_refused() {
        let (usecases, ..) = seeded().await;
        let asset = usecases.assets.create_asset(create_request(3, "L1")).await.unwrap();

        let moved = usecases
            .assets
            .update_placement(placement(&asset.id, 3, "L2"))
            .await
            .unwrap();
        assert!(moved.is_empty());

        let detail = usecases.assets.asset_detail(&asset.id).await.unwrap();
        assert!(detail.asset_detail.iter().all(|u| u.status == STATUS_IN_STORAGE));
    }

    #[actix_rt::test]
    async fn test_placement_to_unknown_location_is_rejected() {
        let (usecases, ..) = seeded().await;
        let asset = usecases.assets.create_asset(create_request(3, "L1")).await.unwrap();

        let err = usecases
            .assets
            .update_placement(placement(&asset.id, 1, "nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    /// Reports four units available and fails on the second row written.
    struct BrokenPlacementRepository;

    #[async_trait]
    impl AssetRepository for BrokenPlacementRepository {
        async fn create(&self, _: &Asset, _: &[AssetUnit]) -> Result<(), sqlx::Error> {
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Asset>, sqlx::Error> {
            Ok(Vec::new())
        }

        async fn get_by_id(&self, _: &str) -> Result<Option<Asset>, sqlx::Error> {
            Ok(None)
        }

        async fn units(&self, _: &str) -> Result<Vec<AssetUnit>, sqlx::Error> {
            Ok(Vec::new())
        }

        async fn count_by_status(&self, _: &str, _: i64) -> Result<i64, sqlx::Error> {
            Ok(4)
        }

        async fn unit_ids_by_status(&self, _: &str, _: i64, limit: i64) -> Result<Vec<String>, sqlx::Error> {
            Ok((0..limit).map(|i| format!("u{}", i)).collect())
        }

        async fn place_units(&self, _: &[String], _: &AssetPlacement) -> Result<(), PlacementWriteError> {
            Err(PlacementWriteError::Row { index: 1, source: sqlx::Error::RowNotFound })
        }
    }

    #[actix_rt::test]
    async fn test_placement_failure_reports_failing_index() {
        let (usecases, ..) = seeded().await;
        let assets = AssetUsecase::new(
            Arc::new(BrokenPlacementRepository),
            usecases.locations.clone(),
            usecases.categories.clone(),
        );

        let err = assets.update_placement(placement("a1", 2, "L2")).await.unwrap_err();
        assert!(matches!(err, ApiError::PersistenceError(..)));
        assert!(err.to_string().starts_with("failed to update asset in looping index(1)"));
    }
}
