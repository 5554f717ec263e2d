// src/repositories/asset.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::{Asset, AssetPlacement, AssetUnit};

/// Failure while writing a placement. `Row` carries the position of the unit
/// that failed inside the selected id list.
#[derive(Debug)]
pub enum PlacementWriteError {
    Transaction(sqlx::Error),
    Row { index: usize, source: sqlx::Error },
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Inserts the asset and all of its units in one transaction.
    async fn create(&self, asset: &Asset, units: &[AssetUnit]) -> Result<(), sqlx::Error>;

    async fn list(&self) -> Result<Vec<Asset>, sqlx::Error>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Asset>, sqlx::Error>;

    async fn units(&self, asset_id: &str) -> Result<Vec<AssetUnit>, sqlx::Error>;

    async fn count_by_status(&self, asset_id: &str, status: i64) -> Result<i64, sqlx::Error>;

    /// Up to `limit` unit ids in store order. No ordering is imposed.
    async fn unit_ids_by_status(
        &self,
        asset_id: &str,
        status: i64,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error>;

    /// Moves every listed unit to the placement's location and target status.
    /// Either all rows are committed or none are.
    async fn place_units(
        &self,
        unit_ids: &[String],
        placement: &AssetPlacement,
    ) -> Result<(), PlacementWriteError>;
}

pub struct SqliteAssetRepository {
    pool: SqlitePool,
}

impl SqliteAssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const ASSET_COLUMNS: &str =
    "id, category_id, transaction_detail_id, name, description, image_url, qty, created_at";

#[async_trait]
impl AssetRepository for SqliteAssetRepository {
    async fn create(&self, asset: &Asset, units: &[AssetUnit]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO asset
                (id, category_id, transaction_detail_id, name, description, image_url, qty, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&asset.id)
        .bind(&asset.category_id)
        .bind(&asset.transaction_detail_id)
        .bind(&asset.name)
        .bind(&asset.description)
        .bind(&asset.image_url)
        .bind(asset.quantity)
        .bind(asset.created_at)
        .execute(&mut *tx)
        .await?;

        for unit in units {
            sqlx::query(
                "INSERT INTO asset_details (id, asset_id, location_id, status) VALUES (?, ?, ?, ?)",
            )
            .bind(&unit.id)
            .bind(&unit.asset_id)
            .bind(&unit.location_id)
            .bind(unit.status)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Asset>, sqlx::Error> {
        let sql = format!("SELECT {} FROM asset", ASSET_COLUMNS);
        sqlx::query_as::<_, Asset>(&sql).fetch_all(&self.pool).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Asset>, sqlx::Error> {
        let sql = format!("SELECT {} FROM asset WHERE id = ?", ASSET_COLUMNS);
        sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn units(&self, asset_id: &str) -> Result<Vec<AssetUnit>, sqlx::Error> {
        sqlx::query_as::<_, AssetUnit>(
            "SELECT id, asset_id, location_id, status, updated_at, removed_at FROM asset_details WHERE asset_id = ?",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_by_status(&self, asset_id: &str, status: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM asset_details WHERE asset_id = ? AND status = ?")
            .bind(asset_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
    }

    async fn unit_ids_by_status(
        &self,
        asset_id: &str,
        status: i64,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM asset_details WHERE asset_id = ? AND status = ? LIMIT ?")
            .bind(asset_id)
            .bind(status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn place_units(
        &self,
        unit_ids: &[String],
        placement: &AssetPlacement,
    ) -> Result<(), PlacementWriteError> {
        // Dropping `tx` on an early return rolls back every row written so far
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(PlacementWriteError::Transaction)?;

        for (index, unit_id) in unit_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE asset_details SET location_id = ?, status = ?, updated_at = ? WHERE id = ?",
            )
            .bind(&placement.location_id)
            .bind(placement.target_status)
            .bind(placement.updated_at)
            .bind(unit_id)
            .execute(&mut *tx)
            .await
            .map_err(|source| PlacementWriteError::Row { index, source })?;
        }

        tx.commit().await.map_err(PlacementWriteError::Transaction)
    }
}
