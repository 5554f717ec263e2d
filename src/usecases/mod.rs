// src/usecases/mod.rs
//! Business rules. Every use-case receives its repositories at construction.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::models::{AssetCategory, AssetLocation, Employee, Vendor};
use crate::repositories::{Record, SqliteAssetRepository, SqliteRecordRepository};

pub mod asset;
pub mod record;

pub use asset::AssetUsecase;
pub use record::RecordUsecase;

/// All use-cases of the service, wired over one connection pool.
#[derive(Clone)]
pub struct Usecases {
    pub categories: Arc<RecordUsecase<AssetCategory>>,
    pub locations: Arc<RecordUsecase<AssetLocation>>,
    pub employees: Arc<RecordUsecase<Employee>>,
    pub vendors: Arc<RecordUsecase<Vendor>>,
    pub assets: Arc<AssetUsecase>,
}

fn record_usecase<T: Record>(pool: &SqlitePool) -> Arc<RecordUsecase<T>> {
    Arc::new(RecordUsecase::<T>::new(Arc::new(SqliteRecordRepository::<T>::new(
        pool.clone(),
    ))))
}

impl Usecases {
    pub fn new(pool: SqlitePool) -> Self {
        let categories = record_usecase::<AssetCategory>(&pool);
        let locations = record_usecase::<AssetLocation>(&pool);
        let employees = record_usecase::<Employee>(&pool);
        let vendors = record_usecase::<Vendor>(&pool);

        let assets = Arc::new(AssetUsecase::new(
            Arc::new(SqliteAssetRepository::new(pool)),
            locations.clone(),
            categories.clone(),
        ));

        Self {
            categories,
            locations,
            employees,
            vendors,
            assets,
        }
    }
}
