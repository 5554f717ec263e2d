// src/usecases/record.rs
//! Register/list/get/update/delete rules shared by categories, locations,
//! employees and vendors.

use std::sync::Arc;

use log::info;

use crate::error::{ApiError, ApiResult};
use crate::identity;
use crate::repositories::{CrudRepository, Record};

pub struct RecordUsecase<T: Record> {
    repo: Arc<dyn CrudRepository<T>>,
}

impl<T: Record> RecordUsecase<T> {
    pub fn new(repo: Arc<dyn CrudRepository<T>>) -> Self {
        Self { repo }
    }

    pub async fn register(&self, mut payload: T) -> ApiResult<T> {
        payload.validate()?;
        identity::ensure_id(payload.id_mut());

        self.repo
            .create(&payload)
            .await
            .map_err(|e| ApiError::persistence(format!("failed to register {}", T::LABEL), e))?;

        info!("Registered {} {}", T::LABEL, payload.id());
        Ok(payload)
    }

    pub async fn list(&self) -> ApiResult<Vec<T>> {
        self.repo
            .list()
            .await
            .map_err(|e| ApiError::persistence(format!("failed to list {}", T::LABEL), e))
    }

    pub async fn get(&self, id: &str) -> ApiResult<T> {
        if id.trim().is_empty() {
            return Err(ApiError::id_required());
        }

        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| ApiError::persistence(format!("failed to get {}", T::LABEL), e))?
            .ok_or_else(|| ApiError::not_found(T::LABEL, id))
    }

    /// The record must exist before any field is checked or written.
    pub async fn update(&self, payload: T) -> ApiResult<T> {
        self.get(payload.id()).await?;
        payload.validate()?;

        self.repo
            .update(&payload)
            .await
            .map_err(|e| ApiError::persistence(format!("failed to update {}", T::LABEL), e))?;

        info!("Updated {} {}", T::LABEL, payload.id());
        Ok(payload)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.get(id).await?;

        self.repo
            .delete(id)
            .await
            .map_err(|e| ApiError::persistence(format!("failed to delete {}", T::LABEL), e))?;

        info!("Deleted {} {}", T::LABEL, id);
        Ok(())
    }
}
