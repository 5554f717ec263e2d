// src/asset_handlers.rs
//! HTTP handlers for assets and unit placement

use actix_web::{web, HttpResponse};
use log::info;
use serde::Serialize;

use crate::error::ApiResult;
use crate::handlers::ApiResponse;
use crate::models::{AssetPlacement, CreateAssetRequest};
use crate::usecases::AssetUsecase;

#[derive(Debug, Serialize)]
pub struct CreatedAsset {
    pub id: String,
}

/// Answers 200 with the new asset id.
pub async fn create_asset(
    usecase: web::Data<AssetUsecase>,
    payload: web::Json<CreateAssetRequest>,
) -> ApiResult<HttpResponse> {
    let asset = usecase.create_asset(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        CreatedAsset { id: asset.id },
        format!("Asset registered with {} units", asset.quantity),
    )))
}

/// 204 when nothing has been registered yet.
pub async fn list_assets(usecase: web::Data<AssetUsecase>) -> ApiResult<HttpResponse> {
    let assets = usecase.list_assets().await?;

    if assets.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assets)))
}

pub async fn get_asset_detail(
    usecase: web::Data<AssetUsecase>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let detail = usecase.asset_detail(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail)))
}

/// Moves units of the asset named in the path. A refused placement is not an
/// error; it answers 202 and writes nothing.
pub async fn update_placement(
    usecase: web::Data<AssetUsecase>,
    path: web::Path<String>,
    payload: web::Json<AssetPlacement>,
) -> ApiResult<HttpResponse> {
    let mut placement = payload.into_inner();
    placement.asset_id = path.into_inner();

    let asset_id = placement.asset_id.clone();
    let requested = placement.quantity;
    let moved = usecase.update_placement(placement).await?;

    if moved.is_empty() {
        info!("Placement for asset {} not applied", asset_id);
        return Ok(HttpResponse::Accepted().json(ApiResponse::<()>::declined(format!(
            "Not enough units of asset {} to place {}",
            asset_id, requested
        ))));
    }

    let count = moved.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        moved,
        format!("{} units placed", count),
    )))
}
