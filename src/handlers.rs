// src/handlers.rs
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::asset_handlers;
use crate::error::ApiResult;
use crate::models::{AssetCategory, AssetLocation, Employee, Vendor};
use crate::repositories::Record;
use crate::usecases::{RecordUsecase, Usecases};

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }

    /// A handled request that did not do what was asked.
    pub fn declined(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ==================== RECORD CRUD ====================
//
// Categories, locations, employees and vendors share these handlers. Each
// scope carries its own `RecordUsecase<T>` as app data.

pub async fn create_record<T: Record>(
    usecase: web::Data<RecordUsecase<T>>,
    payload: web::Json<T>,
) -> ApiResult<HttpResponse> {
    let created = usecase.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

pub async fn list_records<T: Record>(
    usecase: web::Data<RecordUsecase<T>>,
) -> ApiResult<HttpResponse> {
    let records = usecase.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

pub async fn get_record<T: Record>(
    usecase: web::Data<RecordUsecase<T>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let record = usecase.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/// The path id wins over any id in the body.
async fn apply_update<T: Record>(
    usecase: &RecordUsecase<T>,
    path: web::Path<String>,
    payload: web::Json<T>,
) -> ApiResult<T> {
    let mut record = payload.into_inner();
    *record.id_mut() = path.into_inner();
    usecase.update(record).await
}

pub async fn update_record<T: Record>(
    usecase: web::Data<RecordUsecase<T>>,
    path: web::Path<String>,
    payload: web::Json<T>,
) -> ApiResult<HttpResponse> {
    let updated = apply_update(&usecase, path, payload).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

/// Category updates answer 201, unlike the other records.
pub async fn update_category(
    usecase: web::Data<RecordUsecase<AssetCategory>>,
    path: web::Path<String>,
    payload: web::Json<AssetCategory>,
) -> ApiResult<HttpResponse> {
    let updated = apply_update(&usecase, path, payload).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(updated)))
}

pub async fn delete_record<T: Record>(
    usecase: web::Data<RecordUsecase<T>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    usecase.delete(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        (),
        format!("{} {} deleted", T::LABEL, id),
    )))
}

/// Every record route except update, which differs per record type.
fn record_scope<T: Record>(path: &str, usecase: Arc<RecordUsecase<T>>) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::from(usecase))
        .route("", web::post().to(create_record::<T>))
        .route("", web::get().to(list_records::<T>))
        .route("/", web::post().to(create_record::<T>))
        .route("/", web::get().to(list_records::<T>))
        .route("/{id}", web::get().to(get_record::<T>))
        .route("/{id}", web::delete().to(delete_record::<T>))
}

// ==================== ROUTES ====================

pub fn configure_api(cfg: &mut web::ServiceConfig, usecases: &Usecases) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                record_scope("/asset-category", usecases.categories.clone())
                    .route("/{id}", web::put().to(update_category)),
            )
            .service(
                record_scope("/asset-location", usecases.locations.clone())
                    .route("/{id}", web::put().to(update_record::<AssetLocation>)),
            )
            .service(
                record_scope("/employee", usecases.employees.clone())
                    .route("/{id}", web::put().to(update_record::<Employee>)),
            )
            .service(
                record_scope("/vendor", usecases.vendors.clone())
                    .route("/{id}", web::put().to(update_record::<Vendor>)),
            )
            .service(
                web::scope("/asset")
                    .app_data(web::Data::from(usecases.assets.clone()))
                    .route("", web::post().to(asset_handlers::create_asset))
                    .route("", web::get().to(asset_handlers::list_assets))
                    .route("/", web::post().to(asset_handlers::create_asset))
                    .route("/", web::get().to(asset_handlers::list_assets))
                    .route("/detail/{id}", web::get().to(asset_handlers::get_asset_detail))
                    .route("/placement/{id}", web::put().to(asset_handlers::update_placement)),
            ),
    );
}
