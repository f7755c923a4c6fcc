//! Product routes: CRUD with filtering, search, sorting, and pagination.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError, Confirmation};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{CreateProduct, ProductResponse, UpdateProduct};
use crate::services::product::{self as product_service, ProductFilters};
use crate::AppState;

/// GET /api/products — list products with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<ApiResponse<PagedResult<ProductResponse>>>, AppError> {
    let result = product_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/products — create a new product.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let product = product_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(product))
}

/// GET /api/products/:id — get a product with its category embedded.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let product = product_service::read(&state.db, id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT/PATCH /api/products/:id — partially update a product.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let product = product_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/:id — delete a product.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Confirmation>>, AppError> {
    let confirmation = product_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(confirmation))
}
