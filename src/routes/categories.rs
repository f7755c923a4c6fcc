//! Category routes: CRUD over the category reference table.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError, Confirmation};
use crate::models::category::{CategoryResponse, CreateCategory, UpdateCategory};
use crate::services::category as category_service;
use crate::AppState;

/// GET /api/categories — list all categories ordered by name.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, AppError> {
    let categories = category_service::list(&state.db).await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/categories — create a new category.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCategory>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let category = category_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(category))
}

/// GET /api/categories/:id — get a category by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let category = category_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(category))
}

/// PUT/PATCH /api/categories/:id — partially update a category.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategory>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let category = category_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/:id — delete a category (RESTRICT on dependents).
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Confirmation>>, AppError> {
    let confirmation = category_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(confirmation))
}
