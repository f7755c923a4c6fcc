//! Category service: CRUD over the category reference table.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, Confirmation, FieldErrors};
use crate::models::category::{Category, CategoryResponse, CreateCategory, UpdateCategory};

/// List all categories ordered by name. Reference data set, no pagination.
pub async fn list(pool: &PgPool) -> Result<Vec<CategoryResponse>, AppError> {
    let categories = sqlx::query_as::<_, CategoryResponse>(
        "SELECT id, name FROM categories ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Create a new category.
pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<CategoryResponse, AppError> {
    let mut errors: FieldErrors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    };
    if input.name.is_none() {
        errors.add("name", "name is required");
    }
    errors.into_result()?;

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES ($1) RETURNING *",
    )
    .bind(input.name.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(category.into())
}

/// Find a category by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<CategoryResponse, AppError> {
    sqlx::query_as::<_, CategoryResponse>("SELECT id, name FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

/// Update a category by ID. Absent fields are left untouched.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateCategory,
) -> Result<CategoryResponse, AppError> {
    find_by_id(pool, id).await?;

    input
        .validate()
        .map_err(|e| AppError::Validation(e.into()))?;

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = COALESCE($2, name), updated_at = NOW()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.name.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(category.into())
}

/// Delete a category by ID.
///
/// RESTRICT policy: refuses with a conflict while any product still
/// references the category. The FK constraint backs the check against races.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Confirmation, AppError> {
    find_by_id(pool, id).await?;

    let dependents = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM products WHERE category_id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(format!(
            "Cannot delete category: {dependents} product(s) still reference it"
        )));
    }

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict(
                    "Cannot delete category: products still reference it".to_string(),
                )
            }
            _ => AppError::Database(e),
        })?;

    Ok(Confirmation::new("Category deleted successfully"))
}
