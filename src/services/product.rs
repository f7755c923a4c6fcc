//! Product service: CRUD with filtering, search, sorting, and pagination.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, Confirmation, FieldErrors};
use crate::models::category::CategoryResponse;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{CreateProduct, Product, ProductResponse, UpdateProduct};

/// Columns accepted for `sort_by`. Anything else is a validation error,
/// never interpolated into SQL.
pub const SORTABLE_COLUMNS: &[&str] = &["name", "sku", "price", "stock", "created_at"];

/// Filters for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Product row joined with its category name for eager embedding.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategory {
    id: Uuid,
    name: String,
    sku: String,
    price: Decimal,
    stock: i32,
    category_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: String,
}

impl From<ProductWithCategory> for ProductResponse {
    fn from(row: ProductWithCategory) -> Self {
        let category = CategoryResponse {
            id: row.category_id,
            name: row.category_name,
        };
        let product = Product {
            id: row.id,
            name: row.name,
            sku: row.sku,
            price: row.price,
            stock: row.stock,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        ProductResponse::with_category(product, category)
    }
}

/// Resolve `sort_by`/`sort_order` against the allow-list.
fn resolve_sort(filters: &ProductFilters) -> Result<(&str, &str), AppError> {
    let mut errors = FieldErrors::new();

    let sort_by = filters.sort_by.as_deref().unwrap_or("created_at");
    if !SORTABLE_COLUMNS.contains(&sort_by) {
        errors.add(
            "sort_by",
            format!("sort_by must be one of: {}", SORTABLE_COLUMNS.join(", ")),
        );
    }

    let sort_order = filters.sort_order.as_deref().unwrap_or("desc");
    let direction = match sort_order.to_ascii_lowercase().as_str() {
        "asc" => "ASC",
        "desc" => "DESC",
        _ => {
            errors.add("sort_order", "sort_order must be 'asc' or 'desc'");
            "DESC"
        }
    };

    errors.into_result()?;
    let sort_by = SORTABLE_COLUMNS
        .iter()
        .find(|c| **c == sort_by)
        .copied()
        .unwrap_or("created_at");
    Ok((sort_by, direction))
}

/// List products with filters, sorting, and pagination. Each item embeds its
/// category.
pub async fn list(
    pool: &PgPool,
    filters: &ProductFilters,
    pagination: &Pagination,
) -> Result<PagedResult<ProductResponse>, AppError> {
    let (sort_by, direction) = resolve_sort(filters)?;

    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.category_id.is_some() {
        param_index += 1;
        conditions.push(format!("p.category_id = ${param_index}"));
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(p.name ILIKE ${param_index} OR p.sku ILIKE ${param_index})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM products p {where_clause}");
    let data_sql = format!(
        "SELECT p.id, p.name, p.sku, p.price, p.stock, p.category_id, p.created_at, \
         p.updated_at, c.name AS category_name \
         FROM products p JOIN categories c ON c.id = p.category_id \
         {where_clause} ORDER BY p.{sort_by} {direction} LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, ProductWithCategory>(&data_sql);

    if let Some(category_id) = filters.category_id {
        count_query = count_query.bind(category_id);
        data_query = data_query.bind(category_id);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{search}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let rows = data_query.fetch_all(pool).await?;
    let items = rows.into_iter().map(ProductResponse::from).collect();

    Ok(PagedResult::new(items, total, pagination))
}

/// Create a new product. All write-time rules run before any mutation; every
/// violation lands in the per-field error map.
pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<ProductResponse, AppError> {
    let mut errors: FieldErrors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    };

    let required = [
        ("name", input.name.is_some()),
        ("sku", input.sku.is_some()),
        ("price", input.price.is_some()),
        ("stock", input.stock.is_some()),
        ("category_id", input.category_id.is_some()),
    ];
    for (field, present) in required {
        if !present {
            errors.add(field, format!("{field} is required"));
        }
    }

    if let Some(ref sku) = input.sku {
        if !errors.contains("sku") && sku_taken(pool, sku, None).await? {
            errors.add("sku", "sku has already been taken");
        }
    }
    if let Some(category_id) = input.category_id {
        if !category_exists(pool, category_id).await? {
            errors.add("category_id", "category_id must reference an existing category");
        }
    }
    errors.into_result()?;

    // Required checks passed above, so the unwraps cannot fire.
    let price = to_price(input.price.unwrap_or_default())?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, sku, price, stock, category_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(input.name.as_deref())
    .bind(input.sku.as_deref())
    .bind(price)
    .bind(input.stock)
    .bind(input.category_id)
    .fetch_one(pool)
    .await
    .map_err(map_constraint_violation)?;

    Ok(ProductResponse::new(product))
}

/// Find a product by ID without the category relation.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Product, AppError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Read a product with its category embedded.
pub async fn read(pool: &PgPool, id: Uuid) -> Result<ProductResponse, AppError> {
    let row = sqlx::query_as::<_, ProductWithCategory>(
        "SELECT p.id, p.name, p.sku, p.price, p.stock, p.category_id, p.created_at, \
         p.updated_at, c.name AS category_name \
         FROM products p JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(row.into())
}

/// Partially update a product. Only present fields are validated and applied;
/// an empty payload succeeds and changes nothing but `updated_at`.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateProduct,
) -> Result<ProductResponse, AppError> {
    find_by_id(pool, id).await?;

    let mut errors: FieldErrors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    };
    if let Some(ref sku) = input.sku {
        // Self-uniqueness exclusion: a no-op update keeping its own sku is fine.
        if !errors.contains("sku") && sku_taken(pool, sku, Some(id)).await? {
            errors.add("sku", "sku has already been taken");
        }
    }
    if let Some(category_id) = input.category_id {
        if !category_exists(pool, category_id).await? {
            errors.add("category_id", "category_id must reference an existing category");
        }
    }
    errors.into_result()?;

    let price = input.price.map(to_price).transpose()?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET
            name = COALESCE($2, name),
            sku = COALESCE($3, sku),
            price = COALESCE($4, price),
            stock = COALESCE($5, stock),
            category_id = COALESCE($6, category_id),
            updated_at = NOW()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.name.as_deref())
    .bind(input.sku.as_deref())
    .bind(price)
    .bind(input.stock)
    .bind(input.category_id)
    .fetch_one(pool)
    .await
    .map_err(map_constraint_violation)?;

    Ok(ProductResponse::new(product))
}

/// Delete a product by ID.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Confirmation, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(Confirmation::new("Product deleted successfully"))
}

/// Whether a sku is already taken by another product.
async fn sku_taken(pool: &PgPool, sku: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM products WHERE sku = $1 AND ($2::uuid IS NULL OR id <> $2)
        )",
    )
    .bind(sku)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

async fn category_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Convert a request price into the stored NUMERIC(10,2), rounding
/// half-away-from-zero.
fn to_price(price: f64) -> Result<Decimal, AppError> {
    Decimal::from_f64(price)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| AppError::validation("price", "price must be a valid number"))
}

/// Map storage constraint violations raised by check-then-write races to the
/// same per-field validation shape the pre-checks produce.
fn map_constraint_violation(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::validation("sku", "sku has already been taken")
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::validation("category_id", "category_id must reference an existing category")
        }
        sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
            AppError::validation("price", "price and stock must be at least 0")
        }
        _ => AppError::Database(e),
    }
}
