//! Dashboard statistics aggregation queries.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Products with stock below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Aggregated inventory statistics for the dashboard.
///
/// The four aggregates run as independent queries with no shared snapshot;
/// under concurrent writes each may reflect a slightly different instant.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_value: f64,
    pub low_stock: i64,
    pub total_products: i64,
    pub top_category: String,
}

/// Fetch all dashboard statistics in parallel queries.
pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats, AppError> {
    let (total_value, low_stock, total_products, top_category) = tokio::try_join!(
        fetch_total_value(pool),
        fetch_low_stock_count(pool),
        fetch_total_products(pool),
        fetch_top_category(pool),
    )?;

    Ok(DashboardStats {
        total_value,
        low_stock,
        total_products,
        top_category,
    })
}

/// Total inventory value: SUM(price * stock) rounded to 2 decimals, 0 when
/// there are no products.
async fn fetch_total_value(pool: &PgPool) -> Result<f64, AppError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(ROUND(SUM(price * stock), 2), 0) FROM products",
    )
    .fetch_one(pool)
    .await?;
    Ok(total.to_f64().unwrap_or(0.0))
}

/// Count products below the low-stock threshold.
async fn fetch_low_stock_count(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE stock < $1")
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn fetch_total_products(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Name of the category with the greatest summed product stock, "N/A" when
/// no products exist. Ties break on name ascending.
async fn fetch_top_category(pool: &PgPool) -> Result<String, AppError> {
    let name = sqlx::query_scalar::<_, String>(
        "SELECT c.name
         FROM products p
         JOIN categories c ON c.id = p.category_id
         GROUP BY c.id, c.name
         ORDER BY SUM(p.stock) DESC, c.name ASC
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(name.unwrap_or_else(|| "N/A".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_with_exactly_four_keys() {
        let stats = DashboardStats {
            total_value: 25.5,
            low_stock: 2,
            total_products: 4,
            top_category: "Peripherals".to_string(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(json["total_value"], serde_json::json!(25.5));
        assert_eq!(json["low_stock"], 2);
        assert_eq!(json["total_products"], 4);
        assert_eq!(json["top_category"], "Peripherals");
    }
}
