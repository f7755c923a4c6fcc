//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Tables that already contain rows are
//! skipped, so re-running is safe.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const CATEGORIES: &[&str] = &[
    "Audio",
    "Cables & Adapters",
    "Components",
    "Displays",
    "Laptops",
    "Networking",
    "Peripherals",
    "Printers",
    "Smart Home",
    "Storage",
];

const SKU_SUFFIXES: &[&str] = &["ALFA", "BRVO", "CHRL", "DLTA", "ECHO"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Stockroom Seed Script ===");

    let category_ids = seed_categories(&pool).await?;
    seed_products(&pool, &category_ids).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Categories already exist ({count})");
        let ids = sqlx::query_scalar("SELECT id FROM categories ORDER BY name")
            .fetch_all(pool)
            .await?;
        return Ok(ids);
    }

    let mut ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let id: Uuid =
            sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(pool)
                .await?;
        ids.push(id);
    }

    println!("[done] Created {} categories", CATEGORIES.len());
    Ok(ids)
}

async fn seed_products(pool: &PgPool, category_ids: &[Uuid]) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Products already exist ({count})");
        return Ok(());
    }

    let mut serial = 0u32;
    let mut created = 0usize;
    for (ci, category_id) in category_ids.iter().enumerate() {
        // 5-15 products per category, spread deterministically
        let per_category = 5 + (ci * 7) % 11;
        for pi in 0..per_category {
            serial += 1;
            let sku = format!(
                "PROD-{serial:04}-{}",
                SKU_SUFFIXES[(ci + pi) % SKU_SUFFIXES.len()]
            );
            let name = format!("{} Item {}", CATEGORIES[ci % CATEGORIES.len()], pi + 1);
            // Prices 10.00-1000.00, stocks 0-50
            let price = Decimal::new(1000 + ((serial as i64 * 3719) % 99001), 2);
            let stock = (serial as i32 * 13) % 51;

            sqlx::query(
                "INSERT INTO products (name, sku, price, stock, category_id)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&name)
            .bind(&sku)
            .bind(price)
            .bind(stock)
            .bind(category_id)
            .execute(pool)
            .await?;
            created += 1;
        }
    }

    println!("[done] Created {created} products across {} categories", category_ids.len());
    Ok(())
}
