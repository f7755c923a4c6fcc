//! Product model and request/response DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::category::CategoryResponse;

/// Wire format for `created_at`, e.g. "05/Jan/2025". Part of the API
/// contract, not a display concern.
pub const CREATED_AT_FORMAT: &str = "%d/%b/%Y";

/// A `products` row. `updated_at` is storage-internal and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API representation of a product.
///
/// `category` is present only when the relation was loaded for the request
/// (read and list endpoints); create/update responses omit the key entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    pub created_at: String,
}

impl ProductResponse {
    /// Serialize without the embedded category.
    pub fn new(product: Product) -> Self {
        Self::build(product, None)
    }

    /// Serialize with the category relation embedded.
    pub fn with_category(product: Product, category: CategoryResponse) -> Self {
        Self::build(product, Some(category))
    }

    fn build(product: Product, category: Option<CategoryResponse>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            price: product.price.to_f64().unwrap_or(0.0),
            stock: product.stock,
            category_id: product.category_id,
            category,
            created_at: product.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// Payload for POST /api/products. All five fields are required; presence is
/// checked in the service so every missing field lands in the per-field error
/// map instead of failing body deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "sku must be between 1 and 255 characters"
    ))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, message = "price must be at least 0"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be at least 0"))]
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
}

/// Payload for PUT/PATCH /api/products/{id}. Every field is optional; only
/// present fields are validated and applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "sku must be between 1 and 255 characters"
    ))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, message = "price must be at least 0"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be at least 0"))]
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Mechanical Keyboard".to_string(),
            sku: "PROD-0001-MECH".to_string(),
            price: Decimal::new(7999, 2),
            stock: 12,
            category_id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 10, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 5, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn created_at_uses_day_month_abbrev_year() {
        let response = ProductResponse::new(sample_product());
        assert_eq!(response.created_at, "05/Jan/2025");
    }

    #[test]
    fn price_serializes_as_json_number() {
        let response = ProductResponse::new(sample_product());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["price"], serde_json::json!(79.99));
        assert_eq!(json["stock"], 12);
    }

    #[test]
    fn category_key_omitted_unless_loaded() {
        let product = sample_product();
        let category = CategoryResponse {
            id: product.category_id,
            name: "Peripherals".to_string(),
        };

        let bare = serde_json::to_value(ProductResponse::new(product.clone())).unwrap();
        assert!(bare.get("category").is_none());

        let loaded =
            serde_json::to_value(ProductResponse::with_category(product, category)).unwrap();
        assert_eq!(loaded["category"]["name"], "Peripherals");
    }

    #[test]
    fn create_product_validates_present_fields() {
        let payload = CreateProduct {
            name: Some("x".repeat(256)),
            sku: Some("SKU-1".to_string()),
            price: Some(-1.0),
            stock: Some(-2),
            category_id: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("stock"));
        assert!(!fields.contains_key("sku"));
    }

    #[test]
    fn update_product_empty_payload_is_valid() {
        let payload = UpdateProduct::default();
        assert!(payload.is_empty());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_product_rejects_negative_price() {
        let payload = UpdateProduct {
            price: Some(-0.01),
            ..UpdateProduct::default()
        };
        assert!(payload.validate().is_err());
    }
}
