//! Category model and request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A `categories` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API representation of a category: id and name only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Payload for POST /api/categories. `name` is required; the check lives in
/// the service so a missing field lands in the per-field error map.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
}

/// Payload for PUT/PATCH /api/categories/{id}. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_response_drops_timestamps() {
        let category = Category {
            id: Uuid::new_v4(),
            name: "Electronics".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = CategoryResponse::from(category);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "Electronics");
        assert!(json.get("created_at").is_none());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn create_category_rejects_empty_name() {
        let payload = CreateCategory {
            name: Some(String::new()),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_category_allows_absent_name() {
        let payload = UpdateCategory { name: None };
        assert!(payload.validate().is_ok());
    }
}
