use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Food record in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub is_custom: bool,            // user-submitted vs seeded/admin catalog
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert payload for a food row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub is_custom: bool,
}

impl NewFood {
    pub fn catalog(name: &str, calories: f64, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fats,
            is_custom: false,
        }
    }
}
