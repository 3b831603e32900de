use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::foods::repo_types::FoodItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const PLANNED: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// Macros copied from a food at the moment it was logged.
///
/// Missing fields deserialize as zero so older or partial rows still sum.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionSnapshot {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl From<&FoodItem> for NutritionSnapshot {
    fn from(f: &FoodItem) -> Self {
        Self {
            name: f.name.clone(),
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fats: f.fats,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct MealLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub logged_at: OffsetDateTime,
    pub meal_type: String,
    pub snapshot: Json<NutritionSnapshot>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,      // null once the food is deleted
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_type: MealType,
    pub food_snapshot: NutritionSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealLogRow> for MealLog {
    fn from(r: MealLogRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            food_id: r.food_id,
            date: r.logged_at,
            // Only rows written through `NewMealLog` exist, so the label is known.
            meal_type: MealType::from_label(&r.meal_type).unwrap_or(MealType::Snack),
            food_snapshot: r.snapshot.0,
            created_at: r.created_at,
        }
    }
}

/// Drops sub-microsecond digits, matching what `timestamptz` keeps.
pub fn to_storage_precision(at: OffsetDateTime) -> OffsetDateTime {
    at - Duration::nanoseconds(i64::from(at.nanosecond() % 1_000))
}

/// Insert payload for a meal log; the snapshot is already captured.
#[derive(Debug, Clone)]
pub struct NewMealLog {
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub logged_at: OffsetDateTime,
    pub meal_type: MealType,
    pub snapshot: NutritionSnapshot,
}
