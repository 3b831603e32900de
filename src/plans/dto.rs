use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::foods::dto::FoodDetails;
use crate::meals::repo_types::MealType;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlannedMeal {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_type: MealType,
    pub food: FoodDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlan {
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanVariation {
    pub goal_name: String,
    pub description: String,
    pub meals: Vec<PlannedMeal>,
    pub grocery_list: Vec<String>,
}
