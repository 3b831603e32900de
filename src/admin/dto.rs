use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_meals_logged: i64,
    pub total_food_items: i64,
}
