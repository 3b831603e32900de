//! Randomized meal plans drawn from the food catalog.
//!
//! Every slot is a uniform pick over the whole catalog. Callers pass the RNG:
//! handlers use `thread_rng`, tests a seeded `StdRng`.

use std::collections::HashMap;

use rand::Rng;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::dto::{PlanVariation, PlannedMeal, WeeklyPlan};
use super::presets::DIET_PRESETS;
use crate::foods::dto::FoodDetails;
use crate::foods::repo_types::FoodItem;
use crate::meals::repo_types::MealType;

pub const PLAN_DAYS: i64 = 7;
pub const VARIATION_DAYS: i64 = 3;

fn weekly_fallback() -> FoodDetails {
    FoodDetails::fixed("Apple", 95.0, 0.5, 25.0, 0.3)
}

fn variation_fallback() -> FoodDetails {
    FoodDetails::fixed("Generic Food", 100.0, 5.0, 10.0, 2.0)
}

/// Catalog entries stripped of ids, or the fallback when the catalog is empty.
/// Never returns an empty pool.
fn food_pool(catalog: &[FoodItem], fallback: fn() -> FoodDetails) -> Vec<FoodDetails> {
    if catalog.is_empty() {
        return vec![fallback()];
    }
    catalog.iter().map(FoodDetails::from).collect()
}

fn pick_meals<R: Rng + ?Sized>(
    pool: &[FoodDetails],
    start: OffsetDateTime,
    days: i64,
    rng: &mut R,
) -> Vec<PlannedMeal> {
    let mut meals = Vec::with_capacity((days as usize) * MealType::PLANNED.len());
    for day in 0..days {
        let date = start + Duration::days(day);
        for meal_type in MealType::PLANNED {
            let food = &pool[rng.gen_range(0..pool.len())];
            meals.push(PlannedMeal {
                date,
                meal_type,
                food: food.clone(),
            });
        }
    }
    meals
}

/// Seven days of breakfast, lunch and dinner from `start`.
pub fn generate_plan<R: Rng + ?Sized>(
    user_id: Uuid,
    catalog: &[FoodItem],
    start: OffsetDateTime,
    rng: &mut R,
) -> WeeklyPlan {
    let pool = food_pool(catalog, weekly_fallback);
    WeeklyPlan {
        user_id,
        start_date: start,
        meals: pick_meals(&pool, start, PLAN_DAYS, rng),
    }
}

/// One three-day plan per diet preset, each with its grocery list.
pub fn generate_plan_variations<R: Rng + ?Sized>(
    user_id: Uuid,
    catalog: &[FoodItem],
    start: OffsetDateTime,
    rng: &mut R,
) -> Vec<PlanVariation> {
    let pool = food_pool(catalog, variation_fallback);
    DIET_PRESETS
        .iter()
        .map(|preset| {
            debug!(%user_id, preset = preset.name, bias = preset.bias, "building plan variation");
            let meals = pick_meals(&pool, start, VARIATION_DAYS, &mut *rng);
            let grocery_list = grocery_list(&meals);
            PlanVariation {
                goal_name: preset.name.to_string(),
                description: preset.description.to_string(),
                meals,
                grocery_list,
            }
        })
        .collect()
}

/// `"<count>x <name>"` per distinct food, in order of first appearance.
pub fn grocery_list(meals: &[PlannedMeal]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for meal in meals {
        let name = meal.food.name.as_str();
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }
    order
        .into_iter()
        .map(|name| format!("{}x {}", counts[name], name))
        .collect()
}
