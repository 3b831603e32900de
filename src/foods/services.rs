use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::dto::{FoodAttrs, FoodDetails};
use super::repo_types::{FoodItem, NewFood};
use crate::errors::AppError;
use crate::store::Store;

/// Blank or missing query lists the whole catalog.
pub async fn search_foods(store: &dyn Store, query: Option<&str>) -> Result<Vec<FoodItem>, AppError> {
    let foods = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => store.search_foods(q).await?,
        None => store.list_foods().await?,
    };
    Ok(foods)
}

pub async fn add_custom_food(store: &dyn Store, attrs: FoodAttrs) -> Result<FoodItem, AppError> {
    let new = attrs.into_new_food(true)?;
    let food = store.insert_food(&new).await?;
    info!(food_id = %food.id, name = %food.name, "custom food created");
    Ok(food)
}

fn starter_catalog() -> Vec<NewFood> {
    vec![
        NewFood::catalog("Apple", 95.0, 0.5, 25.0, 0.3),
        NewFood::catalog("Banana", 105.0, 1.3, 27.0, 0.3),
        NewFood::catalog("Chicken Breast (100g)", 165.0, 31.0, 0.0, 3.6),
        NewFood::catalog("Rice (1 cup cooked)", 205.0, 4.3, 44.5, 0.4),
        NewFood::catalog("Egg (Large)", 78.0, 6.0, 0.6, 5.0),
    ]
}

/// Inserts the starter catalog when the foods table is empty. Returns rows added.
pub async fn seed_catalog(store: &dyn Store) -> anyhow::Result<usize> {
    if store.count_foods().await? > 0 {
        return Ok(0);
    }
    let foods = starter_catalog();
    for f in &foods {
        store.insert_food(f).await?;
    }
    info!(count = foods.len(), "seeded food catalog");
    Ok(foods.len())
}

/// Image recognition stub: a random catalog entry.
pub fn recognize_food<R: Rng + ?Sized>(catalog: &[FoodItem], rng: &mut R) -> FoodDetails {
    catalog
        .choose(rng)
        .map(FoodDetails::from)
        .unwrap_or_else(|| FoodDetails::fixed("Unknown Food", 0.0, 0.0, 0.0, 0.0))
}
