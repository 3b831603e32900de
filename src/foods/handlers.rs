use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{FoodAttrs, FoodDetails, SearchQuery};
use super::repo_types::FoodItem;
use super::services::{add_custom_food, recognize_food, search_foods};
use crate::{
    auth::jwt::AuthUser,
    errors::AppError,
    extract::{AppJson, AppQuery},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_custom_food))
        .route("/ai/recognize", post(recognize))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<SearchQuery>,
) -> Result<Json<Vec<FoodItem>>, AppError> {
    let foods = search_foods(state.store.as_ref(), q.search.as_deref()).await?;
    Ok(Json(foods))
}

#[instrument(skip(state, payload))]
pub async fn create_custom_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    AppJson(payload): AppJson<FoodAttrs>,
) -> Result<(StatusCode, Json<FoodItem>), AppError> {
    let food = add_custom_food(state.store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
pub async fn recognize(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<FoodDetails>, AppError> {
    let catalog = state.store.list_foods().await?;
    let food = recognize_food(&catalog, &mut rand::thread_rng());
    Ok(Json(food))
}
