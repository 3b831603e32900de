use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::StatsResponse;
use super::guard::AdminUser;
use crate::{
    errors::AppError,
    extract::AppJson,
    foods::{dto::FoodAttrs, repo_types::FoodItem},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/foods", get(list_global_foods).post(create_global_food))
        .route("/admin/foods/:id", put(update_food).delete(delete_food))
}

#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<StatsResponse>, AppError> {
    let store = state.store.as_ref();
    Ok(Json(StatsResponse {
        total_users: store.count_users().await?,
        total_meals_logged: store.count_meal_logs().await?,
        total_food_items: store.count_foods().await?,
    }))
}

#[instrument(skip(state, _admin))]
pub async fn list_global_foods(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<FoodItem>>, AppError> {
    Ok(Json(state.store.list_catalog_foods().await?))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_global_food(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<FoodAttrs>,
) -> Result<(StatusCode, Json<FoodItem>), AppError> {
    let new = payload.into_new_food(false)?;
    let food = state.store.insert_food(&new).await?;
    info!(admin_id = %admin.id, food_id = %food.id, name = %food.name, "global food created");
    Ok((StatusCode::CREATED, Json(food)))
}

/// Edits the catalog row only; meal logs keep the snapshot taken when they were written.
#[instrument(skip(state, admin, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<FoodAttrs>,
) -> Result<Json<FoodItem>, AppError> {
    let store = state.store.as_ref();
    let existing = store
        .find_food(id)
        .await?
        .ok_or_else(|| AppError::not_found("Food item not found"))?;
    let attrs = payload.into_new_food(existing.is_custom)?;
    let food = store
        .update_food(id, &attrs)
        .await?
        .ok_or_else(|| AppError::not_found("Food item not found"))?;
    info!(admin_id = %admin.id, food_id = %id, "food updated");
    Ok(Json(food))
}

#[instrument(skip(state, admin))]
pub async fn delete_food(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_food(id).await? {
        return Err(AppError::not_found("Food item not found"));
    }
    info!(admin_id = %admin.id, food_id = %id, "food deleted");
    Ok(StatusCode::NO_CONTENT)
}
