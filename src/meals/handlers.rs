use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{HistoryQuery, LogMealRequest, SummaryQuery, SummaryResponse};
use super::repo_types::MealLog;
use super::services::{log_meal, meal_history};
use super::summary::aggregate_daily_macros;
use crate::{
    auth::jwt::AuthUser,
    errors::AppError,
    extract::{AppJson, AppQuery},
    state::AppState,
};

/// Shown when the user has not filled in a profile yet.
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal_log))
        .route("/meals/history", get(list_history))
        .route("/analytics/summary", get(daily_summary))
}

#[instrument(skip(state, payload))]
pub async fn create_meal_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<LogMealRequest>,
) -> Result<(StatusCode, Json<MealLog>), AppError> {
    let log = log_meal(state.store.as_ref(), user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<HistoryQuery>,
) -> Result<Json<Vec<MealLog>>, AppError> {
    let logs = meal_history(state.store.as_ref(), user_id, q.limit).await?;
    Ok(Json(logs))
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<SummaryQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let store = state.store.as_ref();
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    let today = aggregate_daily_macros(store, user_id, q.date).await?;
    Ok(Json(SummaryResponse {
        today,
        goal: user.calorie_goal().unwrap_or(DEFAULT_CALORIE_GOAL),
    }))
}
