use axum::{extract::State, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::dto::{PlanVariation, WeeklyPlan};
use super::generator::{generate_plan, generate_plan_variations};
use crate::{auth::jwt::AuthUser, errors::AppError, state::AppState};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/generate", post(create_weekly_plan))
        .route("/plans/variations", post(create_variations))
}

#[instrument(skip(state))]
pub async fn create_weekly_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WeeklyPlan>, AppError> {
    let catalog = state.store.list_foods().await?;
    let plan = generate_plan(
        user_id,
        &catalog,
        OffsetDateTime::now_utc(),
        &mut rand::thread_rng(),
    );
    info!(%user_id, catalog_size = catalog.len(), "weekly plan generated");
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn create_variations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PlanVariation>>, AppError> {
    let catalog = state.store.list_foods().await?;
    let variations = generate_plan_variations(
        user_id,
        &catalog,
        OffsetDateTime::now_utc(),
        &mut rand::thread_rng(),
    );
    Ok(Json(variations))
}
