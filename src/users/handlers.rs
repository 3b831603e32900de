use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ProfileResponse, ProfileUpdateRequest};
use super::services::{get_profile, update_profile};
use crate::{auth::jwt::AuthUser, errors::AppError, extract::AppJson, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/users/profile", put(put_profile))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = get_profile(state.store.as_ref(), user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = update_profile(state.store.as_ref(), user_id, payload).await?;
    Ok(Json(user.into()))
}
