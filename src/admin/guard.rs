use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    errors::AppError,
    state::AppState,
    store::Store,
    users::repo_types::User,
};

/// An authenticated user whose account carries the admin flag.
pub struct AdminUser(pub User);

/// Loads the user behind a token and checks the admin flag.
pub async fn require_admin(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    if !user.is_admin {
        warn!(%user_id, "non-admin tried an admin route");
        return Err(AppError::Forbidden("The user doesn't have enough privileges".into()));
    }
    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        let user = require_admin(state.store.as_ref(), user_id).await?;
        Ok(AdminUser(user))
    }
}
