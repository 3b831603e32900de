use tracing::info;
use uuid::Uuid;

use super::dto::ProfileUpdateRequest;
use super::repo_types::User;
use crate::errors::AppError;
use crate::store::Store;

pub async fn get_profile(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Validates biometrics, recomputes the calorie goal and stores both.
pub async fn update_profile(
    store: &dyn Store,
    user_id: Uuid,
    req: ProfileUpdateRequest,
) -> Result<User, AppError> {
    let update = req.validate()?;
    let user = store
        .update_profile(user_id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    info!(%user_id, goal = update.daily_calorie_goal, "profile updated");
    Ok(user)
}
