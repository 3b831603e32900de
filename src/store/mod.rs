//! Persistence seams.
//!
//! Services only see these traits; `AppState` carries an `Arc<dyn Store>`.
//! `PgStore` is the production implementation, `MemoryStore` backs the tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::foods::repo_types::{FoodItem, NewFood};
use crate::meals::repo_types::{MealLog, NewMealLog};
use crate::users::repo_types::{NewUser, ProfileUpdate, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// `None` when the email is already taken, including by a concurrent insert.
    async fn create_user(&self, new: &NewUser) -> anyhow::Result<Option<User>>;
    /// Writes biometrics and the derived goal. `None` if the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>>;
    async fn count_users(&self) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait FoodRepo: Send + Sync {
    /// Case-insensitive substring match on the name, ordered by name.
    async fn search_foods(&self, query: &str) -> anyhow::Result<Vec<FoodItem>>;
    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>>;
    /// Seeded and admin-managed entries only (`is_custom = false`).
    async fn list_catalog_foods(&self) -> anyhow::Result<Vec<FoodItem>>;
    async fn find_food(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
    async fn insert_food(&self, new: &NewFood) -> anyhow::Result<FoodItem>;
    async fn update_food(&self, id: Uuid, attrs: &NewFood) -> anyhow::Result<Option<FoodItem>>;
    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn count_foods(&self) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait MealRepo: Send + Sync {
    /// Newest first.
    async fn list_meal_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<MealLog>>;
    /// Logs with `start <= logged_at <= end`.
    async fn list_meals_between(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<MealLog>>;
    async fn count_meal_logs(&self) -> anyhow::Result<i64>;
}

/// One transaction. Dropping it without `commit` discards every write.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_food(&mut self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
    async fn insert_food(&mut self, new: &NewFood) -> anyhow::Result<FoodItem>;
    async fn insert_meal_log(&mut self, new: &NewMealLog) -> anyhow::Result<MealLog>;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}

#[async_trait]
pub trait Store: UserRepo + FoodRepo + MealRepo {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;
}

/// Escapes LIKE wildcards so the query is matched literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
