use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{like_pattern, FoodRepo, MealRepo, Store, UnitOfWork, UserRepo};
use crate::foods::repo_types::{FoodItem, NewFood};
use crate::meals::repo_types::{MealLog, MealLogRow, NewMealLog};
use crate::users::repo_types::{NewUser, ProfileUpdate, User};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, is_admin, age, gender,
                   height, weight, activity_level, goal, daily_calorie_goal, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, is_admin, age, gender,
                   height, weight, activity_level, goal, daily_calorie_goal, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create_user(&self, new: &NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, full_name, is_active, is_admin, age, gender,
                      height, weight, activity_level, goal, daily_calorie_goal, created_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .fetch_optional(&self.pool)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let b = &update.biometrics;
        let age = i32::try_from(b.age).context("age out of range")?;
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET age = $2, gender = $3, height = $4, weight = $5,
                   activity_level = $6, goal = $7, daily_calorie_goal = $8
             WHERE id = $1
            RETURNING id, email, password_hash, full_name, is_active, is_admin, age, gender,
                      height, weight, activity_level, goal, daily_calorie_goal, created_at
            "#,
        )
        .bind(id)
        .bind(age)
        .bind(b.gender.as_str())
        .bind(b.height_cm)
        .bind(b.weight_kg)
        .bind(b.activity_level.as_str())
        .bind(b.goal.as_str())
        .bind(update.daily_calorie_goal)
        .fetch_optional(&self.pool)
        .await
        .context("update profile")?;
        Ok(user)
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("count users")?;
        Ok(n)
    }
}

#[async_trait]
impl FoodRepo for PgStore {
    async fn search_foods(&self, query: &str) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories, protein, carbs, fats, is_custom, created_at
              FROM foods
             WHERE name ILIKE $1
             ORDER BY name ASC
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .context("search foods")?;
        Ok(rows)
    }

    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories, protein, carbs, fats, is_custom, created_at
              FROM foods
             ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list foods")?;
        Ok(rows)
    }

    async fn list_catalog_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories, protein, carbs, fats, is_custom, created_at
              FROM foods
             WHERE is_custom = FALSE
             ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list catalog foods")?;
        Ok(rows)
    }

    async fn find_food(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories, protein, carbs, fats, is_custom, created_at
              FROM foods
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find food")?;
        Ok(row)
    }

    async fn insert_food(&self, new: &NewFood) -> anyhow::Result<FoodItem> {
        let mut conn = self.pool.acquire().await.context("acquire connection")?;
        insert_food_on(&mut conn, new).await
    }

    async fn update_food(&self, id: Uuid, attrs: &NewFood) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            UPDATE foods
               SET name = $2, calories = $3, protein = $4, carbs = $5, fats = $6
             WHERE id = $1
            RETURNING id, name, calories, protein, carbs, fats, is_custom, created_at
            "#,
        )
        .bind(id)
        .bind(&attrs.name)
        .bind(attrs.calories)
        .bind(attrs.protein)
        .bind(attrs.carbs)
        .bind(attrs.fats)
        .fetch_optional(&self.pool)
        .await
        .context("update food")?;
        Ok(row)
    }

    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete food")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_foods(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool)
            .await
            .context("count foods")?;
        Ok(n)
    }
}

#[async_trait]
impl MealRepo for PgStore {
    async fn list_meal_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<MealLog>> {
        let rows = sqlx::query_as::<_, MealLogRow>(
            r#"
            SELECT id, user_id, food_id, logged_at, meal_type, snapshot, created_at
              FROM meal_logs
             WHERE user_id = $1
             ORDER BY logged_at DESC
             LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("list meal history")?;
        Ok(rows.into_iter().map(MealLog::from).collect())
    }

    async fn list_meals_between(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<MealLog>> {
        let rows = sqlx::query_as::<_, MealLogRow>(
            r#"
            SELECT id, user_id, food_id, logged_at, meal_type, snapshot, created_at
              FROM meal_logs
             WHERE user_id = $1
               AND logged_at >= $2
               AND logged_at <= $3
             ORDER BY logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .context("list meals in window")?;
        Ok(rows.into_iter().map(MealLog::from).collect())
    }

    async fn count_meal_logs(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meal_logs")
            .fetch_one(&self.pool)
            .await
            .context("count meal logs")?;
        Ok(n)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.context("begin tx")?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Rolls back on drop unless committed (sqlx `Transaction` semantics).
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_food(&mut self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        // FOR SHARE keeps the row from changing between read and snapshot.
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories, protein, carbs, fats, is_custom, created_at
              FROM foods
             WHERE id = $1
               FOR SHARE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .context("find food in tx")?;
        Ok(row)
    }

    async fn insert_food(&mut self, new: &NewFood) -> anyhow::Result<FoodItem> {
        insert_food_on(&mut self.tx, new).await
    }

    async fn insert_meal_log(&mut self, new: &NewMealLog) -> anyhow::Result<MealLog> {
        let row = sqlx::query_as::<_, MealLogRow>(
            r#"
            INSERT INTO meal_logs (user_id, food_id, logged_at, meal_type, snapshot)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, food_id, logged_at, meal_type, snapshot, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.food_id)
        .bind(new.logged_at)
        .bind(new.meal_type.as_str())
        .bind(Json(&new.snapshot))
        .fetch_one(&mut *self.tx)
        .await
        .context("insert meal log")?;
        Ok(row.into())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await.context("commit tx")?;
        Ok(())
    }
}

async fn insert_food_on(conn: &mut sqlx::PgConnection, new: &NewFood) -> anyhow::Result<FoodItem> {
    let row = sqlx::query_as::<_, FoodItem>(
        r#"
        INSERT INTO foods (name, calories, protein, carbs, fats, is_custom)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, calories, protein, carbs, fats, is_custom, created_at
        "#,
    )
    .bind(&new.name)
    .bind(new.calories)
    .bind(new.protein)
    .bind(new.carbs)
    .bind(new.fats)
    .bind(new.is_custom)
    .fetch_one(conn)
    .await
    .context("insert food")?;
    Ok(row)
}
