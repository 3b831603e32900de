use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{FoodRepo, MealRepo, Store, UnitOfWork, UserRepo};
use crate::foods::repo_types::{FoodItem, NewFood};
use crate::meals::repo_types::{MealLog, NewMealLog};
use crate::users::repo_types::{NewUser, ProfileUpdate, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    foods: Vec<FoodItem>,
    meal_logs: Vec<MealLog>,
}

/// In-process store for tests. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_meal_inserts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `insert_meal_log` errors, to exercise rollback.
    pub fn failing_meal_inserts() -> Self {
        Self {
            fail_meal_inserts: true,
            ..Self::default()
        }
    }

    pub async fn with_foods(foods: &[NewFood]) -> Self {
        let store = Self::new();
        for f in foods {
            store.insert_food(f).await.expect("memory insert");
        }
        store
    }

    /// Flip the admin flag; there is no endpoint for it.
    pub fn promote(&self, user_id: Uuid) {
        let mut t = self.lock();
        if let Some(u) = t.users.iter_mut().find(|u| u.id == user_id) {
            u.is_admin = true;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn food_row(new: &NewFood) -> FoodItem {
    FoodItem {
        id: Uuid::new_v4(),
        name: new.name.clone(),
        calories: new.calories,
        protein: new.protein,
        carbs: new.carbs,
        fats: new.fats,
        is_custom: new.is_custom,
        created_at: OffsetDateTime::now_utc(),
    }
}

fn by_name(mut foods: Vec<FoodItem>) -> Vec<FoodItem> {
    foods.sort_by(|a, b| a.name.cmp(&b.name));
    foods
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new: &NewUser) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            full_name: new.full_name.clone(),
            is_active: true,
            is_admin: false,
            age: None,
            gender: None,
            height: None,
            weight: None,
            activity_level: None,
            goal: None,
            daily_calorie_goal: None,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(Some(user))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        let Some(u) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        let b = &update.biometrics;
        u.age = Some(i32::try_from(b.age)?);
        u.gender = Some(b.gender.as_str().into());
        u.height = Some(b.height_cm);
        u.weight = Some(b.weight_kg);
        u.activity_level = Some(b.activity_level.as_str().into());
        u.goal = Some(b.goal.as_str().into());
        u.daily_calorie_goal = Some(update.daily_calorie_goal);
        Ok(Some(u.clone()))
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl FoodRepo for MemoryStore {
    async fn search_foods(&self, query: &str) -> anyhow::Result<Vec<FoodItem>> {
        let needle = query.to_lowercase();
        let hits = self
            .lock()
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(by_name(hits))
    }

    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        Ok(by_name(self.lock().foods.clone()))
    }

    async fn list_catalog_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        let rows = self
            .lock()
            .foods
            .iter()
            .filter(|f| !f.is_custom)
            .cloned()
            .collect();
        Ok(by_name(rows))
    }

    async fn find_food(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        Ok(self.lock().foods.iter().find(|f| f.id == id).cloned())
    }

    async fn insert_food(&self, new: &NewFood) -> anyhow::Result<FoodItem> {
        let row = food_row(new);
        self.lock().foods.push(row.clone());
        Ok(row)
    }

    async fn update_food(&self, id: Uuid, attrs: &NewFood) -> anyhow::Result<Option<FoodItem>> {
        let mut t = self.lock();
        let Some(f) = t.foods.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        f.name = attrs.name.clone();
        f.calories = attrs.calories;
        f.protein = attrs.protein;
        f.carbs = attrs.carbs;
        f.fats = attrs.fats;
        Ok(Some(f.clone()))
    }

    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.foods.len();
        t.foods.retain(|f| f.id != id);
        if t.foods.len() == before {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for log in t.meal_logs.iter_mut().filter(|l| l.food_id == Some(id)) {
            log.food_id = None;
        }
        Ok(true)
    }

    async fn count_foods(&self) -> anyhow::Result<i64> {
        Ok(self.lock().foods.len() as i64)
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn list_meal_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<MealLog>> {
        let mut rows: Vec<MealLog> = self
            .lock()
            .meal_logs
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn list_meals_between(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<MealLog>> {
        Ok(self
            .lock()
            .meal_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.date >= start && l.date <= end)
            .cloned()
            .collect())
    }

    async fn count_meal_logs(&self) -> anyhow::Result<i64> {
        Ok(self.lock().meal_logs.len() as i64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            foods: Vec::new(),
            meal_logs: Vec::new(),
        }))
    }
}

/// Buffers writes and publishes them on commit.
struct MemoryUnitOfWork {
    store: MemoryStore,
    foods: Vec<FoodItem>,
    meal_logs: Vec<MealLog>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_food(&mut self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        if let Some(f) = self.foods.iter().find(|f| f.id == id) {
            return Ok(Some(f.clone()));
        }
        self.store.find_food(id).await
    }

    async fn insert_food(&mut self, new: &NewFood) -> anyhow::Result<FoodItem> {
        let row = food_row(new);
        self.foods.push(row.clone());
        Ok(row)
    }

    async fn insert_meal_log(&mut self, new: &NewMealLog) -> anyhow::Result<MealLog> {
        anyhow::ensure!(!self.store.fail_meal_inserts, "meal_logs insert rejected");
        let log = MealLog {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            food_id: Some(new.food_id),
            date: new.logged_at,
            meal_type: new.meal_type,
            food_snapshot: new.snapshot.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.meal_logs.push(log.clone());
        Ok(log)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryUnitOfWork {
            store,
            foods,
            meal_logs,
        } = *self;
        let mut t = store.lock();
        t.foods.extend(foods);
        t.meal_logs.extend(meal_logs);
        Ok(())
    }
}
