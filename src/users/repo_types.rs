use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{daily_calorie_goal, ActivityLevel, Biometrics, Gender, Goal};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,          // Argon2 hash, not exposed in JSON
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<f64>,            // cm
    pub weight: Option<f64>,            // kg
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Stored biometrics, if all six inputs are present.
    pub fn biometrics(&self) -> Option<Biometrics> {
        Some(Biometrics {
            weight_kg: self.weight?,
            height_cm: self.height?,
            age: u32::try_from(self.age?).ok()?,
            gender: Gender::from_label(self.gender.as_deref()?),
            activity_level: ActivityLevel::from_label(self.activity_level.as_deref()?),
            goal: Goal::from_label(self.goal.as_deref()?),
        })
    }

    /// Goal recomputed from the stored biometrics, or the stored value when
    /// the profile is incomplete.
    pub fn calorie_goal(&self) -> Option<f64> {
        self.biometrics()
            .map(|b| daily_calorie_goal(&b))
            .or(self.daily_calorie_goal)
    }
}

/// Insert payload for registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
}

/// Validated profile write, goal already computed.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub biometrics: Biometrics,
    pub daily_calorie_goal: f64,
}
