use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{ProfileUpdate, User};
use crate::errors::AppError;
use crate::nutrition::{daily_calorie_goal, ActivityLevel, Biometrics, Gender, Goal};

pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 300.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 500.0);

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateRequest {
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

fn in_range(field: &str, value: f64, (lo, hi): (f64, f64)) -> Result<(), AppError> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must be between {lo} and {hi}"
        )))
    }
}

impl ProfileUpdateRequest {
    /// Range-checks the biometrics and computes the calorie goal.
    pub fn validate(self) -> Result<ProfileUpdate, AppError> {
        let (min_age, max_age) = AGE_RANGE;
        if !(min_age..=max_age).contains(&self.age) {
            return Err(AppError::validation(format!(
                "age must be between {min_age} and {max_age}"
            )));
        }
        in_range("height", self.height, HEIGHT_RANGE_CM)?;
        in_range("weight", self.weight, WEIGHT_RANGE_KG)?;

        let biometrics = Biometrics {
            weight_kg: self.weight,
            height_cm: self.height,
            age: self.age,
            gender: self.gender,
            activity_level: self.activity_level,
            goal: self.goal,
        };
        Ok(ProfileUpdate {
            daily_calorie_goal: daily_calorie_goal(&biometrics),
            biometrics,
        })
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        let calorie_goal = u.calorie_goal();
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            is_active: u.is_active,
            is_admin: u.is_admin,
            age: u.age,
            gender: u.gender,
            height: u.height,
            weight: u.weight,
            activity_level: u.activity_level,
            goal: u.goal,
            daily_calorie_goal: calorie_goal,
            created_at: u.created_at,
        }
    }
}
