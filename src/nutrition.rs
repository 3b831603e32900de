//! Daily calorie target from biometrics (Mifflin-St Jeor).
//!
//! BMR = 10 x weight_kg + 6.25 x height_cm - 5 x age, then +5 for men and -161
//! otherwise. TDEE scales BMR by a fixed activity multiplier and the goal
//! shifts TDEE by 500 kcal.
//!
//! Everything here is total: range checks belong to the caller (see
//! `users::dto::ProfileUpdateRequest::validate`), and the label parsers fall
//! back to permissive defaults instead of failing.

use serde::{Deserialize, Serialize};

pub const LOSE_OFFSET_KCAL: f64 = -500.0;
pub const GAIN_OFFSET_KCAL: f64 = 500.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Anything that is not "male" takes the non-male branch.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Unknown labels resolve to `Sedentary` (multiplier 1.2).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    pub fn adjust(self, tdee: f64) -> f64 {
        match self {
            Goal::Lose => tdee + LOSE_OFFSET_KCAL,
            Goal::Gain => tdee + GAIN_OFFSET_KCAL,
            Goal::Maintain => tdee,
        }
    }

    /// Unknown labels leave TDEE unadjusted.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "lose" => Goal::Lose,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biometrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

pub fn daily_calorie_goal(b: &Biometrics) -> f64 {
    let bmr = bmr(b.weight_kg, b.height_cm, b.age, b.gender);
    b.goal.adjust(tdee(bmr, b.activity_level))
}
