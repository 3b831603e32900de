use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::foods::repo_types::{FoodItem, NewFood};

/// A food without its storage id, so the value stands on its own.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodDetails {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub is_custom: bool,
}

impl From<&FoodItem> for FoodDetails {
    fn from(f: &FoodItem) -> Self {
        Self {
            name: f.name.clone(),
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fats: f.fats,
            is_custom: f.is_custom,
        }
    }
}

impl FoodDetails {
    pub fn fixed(name: &str, calories: f64, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fats,
            is_custom: false,
        }
    }
}

/// Name and macros of a food, as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodAttrs {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

impl FoodAttrs {
    /// Checks the attributes once and turns them into an insert payload.
    pub fn into_new_food(self, is_custom: bool) -> Result<NewFood, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("food name is required"));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::validation(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }
        Ok(NewFood {
            name: name.to_string(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            is_custom,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}
