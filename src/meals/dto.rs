use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::MealType;
use super::summary::DailyMacros;
use crate::errors::AppError;
use crate::foods::dto::FoodAttrs;
use crate::foods::repo_types::NewFood;

/// Body of `POST /meals`.
#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_type: MealType,
    #[serde(alias = "food")]
    pub food_item: FoodRef,
}

/// Either a catalog id or inline attributes for a new custom food.
#[derive(Debug, Default, Deserialize)]
pub struct FoodRef {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoodSelection {
    Existing(Uuid),
    Inline(NewFood),
}

impl FoodRef {
    /// An id wins over inline attributes; without one, name and calories are required.
    pub fn into_selection(self) -> Result<FoodSelection, AppError> {
        if let Some(id) = self.id {
            return Ok(FoodSelection::Existing(id));
        }
        match (self.name, self.calories) {
            (Some(name), Some(calories)) => {
                let attrs = FoodAttrs {
                    name,
                    calories,
                    protein: self.protein.unwrap_or(0.0),
                    carbs: self.carbs.unwrap_or(0.0),
                    fats: self.fats.unwrap_or(0.0),
                };
                Ok(FoodSelection::Inline(attrs.into_new_food(true)?))
            }
            _ => Err(AppError::validation(
                "food_item needs an id or a name and calories",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// `?date=` is RFC 3339. A `+hh:mm` offset must be sent as `%2B`, since a
/// bare `+` in a query string decodes to a space.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub today: DailyMacros,
    pub goal: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_takes_precedence() {
        let id = Uuid::new_v4();
        let r = FoodRef {
            id: Some(id),
            name: Some("Oatmeal".into()),
            calories: Some(150.0),
            ..FoodRef::default()
        };
        assert_eq!(r.into_selection().unwrap(), FoodSelection::Existing(id));
    }

    #[test]
    fn inline_becomes_custom_food() {
        let r = FoodRef {
            name: Some("A".into()),
            calories: Some(100.0),
            protein: Some(10.0),
            ..FoodRef::default()
        };
        let FoodSelection::Inline(food) = r.into_selection().unwrap() else {
            panic!("expected inline selection");
        };
        assert!(food.is_custom);
        assert_eq!(food.protein, 10.0);
        assert_eq!(food.fats, 0.0);
    }

    #[test]
    fn neither_id_nor_name_and_calories_is_rejected() {
        let only_name = FoodRef {
            name: Some("Mystery".into()),
            ..FoodRef::default()
        };
        assert!(matches!(
            only_name.into_selection(),
            Err(AppError::Validation(_))
        ));
        assert!(FoodRef::default().into_selection().is_err());
    }

    #[test]
    fn request_parses_from_json() {
        let req: LogMealRequest = serde_json::from_str(
            r#"{"date":"2026-10-16T08:30:00Z","meal_type":"breakfast",
                "food_item":{"name":"Oatmeal","calories":150,"protein":5}}"#,
        )
        .unwrap();
        assert_eq!(req.meal_type, MealType::Breakfast);
        assert_eq!(req.date.hour(), 8);
        assert_eq!(req.food_item.calories, Some(150.0));

        let bad = serde_json::from_str::<LogMealRequest>(
            r#"{"date":"2026-10-16T08:30:00Z","meal_type":"brunch","food_item":{}}"#,
        );
        assert!(bad.is_err());
    }
}
