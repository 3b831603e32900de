use tracing::info;
use uuid::Uuid;

use super::dto::{FoodSelection, LogMealRequest};
use super::repo_types::{to_storage_precision, MealLog, NewMealLog, NutritionSnapshot};
use crate::errors::AppError;
use crate::store::Store;

pub const MAX_HISTORY: i64 = 200;

/// Records a meal and captures its nutrition snapshot.
///
/// Runs as one unit of work: begin, create the custom food when the request
/// carries inline attributes, insert the log, commit. An early return drops
/// the unit of work, which discards the custom food as well.
pub async fn log_meal(
    store: &dyn Store,
    user_id: Uuid,
    req: LogMealRequest,
) -> Result<MealLog, AppError> {
    let selection = req.food_item.into_selection()?;

    let mut uow = store.begin().await?;
    let food = match selection {
        FoodSelection::Existing(id) => uow
            .find_food(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food item {id} not found")))?,
        FoodSelection::Inline(new) => {
            let food = uow.insert_food(&new).await?;
            info!(food_id = %food.id, name = %food.name, "custom food created for meal log");
            food
        }
    };

    let log = uow
        .insert_meal_log(&NewMealLog {
            user_id,
            food_id: food.id,
            logged_at: to_storage_precision(req.date),
            meal_type: req.meal_type,
            snapshot: NutritionSnapshot::from(&food),
        })
        .await?;
    uow.commit().await?;

    info!(
        meal_id = %log.id,
        %user_id,
        food_id = %food.id,
        meal_type = log.meal_type.as_str(),
        "meal logged"
    );
    Ok(log)
}

pub async fn meal_history(
    store: &dyn Store,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<MealLog>, AppError> {
    let limit = limit.clamp(1, MAX_HISTORY);
    Ok(store.list_meal_history(user_id, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo_types::NewFood;
    use crate::meals::dto::FoodRef;
    use crate::meals::repo_types::MealType;
    use crate::meals::summary::aggregate_daily_macros;
    use crate::store::memory::MemoryStore;
    use crate::store::{FoodRepo, MealRepo};
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn inline(name: &str, calories: f64, protein: f64) -> FoodRef {
        FoodRef {
            name: Some(name.into()),
            calories: Some(calories),
            protein: Some(protein),
            carbs: Some(10.0),
            fats: Some(0.0),
            ..FoodRef::default()
        }
    }

    fn request(date: OffsetDateTime, meal_type: MealType, food_item: FoodRef) -> LogMealRequest {
        LogMealRequest {
            date,
            meal_type,
            food_item,
        }
    }

    #[tokio::test]
    async fn two_meals_same_day_sum() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        log_meal(&store, user, request(now, MealType::Lunch, inline("A", 100.0, 10.0)))
            .await
            .unwrap();
        log_meal(&store, user, request(now, MealType::Dinner, inline("B", 200.0, 20.0)))
            .await
            .unwrap();

        let totals = aggregate_daily_macros(&store, user, Some(now)).await.unwrap();
        assert_eq!(totals.calories, 300.0);
        assert_eq!(totals.protein, 30.0);
        assert_eq!(totals.meals_count, 2);

        // inline entries became custom catalog rows
        let foods = store.list_foods().await.unwrap();
        assert_eq!(foods.len(), 2);
        assert!(foods.iter().all(|f| f.is_custom));
    }

    #[tokio::test]
    async fn other_days_and_users_are_excluded() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let day = datetime!(2026-10-16 09:00 UTC);

        log_meal(&store, user, request(day, MealType::Breakfast, inline("A", 100.0, 1.0)))
            .await
            .unwrap();
        log_meal(
            &store,
            user,
            request(datetime!(2026-10-16 23:59:59.999999 UTC), MealType::Snack, inline("late", 50.0, 0.0)),
        )
        .await
        .unwrap();
        log_meal(
            &store,
            user,
            request(datetime!(2026-10-17 00:00 UTC), MealType::Snack, inline("next", 999.0, 0.0)),
        )
        .await
        .unwrap();
        log_meal(
            &store,
            Uuid::new_v4(),
            request(day, MealType::Lunch, inline("someone else", 400.0, 0.0)),
        )
        .await
        .unwrap();

        let totals = aggregate_daily_macros(&store, user, Some(day)).await.unwrap();
        assert_eq!(totals.calories, 150.0);
        assert_eq!(totals.meals_count, 2);
    }

    #[tokio::test]
    async fn sub_microsecond_time_stays_on_its_day() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let log = log_meal(
            &store,
            user,
            request(
                datetime!(2026-10-16 23:59:59.9999995 UTC),
                MealType::Snack,
                inline("midnight snack", 80.0, 2.0),
            ),
        )
        .await
        .unwrap();
        assert_eq!(log.date, datetime!(2026-10-16 23:59:59.999999 UTC));

        let same_day = aggregate_daily_macros(&store, user, Some(datetime!(2026-10-16 12:00 UTC)))
            .await
            .unwrap();
        assert_eq!(same_day.calories, 80.0);
        let next_day = aggregate_daily_macros(&store, user, Some(datetime!(2026-10-17 12:00 UTC)))
            .await
            .unwrap();
        assert_eq!(next_day.meals_count, 0);
    }

    #[tokio::test]
    async fn snapshot_survives_food_edit_and_delete() {
        let store = MemoryStore::with_foods(&[NewFood::catalog("Oatmeal", 150.0, 5.0, 25.0, 2.0)]).await;
        let food = store.list_foods().await.unwrap().remove(0);
        let user = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let log = log_meal(
            &store,
            user,
            request(
                now,
                MealType::Breakfast,
                FoodRef {
                    id: Some(food.id),
                    ..FoodRef::default()
                },
            ),
        )
        .await
        .unwrap();
        assert_eq!(log.food_id, Some(food.id));
        assert_eq!(log.food_snapshot.calories, 150.0);
        assert_eq!(log.food_snapshot.name, "Oatmeal");

        let before = aggregate_daily_macros(&store, user, Some(now)).await.unwrap();

        store
            .update_food(food.id, &NewFood::catalog("Oatmeal", 999.0, 99.0, 99.0, 99.0))
            .await
            .unwrap();
        let after_edit = aggregate_daily_macros(&store, user, Some(now)).await.unwrap();
        assert_eq!(before, after_edit);

        assert!(store.delete_food(food.id).await.unwrap());
        let after_delete = aggregate_daily_macros(&store, user, Some(now)).await.unwrap();
        assert_eq!(before, after_delete);

        let history = meal_history(&store, user, 50).await.unwrap();
        assert_eq!(history[0].food_id, None);
        assert_eq!(history[0].food_snapshot.calories, 150.0);
    }

    #[tokio::test]
    async fn missing_food_data_creates_nothing() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let err = log_meal(
            &store,
            user,
            request(
                OffsetDateTime::now_utc(),
                MealType::Snack,
                FoodRef {
                    name: Some("no calories".into()),
                    ..FoodRef::default()
                },
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.count_meal_logs().await.unwrap(), 0);
        assert_eq!(store.count_foods().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_food_id_is_not_found() {
        let store = MemoryStore::new();
        let err = log_meal(
            &store,
            Uuid::new_v4(),
            request(
                OffsetDateTime::now_utc(),
                MealType::Lunch,
                FoodRef {
                    id: Some(Uuid::new_v4()),
                    ..FoodRef::default()
                },
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.count_meal_logs().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_log_insert_rolls_back_custom_food() {
        let store = MemoryStore::failing_meal_inserts();
        let err = log_meal(
            &store,
            Uuid::new_v4(),
            request(OffsetDateTime::now_utc(), MealType::Lunch, inline("Orphan", 10.0, 1.0)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(store.count_foods().await.unwrap(), 0);
        assert_eq!(store.count_meal_logs().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_clamped() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for (i, day) in [
            datetime!(2026-10-14 08:00 UTC),
            datetime!(2026-10-16 08:00 UTC),
            datetime!(2026-10-15 08:00 UTC),
        ]
        .into_iter()
        .enumerate()
        {
            log_meal(
                &store,
                user,
                request(day, MealType::Breakfast, inline(&format!("f{i}"), 10.0, 1.0)),
            )
            .await
            .unwrap();
        }

        let history = meal_history(&store, user, 50).await.unwrap();
        let days: Vec<u8> = history.iter().map(|l| l.date.day()).collect();
        assert_eq!(days, vec![16, 15, 14]);

        assert_eq!(meal_history(&store, user, 0).await.unwrap().len(), 1);
    }

}
