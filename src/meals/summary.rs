//! Daily macro totals.
//!
//! Totals are computed from each log's snapshot only; the live food rows are
//! never consulted, so catalog edits and deletions leave history intact.

use serde::Serialize;
use time::{Duration, OffsetDateTime, Time};
use uuid::Uuid;

use super::repo_types::MealLog;
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct DailyMacros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub meals_count: usize,
}

/// Inclusive `[00:00:00.000000, 23:59:59.999999]` of `at`'s calendar day, in `at`'s offset.
pub fn day_window(at: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = at.replace_time(Time::MIDNIGHT);
    let end = start + Duration::DAY - Duration::MICROSECOND;
    (start, end)
}

pub fn sum_snapshots(logs: &[MealLog]) -> DailyMacros {
    logs.iter().fold(
        DailyMacros {
            meals_count: logs.len(),
            ..DailyMacros::default()
        },
        |mut acc, log| {
            let s = &log.food_snapshot;
            acc.calories += s.calories;
            acc.protein += s.protein;
            acc.carbs += s.carbs;
            acc.fats += s.fats;
            acc
        },
    )
}

pub async fn aggregate_daily_macros(
    store: &dyn Store,
    user_id: Uuid,
    as_of: Option<OffsetDateTime>,
) -> anyhow::Result<DailyMacros> {
    let (start, end) = day_window(as_of.unwrap_or_else(OffsetDateTime::now_utc));
    let logs = store.list_meals_between(user_id, start, end).await?;
    Ok(sum_snapshots(&logs))
}
