//! Short-horizon views: difficulty mix over recent calendar weeks and the
//! latest sessions.

use crate::calendar::{Clock, DayKey};
use crate::types::{DifficultyLevel, PracticeLog};
use chrono::TimeZone;
use serde::Serialize;

/// Problems solved per difficulty in one Sunday-to-Saturday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyTrend {
    /// Sunday starting the week
    pub week_start: DayKey,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub total: u32,
}

/// Sunday on or before `day`.
fn sunday_on_or_before(day: DayKey) -> DayKey {
    day.offset(-i64::from(day.weekday_from_sunday()))
}

/// Difficulty mix for the last `weeks` calendar weeks, oldest first.
///
/// The newest entry is the (possibly partial) week containing today.
pub fn difficulty_trends<Tz: TimeZone>(
    logs: &[PracticeLog],
    clock: &Clock<Tz>,
    weeks: u32,
) -> Vec<DifficultyTrend> {
    let this_week = sunday_on_or_before(clock.today());

    (0..weeks)
        .rev()
        .map(|i| {
            let week_start = this_week.offset(-7 * i64::from(i));
            let week_end = week_start.offset(6);
            let mut trend = DifficultyTrend {
                week_start,
                easy: 0,
                medium: 0,
                hard: 0,
                total: 0,
            };

            for log in logs {
                let day = clock.day_of(log.date);
                if day < week_start || day > week_end {
                    continue;
                }
                let slot = match log.difficulty_level {
                    DifficultyLevel::Easy => &mut trend.easy,
                    DifficultyLevel::Medium => &mut trend.medium,
                    DifficultyLevel::Hard => &mut trend.hard,
                };
                *slot = slot.saturating_add(log.problem_count);
                trend.total = trend.total.saturating_add(log.problem_count);
            }

            trend
        })
        .collect()
}

/// The `limit` most recent logs, newest first.
pub fn recent_activity(logs: &[PracticeLog], limit: usize) -> Vec<&PracticeLog> {
    let mut sorted: Vec<&PracticeLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}
