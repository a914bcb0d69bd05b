//! Contribution heatmap: a gap-free daily activity series.
//!
//! The builder materializes one cell per calendar day in the window,
//! zero-filling days without activity. Layout helpers (week columns, color
//! scale) work from the finished series and never go back to raw logs.

use crate::calendar::{days_between, DayKey};
use crate::types::PracticeLog;
use chrono::TimeZone;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default trailing window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Color scale never shrinks below this, so a few problems don't look maxed out.
pub const MIN_SCALE: u32 = 5;

/// Activity count for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: DayKey,
    pub count: u32,
}

/// Inclusive range of days covered by a heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapWindow {
    pub start: DayKey,
    pub end: DayKey,
}

impl HeatmapWindow {
    /// `days` days before `today` through `today` (`days + 1` cells).
    pub fn trailing(today: DayKey, days: u32) -> Self {
        Self {
            start: today.offset(-i64::from(days)),
            end: today,
        }
    }

    /// Number of cells the window produces (0 when `start` is after `end`).
    pub fn len(&self) -> usize {
        usize::try_from(days_between(self.start, self.end) + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Problems solved per local day.
pub fn daily_problem_counts<Tz: TimeZone>(
    logs: &[PracticeLog],
    zone: &Tz,
) -> BTreeMap<DayKey, u32> {
    let mut counts = BTreeMap::new();
    for log in logs {
        let day = crate::calendar::day_key(log.date, zone);
        let entry = counts.entry(day).or_insert(0u32);
        *entry = entry.saturating_add(log.problem_count);
    }
    counts
}

/// Dense, ascending series with one cell per day in `window`.
///
/// Days missing from `counts` get 0; entries outside the window are ignored.
pub fn build_heatmap(counts: &BTreeMap<DayKey, u32>, window: HeatmapWindow) -> Vec<HeatmapCell> {
    std::iter::successors(Some(window.start), |day| Some(day.succ()))
        .take(window.len())
        .map(|date| HeatmapCell {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Largest count in the series, floored at [`MIN_SCALE`].
pub fn max_count(series: &[HeatmapCell]) -> u32 {
    series
        .iter()
        .map(|cell| cell.count)
        .max()
        .unwrap_or(0)
        .max(MIN_SCALE)
}

/// Color bucket 0-4 for `count` on a scale topping out at `max`.
pub fn intensity(count: u32, max: u32) -> u8 {
    if count == 0 {
        return 0;
    }
    let ratio = (count as f64 / max.max(1) as f64).min(1.0);
    if ratio <= 0.25 {
        1
    } else if ratio <= 0.5 {
        2
    } else if ratio <= 0.75 {
        3
    } else {
        4
    }
}

/// Split the series into calendar-grid columns, each starting on Sunday.
///
/// The first and last columns may be partial.
pub fn weeks(series: &[HeatmapCell]) -> Vec<Vec<HeatmapCell>> {
    let mut columns: Vec<Vec<HeatmapCell>> = Vec::new();
    let mut current: Vec<HeatmapCell> = Vec::new();

    for cell in series {
        if cell.date.weekday_from_sunday() == 0 && !current.is_empty() {
            columns.push(std::mem::take(&mut current));
        }
        current.push(*cell);
    }
    if !current.is_empty() {
        columns.push(current);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DifficultyLevel, NewPracticeLog, Topic};
    use chrono::{FixedOffset, Utc};

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_window_has_n_plus_one_unique_ascending_cells() {
        let today = day("2024-03-01");
        for n in [0u32, 1, 7, 59, 365] {
            let series = build_heatmap(&BTreeMap::new(), HeatmapWindow::trailing(today, n));
            assert_eq!(series.len(), n as usize + 1);
            assert!(series.windows(2).all(|w| days_between(w[0].date, w[1].date) == 1));
            assert_eq!(series.last().map(|c| c.date), Some(today));
        }
    }

    #[test]
    fn test_default_window_spans_leap_day() {
        let series = build_heatmap(
            &BTreeMap::new(),
            HeatmapWindow::trailing(day("2024-12-31"), DEFAULT_WINDOW_DAYS),
        );
        assert_eq!(series.len(), 366);
        assert_eq!(series[0].date, day("2024-01-01"));
        assert!(series.iter().any(|c| c.date == day("2024-02-29")));
    }

    #[test]
    fn test_single_day_fill() {
        let mut counts = BTreeMap::new();
        counts.insert(day("2024-02-10"), 5);

        let series = build_heatmap(&counts, HeatmapWindow::trailing(day("2024-02-20"), 30));
        for cell in &series {
            if cell.date == day("2024-02-10") {
                assert_eq!(cell.count, 5);
            } else {
                assert_eq!(cell.count, 0);
            }
        }
    }

    #[test]
    fn test_counts_outside_window_ignored() {
        let mut counts = BTreeMap::new();
        counts.insert(day("2023-01-01"), 9);
        counts.insert(day("2024-03-02"), 9);

        let series = build_heatmap(&counts, HeatmapWindow::trailing(day("2024-03-01"), 10));
        assert!(series.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let window = HeatmapWindow {
            start: day("2024-03-02"),
            end: day("2024-03-01"),
        };
        assert!(window.is_empty());
        assert!(build_heatmap(&BTreeMap::new(), window).is_empty());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let mut counts = BTreeMap::new();
        counts.insert(day("2024-02-28"), 2);
        let window = HeatmapWindow::trailing(day("2024-03-01"), 14);
        assert_eq!(build_heatmap(&counts, window), build_heatmap(&counts, window));
    }

    #[test]
    fn test_daily_counts_sum_same_day_in_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = |s: &str, n: u32| {
            let date = chrono::DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
            NewPracticeLog::new(date, Topic::Graphs, DifficultyLevel::Medium, n, 30)
                .build()
                .unwrap()
        };
        // Both are March 1st in UTC-5, the second is March 2nd in UTC
        let logs = vec![at("2024-03-01T15:00:00Z", 2), at("2024-03-02T03:00:00Z", 3)];

        let counts = daily_problem_counts(&logs, &tz);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&day("2024-03-01")), Some(&5));
    }

    #[test]
    fn test_scale_and_intensity() {
        let series = vec![
            HeatmapCell { date: day("2024-01-01"), count: 1 },
            HeatmapCell { date: day("2024-01-02"), count: 2 },
        ];
        assert_eq!(max_count(&series), MIN_SCALE);
        assert_eq!(max_count(&[]), MIN_SCALE);

        assert_eq!(intensity(0, 10), 0);
        assert_eq!(intensity(2, 10), 1);
        assert_eq!(intensity(5, 10), 2);
        assert_eq!(intensity(7, 10), 3);
        assert_eq!(intensity(10, 10), 4);
        assert_eq!(intensity(50, 10), 4);
    }

    #[test]
    fn test_week_columns_start_on_sunday() {
        // 2024-03-01 is a Friday; 2024-03-03 is a Sunday
        let series = build_heatmap(
            &BTreeMap::new(),
            HeatmapWindow {
                start: day("2024-03-01"),
                end: day("2024-03-12"),
            },
        );
        let columns = weeks(&series);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].len(), 2);
        assert_eq!(columns[1].len(), 7);
        assert_eq!(columns[1][0].date, day("2024-03-03"));
        assert_eq!(columns[2].len(), 3);
    }
}
