//! Consecutive-day streaks.
//!
//! A streak is a run of calendar days each holding at least one practice
//! log. Multiple logs on one day count once.

use crate::calendar::{days_between, Clock, DayKey};
use crate::types::PracticeLog;
use chrono::TimeZone;
use serde::Serialize;
use std::collections::BTreeSet;

/// Streak statistics derived from a log collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    /// Consecutive active days ending today or yesterday (0 if the chain is broken)
    pub current_streak: u32,
    /// Longest run of consecutive active days ever observed
    pub longest_streak: u32,
    /// Most recent active day
    pub last_active: Option<DayKey>,
}

impl StreakStats {
    /// Active yesterday but not yet today: one more day without practice
    /// breaks the streak.
    pub fn is_at_risk(&self, today: DayKey) -> bool {
        self.current_streak > 0 && self.last_active == Some(today.pred())
    }
}

/// Compute streaks for `logs`, bucketing dates in the clock's zone.
pub fn calculate_streak<Tz: TimeZone>(logs: &[PracticeLog], clock: &Clock<Tz>) -> StreakStats {
    let days: BTreeSet<DayKey> = logs.iter().map(|log| clock.day_of(log.date)).collect();
    streak_from_days(&days, clock.today())
}

/// Compute streaks from a set of active days relative to `today`.
pub fn streak_from_days(days: &BTreeSet<DayKey>, today: DayKey) -> StreakStats {
    let Some(&last_active) = days.iter().next_back() else {
        return StreakStats::default();
    };

    let longest = longest_run(days);

    // A future-dated latest day is neither today nor yesterday: chain broken.
    let chain_alive = last_active == today || last_active == today.pred();
    let current = if chain_alive {
        let mut run = 1u32;
        let mut newer = last_active;
        for &day in days.iter().rev().skip(1) {
            if days_between(day, newer) == 1 {
                run += 1;
                newer = day;
            } else {
                break;
            }
        }
        run
    } else {
        0
    };

    StreakStats {
        current_streak: current,
        longest_streak: longest.max(current),
        last_active: Some(last_active),
    }
}

/// Longest run of 1-day gaps over sorted unique days (1 for a single day).
fn longest_run(days: &BTreeSet<DayKey>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<DayKey> = None;

    for &day in days {
        run = match prev {
            Some(p) if days_between(p, day) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DifficultyLevel, NewPracticeLog, Topic};
    use chrono::{FixedOffset, Utc};

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn days(list: &[&str]) -> BTreeSet<DayKey> {
        list.iter().map(|s| day(s)).collect()
    }

    fn log_at(rfc3339: &str) -> PracticeLog {
        let date = chrono::DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc);
        NewPracticeLog::new(date, Topic::Arrays, DifficultyLevel::Easy, 1, 10)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        let stats = streak_from_days(&BTreeSet::new(), day("2024-01-10"));
        assert_eq!(stats, StreakStats::default());
        assert_eq!(stats.last_active, None);
    }

    #[test]
    fn test_consecutive_days_ending_today() {
        let stats = streak_from_days(
            &days(&["2024-01-08", "2024-01-09", "2024-01-10"]),
            day("2024-01-10"),
        );
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.last_active, Some(day("2024-01-10")));
    }

    #[test]
    fn test_streak_survives_until_end_of_next_day() {
        let active = days(&["2024-01-08", "2024-01-09"]);
        assert_eq!(streak_from_days(&active, day("2024-01-10")).current_streak, 2);
        assert_eq!(streak_from_days(&active, day("2024-01-11")).current_streak, 0);
    }

    #[test]
    fn test_broken_chain_keeps_longest() {
        let stats = streak_from_days(
            &days(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-20"]),
            day("2024-02-01"),
        );
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn test_current_counts_only_latest_run() {
        let stats = streak_from_days(
            &days(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-09", "2024-01-10"]),
            day("2024-01-10"),
        );
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn test_single_old_log() {
        let stats = streak_from_days(&days(&["2023-06-01"]), day("2024-01-10"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_runs_across_month_and_year_boundaries() {
        let stats = streak_from_days(
            &days(&["2023-12-30", "2023-12-31", "2024-01-01"]),
            day("2024-01-01"),
        );
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn test_same_day_logs_collapse() {
        let logs = vec![
            log_at("2024-01-09T08:00:00Z"),
            log_at("2024-01-09T20:00:00Z"),
            log_at("2024-01-10T09:00:00Z"),
        ];
        let clock = Clock::fixed(Utc, day("2024-01-10"));
        let stats = calculate_streak(&logs, &clock);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_bucketing_follows_clock_zone() {
        // 23:30 UTC on the 9th is already the 10th in UTC+2
        let logs = vec![log_at("2024-01-08T12:00:00Z"), log_at("2024-01-09T23:30:00Z")];

        let utc = Clock::fixed(Utc, day("2024-01-10"));
        assert_eq!(calculate_streak(&logs, &utc).current_streak, 2);

        let plus_two = Clock::fixed(FixedOffset::east_opt(2 * 3600).unwrap(), day("2024-01-10"));
        let stats = calculate_streak(&logs, &plus_two);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.last_active, Some(day("2024-01-10")));
    }

    #[test]
    fn test_longest_never_below_current() {
        let samples = [
            days(&[]),
            days(&["2024-01-10"]),
            days(&["2024-01-01", "2024-01-03", "2024-01-05"]),
            days(&["2024-01-05", "2024-01-06", "2024-01-07", "2024-01-09", "2024-01-10"]),
        ];
        for active in &samples {
            let stats = streak_from_days(active, day("2024-01-10"));
            assert!(stats.longest_streak >= stats.current_streak);
        }
    }

    #[test]
    fn test_at_risk() {
        let stats = streak_from_days(&days(&["2024-01-08", "2024-01-09"]), day("2024-01-10"));
        assert!(stats.is_at_risk(day("2024-01-10")));

        let stats = streak_from_days(&days(&["2024-01-09", "2024-01-10"]), day("2024-01-10"));
        assert!(!stats.is_at_risk(day("2024-01-10")));
    }
}
