//! Weekly goal progress.
//!
//! A goal's `achieved` figures are joined from the logs that fall inside the
//! goal's sequential week and match its topic scope.

use crate::calendar::{day_key, Clock, WeekKey};
use crate::types::{Achieved, PracticeLog, WeeklyGoal};
use chrono::TimeZone;
use serde::Serialize;

/// Recompute `achieved` for `goal` from `logs`.
///
/// Targets and every other field pass through unchanged.
pub fn calculate_goal_progress<Tz: TimeZone>(
    goal: &WeeklyGoal,
    logs: &[PracticeLog],
    zone: &Tz,
) -> WeeklyGoal {
    let achieved = logs
        .iter()
        .filter(|log| goal.covers(log.topic))
        .filter(|log| goal.week.contains(day_key(log.date, zone)))
        .fold(Achieved::default(), |acc, log| Achieved {
            problem_count: acc.problem_count.saturating_add(log.problem_count),
            time_spent: acc.time_spent.saturating_add(log.time_spent),
        });

    WeeklyGoal {
        achieved,
        ..goal.clone()
    }
}

/// Recompute every goal, newest week first.
pub fn goals_with_progress<Tz: TimeZone>(
    goals: &[WeeklyGoal],
    logs: &[PracticeLog],
    zone: &Tz,
) -> Vec<WeeklyGoal> {
    let mut processed: Vec<WeeklyGoal> = goals
        .iter()
        .map(|goal| calculate_goal_progress(goal, logs, zone))
        .collect();
    processed.sort_by(|a, b| b.week.cmp(&a.week));
    processed
}

/// The goal set for the clock's current week, with progress filled in.
pub fn current_goal<Tz: TimeZone>(
    goals: &[WeeklyGoal],
    logs: &[PracticeLog],
    clock: &Clock<Tz>,
) -> Option<WeeklyGoal> {
    let week = clock.current_week();
    goals
        .iter()
        .find(|goal| goal.week == week)
        .map(|goal| calculate_goal_progress(goal, logs, clock.zone()))
}

/// `min(100, round(achieved / target * 100))`; 0 when the target is 0.
pub fn percent_complete(achieved: u32, target: u32) -> u32 {
    if target == 0 {
        return 0;
    }
    let pct = (f64::from(achieved) / f64::from(target) * 100.0).round();
    pct.min(100.0) as u32
}

/// Presentation summary of one goal's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub week: WeekKey,
    pub problem_percent: u32,
    pub time_percent: u32,
}

impl GoalProgress {
    pub fn of(goal: &WeeklyGoal) -> Self {
        Self {
            week: goal.week,
            problem_percent: percent_complete(
                goal.achieved.problem_count,
                goal.target_problem_count,
            ),
            time_percent: percent_complete(goal.achieved.time_spent, goal.target_time),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.problem_percent >= 100 && self.time_percent >= 100
    }
}
