//! Analytics module for codelog
//!
//! Pure functions over the practice-log and goal collections:
//! - Streaks (current and longest consecutive-day runs)
//! - Heatmap (gap-free trailing daily series)
//! - Aggregation engine (totals, breakdowns, weekly progress, mastery)
//! - Weekly goal progress
//! - Difficulty trends and recent activity
//!
//! Every function takes the data it needs plus an explicit [`Clock`](crate::calendar::Clock)
//! or zone, and returns a fresh value. Nothing here touches storage.

pub mod engine;
pub mod goals;
pub mod heatmap;
pub mod streak;
pub mod trends;

pub use engine::{generate_analytics, Analytics, WeeklyProgress};
pub use goals::{
    calculate_goal_progress, current_goal, goals_with_progress, percent_complete, GoalProgress,
};
pub use heatmap::{
    build_heatmap, daily_problem_counts, HeatmapCell, HeatmapWindow, DEFAULT_WINDOW_DAYS,
};
pub use streak::{calculate_streak, streak_from_days, StreakStats};
pub use trends::{difficulty_trends, recent_activity, DifficultyTrend};
