//! Aggregation engine: folds the practice-log collection into the analytics
//! bundle shown on the dashboard.
//!
//! Everything here is recomputed from scratch on every call. There is no
//! cache; callers that memoize must get identical results either way.

use super::heatmap::{build_heatmap, daily_problem_counts, HeatmapCell, HeatmapWindow};
use super::streak::calculate_streak;
use crate::calendar::{Clock, DayKey, WeekKey};
use crate::config::AnalyticsConfig;
use crate::types::{DifficultyLevel, PracticeLog, Topic};
use chrono::TimeZone;
use serde::Serialize;
use std::collections::BTreeMap;

/// Problems and minutes for one active week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyProgress {
    pub week: WeekKey,
    pub problems: u64,
    /// Minutes
    pub time: u64,
}

/// Complete analytics bundle for a log collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Sum of `problem_count`
    pub total_problems: u64,
    /// Sum of `time_spent` in minutes
    pub total_time: u64,
    /// Number of *records* per topic; every topic present
    pub topic_breakdown: BTreeMap<Topic, u32>,
    /// Number of *records* per difficulty; every level present
    pub difficulty_breakdown: BTreeMap<DifficultyLevel, u32>,
    /// Active weeks only, oldest first
    pub weekly_progress: Vec<WeeklyProgress>,
    /// Mastery score 0-100 per topic; every topic present
    pub topic_mastery: BTreeMap<Topic, u32>,
    /// Practiced topics with the weakest mastery, weakest first
    pub suggested_focus: Vec<Topic>,
    pub streak: u32,
    pub longest_streak: u32,
    pub last_active: Option<DayKey>,
    /// Practiced yesterday but not yet today
    pub streak_at_risk: bool,
    /// Gap-free trailing daily problem counts
    pub heatmap_data: Vec<HeatmapCell>,
}

impl Analytics {
    /// Number of records the breakdown was built from.
    pub fn record_count(&self) -> u64 {
        self.topic_breakdown.values().map(|&n| u64::from(n)).sum()
    }

    /// Topic with the most records; ties go to the alphabetically first name.
    pub fn most_practiced_topic(&self) -> Option<Topic> {
        self.topic_breakdown
            .iter()
            .filter(|(_, &count)| count > 0)
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.as_str().cmp(a.as_str())))
            .map(|(topic, _)| *topic)
    }
}

/// Per-topic accumulator for the mastery score.
#[derive(Debug, Default, Clone, Copy)]
struct TopicDepth {
    records: u32,
    weight_sum: u64,
    minutes: u64,
}

impl TopicDepth {
    /// Average difficulty weight times total minutes.
    fn raw_score(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        (self.weight_sum as f64 / f64::from(self.records)) * self.minutes as f64
    }
}

/// Build the analytics bundle for `logs`.
pub fn generate_analytics<Tz: TimeZone>(
    logs: &[PracticeLog],
    clock: &Clock<Tz>,
    config: &AnalyticsConfig,
) -> Analytics {
    let mut total_problems = 0u64;
    let mut total_time = 0u64;
    let mut topic_breakdown: BTreeMap<Topic, u32> = Topic::ALL.iter().map(|t| (*t, 0)).collect();
    let mut difficulty_breakdown: BTreeMap<DifficultyLevel, u32> =
        DifficultyLevel::ALL.iter().map(|d| (*d, 0)).collect();
    let mut weeks: BTreeMap<WeekKey, (u64, u64)> = BTreeMap::new();
    let mut depth: BTreeMap<Topic, TopicDepth> = BTreeMap::new();

    for log in logs {
        let problems = u64::from(log.problem_count);
        let minutes = u64::from(log.time_spent);

        total_problems += problems;
        total_time += minutes;
        *topic_breakdown.entry(log.topic).or_insert(0) += 1;
        *difficulty_breakdown.entry(log.difficulty_level).or_insert(0) += 1;

        let week = weeks.entry(clock.day_of(log.date).week()).or_insert((0, 0));
        week.0 += problems;
        week.1 += minutes;

        let topic = depth.entry(log.topic).or_default();
        topic.records += 1;
        topic.weight_sum += u64::from(log.difficulty_level.weight());
        topic.minutes += minutes;
    }

    let weekly_progress = weeks
        .into_iter()
        .map(|(week, (problems, time))| WeeklyProgress {
            week,
            problems,
            time,
        })
        .collect();

    let topic_mastery = mastery_scores(&depth);
    let suggested_focus = suggest_focus(&depth, &topic_mastery, config.focus_count);

    let streak = calculate_streak(logs, clock);

    let window = HeatmapWindow::trailing(clock.today(), config.heatmap_days);
    let heatmap_data = build_heatmap(&daily_problem_counts(logs, clock.zone()), window);

    tracing::debug!(
        logs = logs.len(),
        total_problems,
        current_streak = streak.current_streak,
        "Generated analytics"
    );

    Analytics {
        total_problems,
        total_time,
        topic_breakdown,
        difficulty_breakdown,
        weekly_progress,
        topic_mastery,
        suggested_focus,
        streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        last_active: streak.last_active,
        streak_at_risk: streak.is_at_risk(clock.today()),
        heatmap_data,
    }
}

/// Normalize each topic's raw depth against the deepest topic, scaled to 100.
fn mastery_scores(depth: &BTreeMap<Topic, TopicDepth>) -> BTreeMap<Topic, u32> {
    let max_raw = depth
        .values()
        .map(TopicDepth::raw_score)
        .fold(0.0_f64, f64::max);

    Topic::ALL
        .iter()
        .map(|topic| {
            let raw = depth.get(topic).map(TopicDepth::raw_score).unwrap_or(0.0);
            let score = if max_raw > 0.0 {
                (raw / max_raw * 100.0).round().clamp(0.0, 100.0) as u32
            } else {
                0
            };
            (*topic, score)
        })
        .collect()
}

/// Practiced topics ordered by ascending mastery, ties by topic name.
fn suggest_focus(
    depth: &BTreeMap<Topic, TopicDepth>,
    mastery: &BTreeMap<Topic, u32>,
    limit: usize,
) -> Vec<Topic> {
    let mut practiced: Vec<(Topic, u32)> = depth
        .iter()
        .filter(|(_, d)| d.records > 0)
        .map(|(topic, _)| (*topic, mastery.get(topic).copied().unwrap_or(0)))
        .collect();

    practiced.sort_by(|(a, sa), (b, sb)| sa.cmp(sb).then_with(|| a.as_str().cmp(b.as_str())));
    practiced.into_iter().take(limit).map(|(t, _)| t).collect()
}
