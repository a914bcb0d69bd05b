//! Core domain types for codelog
//!
//! | Term | Definition |
//! |------|------------|
//! | **Practice log** | One practice session: when, which topic, how many problems, how long |
//! | **Topic** | A fixed category of problems (arrays, trees, dp, ...) |
//! | **Weekly goal** | Problem/time targets for one sequential week, optionally scoped to topics |
//! | **Achieved** | Progress toward a goal, always recomputed from logs |
//!
//! Records serialize with camelCase field names so stored collections keep the
//! journal's established JSON shape.

use crate::calendar::WeekKey;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Enumerations
// ============================================

/// Problem category. The set is closed; every breakdown lists all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Arrays,
    Strings,
    #[serde(rename = "linkedlist")]
    LinkedList,
    Trees,
    Graphs,
    Dp,
    Greedy,
    Backtracking,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::Arrays,
        Topic::Strings,
        Topic::LinkedList,
        Topic::Trees,
        Topic::Graphs,
        Topic::Dp,
        Topic::Greedy,
        Topic::Backtracking,
        Topic::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Arrays => "arrays",
            Topic::Strings => "strings",
            Topic::LinkedList => "linkedlist",
            Topic::Trees => "trees",
            Topic::Graphs => "graphs",
            Topic::Dp => "dp",
            Topic::Greedy => "greedy",
            Topic::Backtracking => "backtracking",
            Topic::Other => "other",
        }
    }

    /// Display name for tables and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Arrays => "Arrays",
            Topic::Strings => "Strings",
            Topic::LinkedList => "Linked List",
            Topic::Trees => "Trees",
            Topic::Graphs => "Graphs",
            Topic::Dp => "Dynamic Programming",
            Topic::Greedy => "Greedy",
            Topic::Backtracking => "Backtracking",
            Topic::Other => "Other",
        }
    }
}

impl std::str::FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arrays" | "array" => Ok(Topic::Arrays),
            "strings" | "string" => Ok(Topic::Strings),
            "linkedlist" | "linked-list" | "linked_list" => Ok(Topic::LinkedList),
            "trees" | "tree" => Ok(Topic::Trees),
            "graphs" | "graph" => Ok(Topic::Graphs),
            "dp" | "dynamic-programming" => Ok(Topic::Dp),
            "greedy" => Ok(Topic::Greedy),
            "backtracking" => Ok(Topic::Backtracking),
            "other" => Ok(Topic::Other),
            _ => Err(format!("unknown topic: {}", s)),
        }
    }
}

/// How hard the problems in a session were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }

    /// Weight used by the mastery score.
    pub fn weight(&self) -> u32 {
        match self {
            DifficultyLevel::Easy => 1,
            DifficultyLevel::Medium => 2,
            DifficultyLevel::Hard => 3,
        }
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" => Ok(DifficultyLevel::Medium),
            "hard" => Ok(DifficultyLevel::Hard),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

/// Where the problems were solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    CodeForces,
    HackerRank,
    CodeChef,
    AtCoder,
    GeeksForGeeks,
    #[default]
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::CodeForces => "codeforces",
            Platform::HackerRank => "hackerrank",
            Platform::CodeChef => "codechef",
            Platform::AtCoder => "atcoder",
            Platform::GeeksForGeeks => "geeksforgeeks",
            Platform::Other => "other",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leetcode" => Ok(Platform::LeetCode),
            "codeforces" => Ok(Platform::CodeForces),
            "hackerrank" => Ok(Platform::HackerRank),
            "codechef" => Ok(Platform::CodeChef),
            "atcoder" => Ok(Platform::AtCoder),
            "geeksforgeeks" | "gfg" => Ok(Platform::GeeksForGeeks),
            "other" => Ok(Platform::Other),
            _ => Err(format!("unknown platform: {}", s)),
        }
    }
}

/// Kind of session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    #[default]
    Practice,
    Contest,
    Learning,
    MockInterview,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Practice => "practice",
            LogType::Contest => "contest",
            LogType::Learning => "learning",
            LogType::MockInterview => "mock_interview",
        }
    }
}

impl std::str::FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "practice" => Ok(LogType::Practice),
            "contest" => Ok(LogType::Contest),
            "learning" => Ok(LogType::Learning),
            "mock_interview" | "mock-interview" => Ok(LogType::MockInterview),
            _ => Err(format!("unknown log type: {}", s)),
        }
    }
}

// ============================================
// Practice Log
// ============================================

/// One recorded practice session.
///
/// Immutable once created; edits replace the whole record. Only `date`,
/// `topic`, `difficulty_level`, `problem_count` and `time_spent` feed analytics.
/// The free-form fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLog {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub log_type: LogType,
    pub topic: Topic,
    #[serde(default)]
    pub platform: Platform,
    pub problem_count: u32,
    pub difficulty_level: DifficultyLevel,
    /// Minutes
    pub time_spent: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub resources: String,
    #[serde(default)]
    pub next_steps: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_url: Option<String>,
    /// Self-assessed effort, 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zen_mode: Option<bool>,
}

impl PracticeLog {
    /// Check the invariants a stored record must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(invalid_log("id must not be empty"));
        }
        if let Some(rating) = self.self_rating {
            if !(1..=5).contains(&rating) {
                return Err(invalid_log(format!(
                    "self rating must be between 1 and 5, got {rating}"
                )));
            }
        }
        Ok(())
    }
}

fn invalid_log(message: impl Into<String>) -> Error {
    Error::InvalidRecord {
        record: "practice log",
        message: message.into(),
    }
}

/// Input for creating a [`PracticeLog`]; the id is assigned on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct NewPracticeLog {
    pub date: DateTime<Utc>,
    pub log_type: LogType,
    pub topic: Topic,
    pub platform: Platform,
    pub problem_count: u32,
    pub difficulty_level: DifficultyLevel,
    pub time_spent: u32,
    pub notes: String,
    pub resources: String,
    pub next_steps: String,
    pub tags: Vec<String>,
    pub problem_url: Option<String>,
    pub self_rating: Option<u8>,
    pub blockers: Option<String>,
    pub reflections: Option<String>,
    pub zen_mode: Option<bool>,
}

impl NewPracticeLog {
    /// Minimal session with empty free-form fields.
    pub fn new(
        date: DateTime<Utc>,
        topic: Topic,
        difficulty_level: DifficultyLevel,
        problem_count: u32,
        time_spent: u32,
    ) -> Self {
        Self {
            date,
            log_type: LogType::default(),
            topic,
            platform: Platform::default(),
            problem_count,
            difficulty_level,
            time_spent,
            notes: String::new(),
            resources: String::new(),
            next_steps: String::new(),
            tags: Vec::new(),
            problem_url: None,
            self_rating: None,
            blockers: None,
            reflections: None,
            zen_mode: None,
        }
    }

    /// Validate and assign a fresh id.
    pub fn build(self) -> Result<PracticeLog> {
        let log = PracticeLog {
            id: uuid::Uuid::new_v4().to_string(),
            date: self.date,
            log_type: self.log_type,
            topic: self.topic,
            platform: self.platform,
            problem_count: self.problem_count,
            difficulty_level: self.difficulty_level,
            time_spent: self.time_spent,
            notes: self.notes,
            resources: self.resources,
            next_steps: self.next_steps,
            tags: normalize_tags(self.tags),
            problem_url: self.problem_url.filter(|u| !u.trim().is_empty()),
            self_rating: self.self_rating,
            blockers: self.blockers,
            reflections: self.reflections,
            zen_mode: self.zen_mode,
        };
        log.validate()?;
        Ok(log)
    }
}

/// Trim, drop empties and de-duplicate while keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

// ============================================
// Weekly Goal
// ============================================

/// Progress recorded against a weekly goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achieved {
    pub problem_count: u32,
    /// Minutes
    pub time_spent: u32,
}

/// Targets for one sequential week.
///
/// `achieved` is derived: it is overwritten every time progress is
/// calculated and whatever was stored is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoal {
    pub id: String,
    pub week: WeekKey,
    /// Topics that count toward the goal; empty means every topic.
    #[serde(default)]
    pub topics: Vec<Topic>,
    pub target_problem_count: u32,
    /// Minutes
    pub target_time: u32,
    #[serde(default)]
    pub achieved: Achieved,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<Topic>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_reflection: Option<String>,
}

impl WeeklyGoal {
    /// New goal with a fresh id and no progress.
    pub fn new(
        week: WeekKey,
        topics: Vec<Topic>,
        target_problem_count: u32,
        target_time: u32,
    ) -> Self {
        let mut topics = topics;
        topics.sort();
        topics.dedup();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            week,
            topics,
            target_problem_count,
            target_time,
            achieved: Achieved::default(),
            notes: String::new(),
            streak_days: None,
            focus_areas: None,
            weekly_reflection: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether a log on `topic` counts toward this goal.
    pub fn covers(&self, topic: Topic) -> bool {
        self.topics.is_empty() || self.topics.contains(&topic)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRecord {
                record: "weekly goal",
                message: "id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_topic_roundtrip_names() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{}\"", topic.as_str()));
        }
        assert!("heaps".parse::<Topic>().is_err());
    }

    #[test]
    fn test_difficulty_weights() {
        assert_eq!(DifficultyLevel::Easy.weight(), 1);
        assert_eq!(DifficultyLevel::Medium.weight(), 2);
        assert_eq!(DifficultyLevel::Hard.weight(), 3);
    }

    #[test]
    fn test_build_assigns_id_and_normalizes_tags() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut input = NewPracticeLog::new(date, Topic::Arrays, DifficultyLevel::Easy, 3, 45);
        input.tags = vec![" two-pointer".into(), "".into(), "two-pointer".into(), "sorting".into()];

        let log = input.build().unwrap();
        assert!(!log.id.is_empty());
        assert_eq!(log.tags, vec!["two-pointer", "sorting"]);
    }

    #[test]
    fn test_build_rejects_bad_self_rating() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut input = NewPracticeLog::new(date, Topic::Trees, DifficultyLevel::Hard, 1, 60);
        input.self_rating = Some(7);

        let err = input.build().unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_practice_log_reads_stored_json_shape() {
        let json = r#"{
            "id": "abc",
            "date": "2024-01-01T10:00:00.000Z",
            "type": "contest",
            "topic": "linkedlist",
            "platform": "leetcode",
            "problemCount": 2,
            "difficultyLevel": "medium",
            "timeSpent": 40,
            "notes": "",
            "resources": "",
            "nextSteps": "",
            "tags": ["fast-slow"],
            "zenMode": true
        }"#;
        let log: PracticeLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.log_type, LogType::Contest);
        assert_eq!(log.topic, Topic::LinkedList);
        assert_eq!(log.platform, Platform::LeetCode);
        assert_eq!(log.problem_count, 2);
        assert_eq!(log.zen_mode, Some(true));
        assert!(log.blockers.is_none());
    }

    #[test]
    fn test_negative_counts_do_not_deserialize() {
        let json = r#"{
            "id": "abc",
            "date": "2024-01-01T10:00:00Z",
            "topic": "arrays",
            "problemCount": -1,
            "difficultyLevel": "easy",
            "timeSpent": 10
        }"#;
        assert!(serde_json::from_str::<PracticeLog>(json).is_err());
    }

    #[test]
    fn test_weekly_goal_covers() {
        let week = "2024-1".parse().unwrap();
        let all = WeeklyGoal::new(week, vec![], 10, 300);
        assert!(all.covers(Topic::Graphs));

        let scoped = WeeklyGoal::new(week, vec![Topic::Arrays, Topic::Arrays], 10, 300);
        assert_eq!(scoped.topics, vec![Topic::Arrays]);
        assert!(scoped.covers(Topic::Arrays));
        assert!(!scoped.covers(Topic::Trees));
    }

    #[test]
    fn test_weekly_goal_reads_padded_week() {
        let json = r#"{
            "id": "g1",
            "week": "2024-03",
            "topics": ["dp"],
            "targetProblemCount": 10,
            "targetTime": 300,
            "achieved": {"problemCount": 99, "timeSpent": 99},
            "notes": ""
        }"#;
        let goal: WeeklyGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.week.to_string(), "2024-3");
        assert_eq!(goal.topics, vec![Topic::Dp]);
    }
}
