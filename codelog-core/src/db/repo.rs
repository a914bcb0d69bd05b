//! Database repository layer
//!
//! Each collection lives under one key as a complete JSON array. Every write
//! replaces the whole array.

use crate::error::{Error, Result};
use crate::types::{PracticeLog, WeeklyGoal};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key holding the practice log array.
pub const LOGS_KEY: &str = "codelog.logs";

/// Key holding the weekly goal array.
pub const GOALS_KEY: &str = "codelog.goals";

/// Key that keeps the last undecodable document stored under `key`.
pub fn corrupt_key(key: &str) -> String {
    format!("{key}.corrupt")
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Raw key/value access
    // ============================================

    /// Stored document for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT value FROM storage WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
    }

    /// Insert or replace the document for `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove the document for `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM storage WHERE key = ?", [key])?;
        Ok(changed > 0)
    }

    /// Decode the array stored under `key`.
    ///
    /// A missing key is an empty collection. So is an undecodable one: the
    /// failure is logged and the stored text is copied to [`corrupt_key`]
    /// before the next save can overwrite it.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                let backup = corrupt_key(key);
                tracing::warn!(
                    key,
                    backup = %backup,
                    error = %e,
                    "Stored collection is corrupt, treating as empty"
                );
                self.set(&backup, &raw)?;
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.set(key, &json)?;
        tracing::debug!(key, count = items.len(), "Saved collection");
        Ok(())
    }

    // ============================================
    // Practice log operations
    // ============================================

    /// All practice logs, in stored order.
    pub fn load_logs(&self) -> Result<Vec<PracticeLog>> {
        self.load_collection(LOGS_KEY)
    }

    /// Replace the stored practice logs.
    pub fn save_logs(&self, logs: &[PracticeLog]) -> Result<()> {
        self.save_collection(LOGS_KEY, logs)
    }

    /// Insert a log, or replace the one with the same id in place.
    pub fn upsert_log(&self, log: &PracticeLog) -> Result<()> {
        log.validate()?;

        let mut logs = self.load_logs()?;
        match logs.iter_mut().find(|l| l.id == log.id) {
            Some(existing) => *existing = log.clone(),
            None => logs.push(log.clone()),
        }
        self.save_logs(&logs)
    }

    /// Delete a log by id.
    pub fn delete_log(&self, id: &str) -> Result<PracticeLog> {
        let mut logs = self.load_logs()?;
        let pos = logs
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::LogNotFound(id.to_string()))?;
        let removed = logs.remove(pos);
        self.save_logs(&logs)?;
        Ok(removed)
    }

    // ============================================
    // Weekly goal operations
    // ============================================

    /// All weekly goals, in stored order.
    pub fn load_goals(&self) -> Result<Vec<WeeklyGoal>> {
        self.load_collection(GOALS_KEY)
    }

    /// Replace the stored weekly goals.
    pub fn save_goals(&self, goals: &[WeeklyGoal]) -> Result<()> {
        self.save_collection(GOALS_KEY, goals)
    }

    /// Insert a goal, or replace the one with the same id in place.
    pub fn upsert_goal(&self, goal: &WeeklyGoal) -> Result<()> {
        goal.validate()?;

        let mut goals = self.load_goals()?;
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        self.save_goals(&goals)
    }

    /// Delete a goal by id.
    pub fn delete_goal(&self, id: &str) -> Result<WeeklyGoal> {
        let mut goals = self.load_goals()?;
        let pos = goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::GoalNotFound(id.to_string()))?;
        let removed = goals.remove(pos);
        self.save_goals(&goals)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeekKey;
    use crate::types::{DifficultyLevel, NewPracticeLog, Topic};
    use chrono::TimeZone;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn create_test_log(problems: u32) -> PracticeLog {
        let date = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        NewPracticeLog::new(date, Topic::Arrays, DifficultyLevel::Easy, problems, 30)
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let db = test_db();
        assert!(db.load_logs().unwrap().is_empty());
        assert!(db.load_goals().unwrap().is_empty());
        assert_eq!(db.get(LOGS_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let db = test_db();
        db.set("k", "1").unwrap();
        db.set("k", "2").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("2"));

        assert!(db.remove("k").unwrap());
        assert!(!db.remove("k").unwrap());
    }

    #[test]
    fn test_save_and_load_logs() {
        let db = test_db();
        let logs = vec![create_test_log(1), create_test_log(2)];
        db.save_logs(&logs).unwrap();

        assert_eq!(db.load_logs().unwrap(), logs);
    }

    #[test]
    fn test_corrupt_logs_load_empty() {
        let db = test_db();
        db.set(LOGS_KEY, "{not json").unwrap();

        assert!(db.load_logs().unwrap().is_empty());
        // Raw text survives until the next save.
        assert_eq!(db.get(LOGS_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_corrupt_logs_kept_after_overwrite() {
        let db = test_db();
        let mut value = serde_json::to_value(vec![create_test_log(1)]).unwrap();
        value[0]["topic"] = serde_json::json!("quantum");
        let raw = value.to_string();
        db.set(LOGS_KEY, &raw).unwrap();

        let log = create_test_log(2);
        db.upsert_log(&log).unwrap();

        assert_eq!(db.load_logs().unwrap(), vec![log]);
        assert_eq!(
            db.get(&corrupt_key(LOGS_KEY)).unwrap().as_deref(),
            Some(raw.as_str())
        );
        assert!(db.get(&corrupt_key(GOALS_KEY)).unwrap().is_none());
    }

    #[test]
    fn test_negative_count_is_corrupt() {
        let db = test_db();
        let mut value = serde_json::to_value(vec![create_test_log(1)]).unwrap();
        value[0]["problemCount"] = serde_json::json!(-3);
        db.set(LOGS_KEY, &value.to_string()).unwrap();

        assert!(db.load_logs().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_log_replaces_in_place() {
        let db = test_db();
        let first = create_test_log(1);
        let second = create_test_log(2);
        db.upsert_log(&first).unwrap();
        db.upsert_log(&second).unwrap();

        let mut edited = first.clone();
        edited.problem_count = 9;
        db.upsert_log(&edited).unwrap();

        let logs = db.load_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, first.id);
        assert_eq!(logs[0].problem_count, 9);
        assert_eq!(logs[1].id, second.id);
    }

    #[test]
    fn test_upsert_log_rejects_invalid() {
        let db = test_db();
        let mut log = create_test_log(1);
        log.self_rating = Some(9);

        assert!(matches!(
            db.upsert_log(&log),
            Err(Error::InvalidRecord { .. })
        ));
        assert!(db.load_logs().unwrap().is_empty());
    }

    #[test]
    fn test_delete_log() {
        let db = test_db();
        let log = create_test_log(1);
        db.upsert_log(&log).unwrap();

        let removed = db.delete_log(&log.id).unwrap();
        assert_eq!(removed.id, log.id);
        assert!(db.load_logs().unwrap().is_empty());

        assert!(matches!(db.delete_log(&log.id), Err(Error::LogNotFound(_))));
    }

    #[test]
    fn test_goal_roundtrip_and_delete() {
        let db = test_db();
        let week = WeekKey::new(2024, 10).unwrap();
        let goal = WeeklyGoal::new(week, vec![Topic::Graphs], 10, 300);
        db.upsert_goal(&goal).unwrap();

        let goals = db.load_goals().unwrap();
        assert_eq!(goals, vec![goal.clone()]);

        db.delete_goal(&goal.id).unwrap();
        assert!(db.load_goals().unwrap().is_empty());
        assert!(matches!(
            db.delete_goal(&goal.id),
            Err(Error::GoalNotFound(_))
        ));
    }
}
