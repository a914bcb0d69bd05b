//! # codelog-core
//!
//! Core library for codelog - a coding-practice journal.
//!
//! This library provides:
//! - Domain types for practice logs and weekly goals
//! - Calendar keys (local day, sequential week) and an injectable clock
//! - Analytics: streaks, heatmap, breakdowns, topic mastery, goal progress
//! - Problem URL detection
//! - Storage of the log and goal collections in SQLite
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use codelog_core::analytics::generate_analytics;
//! use codelog_core::{Clock, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let logs = db.load_logs().expect("failed to load logs");
//! let analytics = generate_analytics(&logs, &Clock::system(), &config.analytics);
//! println!("current streak: {}", analytics.streak);
//! ```

// Re-export commonly used items at the crate root
pub use calendar::{day_key, Clock, DayKey, WeekKey};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod calendar;
pub mod config;
pub mod db;
pub mod detect;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
