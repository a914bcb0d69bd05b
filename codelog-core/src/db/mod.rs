//! Database layer for codelog
//!
//! Logs and goals are stored as whole JSON documents under fixed keys in a
//! single SQLite table, with schema migrations tracked via PRAGMA user_version.

pub mod repo;
pub mod schema;

pub use repo::{corrupt_key, Database, GOALS_KEY, LOGS_KEY};
