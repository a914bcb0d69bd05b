//! Error types for codelog-core

use thiserror::Error;

/// Main error type for the codelog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Date or day key that cannot be parsed
    #[error("invalid date '{input}': {message}")]
    InvalidDate { input: String, message: String },

    /// Week key that cannot be parsed or is out of range
    #[error("invalid week key '{0}'")]
    InvalidWeek(String),

    /// Record that fails validation at construction time
    #[error("invalid {record}: {message}")]
    InvalidRecord {
        record: &'static str,
        message: String,
    },

    /// Practice log not found
    #[error("practice log not found: {0}")]
    LogNotFound(String),

    /// Weekly goal not found
    #[error("weekly goal not found: {0}")]
    GoalNotFound(String),
}

/// Result type alias for codelog-core
pub type Result<T> = std::result::Result<T, Error>;
