//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/codelog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/codelog/` (~/.config/codelog/)
//! - Data: `$XDG_DATA_HOME/codelog/` (~/.local/share/codelog/)
//! - State/Logs: `$XDG_STATE_HOME/codelog/` (~/.local/state/codelog/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Defaults for new weekly goals
    #[serde(default)]
    pub goals: GoalDefaults,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Days before today covered by the heatmap
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: u32,

    /// Maximum number of suggested focus topics
    #[serde(default = "default_focus_count")]
    pub focus_count: usize,

    /// Calendar weeks shown in difficulty trends
    #[serde(default = "default_trend_weeks")]
    pub trend_weeks: u32,

    /// Sessions shown in recent activity
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            heatmap_days: default_heatmap_days(),
            focus_count: default_focus_count(),
            trend_weeks: default_trend_weeks(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.heatmap_days > MAX_HEATMAP_DAYS {
            return Err(Error::Config(format!(
                "analytics.heatmap_days must be at most {}",
                MAX_HEATMAP_DAYS
            )));
        }
        if self.trend_weeks > 52 {
            return Err(Error::Config(
                "analytics.trend_weeks must be at most 52".to_string(),
            ));
        }
        Ok(())
    }
}

/// Longest heatmap window, ten years of daily cells.
pub const MAX_HEATMAP_DAYS: u32 = 3660;

fn default_heatmap_days() -> u32 {
    crate::analytics::DEFAULT_WINDOW_DAYS
}

fn default_focus_count() -> usize {
    3
}

fn default_trend_weeks() -> u32 {
    4
}

fn default_recent_limit() -> usize {
    5
}

/// Targets pre-filled when a weekly goal is created without explicit values
#[derive(Debug, Deserialize, Clone)]
pub struct GoalDefaults {
    #[serde(default = "default_target_problems")]
    pub target_problems: u32,

    /// Minutes
    #[serde(default = "default_target_minutes")]
    pub target_minutes: u32,
}

impl Default for GoalDefaults {
    fn default() -> Self {
        Self {
            target_problems: default_target_problems(),
            target_minutes: default_target_minutes(),
        }
    }
}

fn default_target_problems() -> u32 {
    10
}

fn default_target_minutes() -> u32 {
    300
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analytics.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/codelog/config.toml` (~/.config/codelog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("codelog").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/codelog/` (~/.local/share/codelog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("codelog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/codelog/` (~/.local/state/codelog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("codelog")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/codelog/data.db` (~/.local/share/codelog/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/codelog/codelog.log` (~/.local/state/codelog/codelog.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("codelog.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
