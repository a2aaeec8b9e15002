//! Application configuration

use std::env;
use std::path::PathBuf;

/// Default cap on the number of ranked leaderboard entries
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 100;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Optional JSON rules table; built-in defaults when absent
    pub rules_path: Option<PathBuf>,
    /// Overrides the rules table's local offset when set
    pub local_utc_offset_minutes: Option<i32>,
    pub leaderboard_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            rules_path: env::var("RULES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            local_utc_offset_minutes: env::var("LOCAL_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok()),
            leaderboard_limit: env::var("LEADERBOARD_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
                .max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            rules_path: None,
            local_utc_offset_minutes: None,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}
