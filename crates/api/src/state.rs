//! Application state

use common::Config;
use engine::{RulesTable, ScoreCalculator};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub calculator: ScoreCalculator,
}

impl AppState {
    pub fn new(config: Config, rules: RulesTable) -> Self {
        Self {
            config,
            calculator: ScoreCalculator::new(rules),
        }
    }

    /// Load the rules table named by the config, or the built-in one
    pub fn from_config(config: Config) -> common::Result<Self> {
        let mut rules = match &config.rules_path {
            Some(path) => RulesTable::from_json_file(path)?,
            None => RulesTable::default(),
        };
        if let Some(offset) = config.local_utc_offset_minutes {
            rules.local_utc_offset_minutes = offset;
        }
        Ok(Self::new(config, rules))
    }
}
