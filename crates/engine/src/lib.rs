//! Donation scoring, badge progression, achievements and leaderboards

pub mod achievements;
pub mod badges;
pub mod calculator;
pub mod input;
pub mod leaderboard;
pub mod points;
pub mod rules;
pub mod streaks;
pub mod summary;

#[cfg(test)]
mod tests;

pub use calculator::ScoreCalculator;
pub use rules::RulesTable;
