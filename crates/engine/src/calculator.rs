//! Shared handle over an injected rules table

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::models::{DonationRecord, DonorProfile, LeaderboardEntry, UnlockedAchievement};
use uuid::Uuid;

use crate::achievements;
use crate::badges::{self, NextBadge};
use crate::leaderboard::{self, DonorHistory, LeaderboardQuery};
use crate::points::{self, PointBreakdown};
use crate::rules::{BadgeTier, RulesTable};
use crate::streaks;
use crate::summary::{self, DonorSummary};

/// Calculates points, badges, streaks, achievements and rankings.
///
/// Cheap to clone; every call is pure and may run concurrently.
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    rules: Arc<RulesTable>,
}

impl ScoreCalculator {
    pub fn new(rules: RulesTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &RulesTable {
        &self.rules
    }

    pub fn calculate_points(&self, donation: &DonationRecord) -> PointBreakdown {
        points::calculate_points(&self.rules, donation)
    }

    pub fn total_points(&self, donations: &[DonationRecord]) -> i64 {
        points::total_points(&self.rules, donations)
    }

    pub fn resolve_badge(&self, completed_count: u32) -> &BadgeTier {
        badges::resolve_badge(&self.rules.badges, completed_count)
    }

    pub fn resolve_next_badge(&self, completed_count: u32) -> NextBadge {
        badges::resolve_next_badge(&self.rules.badges, completed_count)
    }

    pub fn compute_streak(&self, donations: &[DonationRecord]) -> u32 {
        streaks::compute_streak(donations)
    }

    pub fn evaluate_achievements(
        &self,
        profile: &DonorProfile,
        donations: &[DonationRecord],
        now: DateTime<Utc>,
    ) -> Vec<UnlockedAchievement> {
        achievements::evaluate(&self.rules, profile, donations, now)
    }

    pub fn summarize(
        &self,
        profile: &DonorProfile,
        donations: &[DonationRecord],
        now: DateTime<Utc>,
    ) -> DonorSummary {
        summary::summarize(&self.rules, profile, donations, now)
    }

    pub fn rank(&self, donors: &[DonorHistory], query: &LeaderboardQuery) -> Vec<LeaderboardEntry> {
        leaderboard::rank(&self.rules, donors, query)
    }

    pub fn rank_of(
        &self,
        donors: &[DonorHistory],
        query: &LeaderboardQuery,
        donor_id: Uuid,
    ) -> common::Result<u32> {
        leaderboard::rank_of(&self.rules, donors, query, donor_id)
    }
}
