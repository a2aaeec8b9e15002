//! Everything the donor profile page shows, derived in one pass

use chrono::{DateTime, Utc};
use common::models::{DonationRecord, DonationStatus, DonorProfile, UnlockedAchievement};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements;
use crate::badges::{resolve_badge, resolve_next_badge, NextBadge};
use crate::points::total_points;
use crate::rules::{BadgeTier, RulesTable};
use crate::streaks;

/// A donor's derived standing. Recomputed from records on every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonorSummary {
    pub donor_id: Uuid,
    pub total_points: i64,
    pub completed_donations: u32,
    pub scheduled_donations: u32,
    pub badge: BadgeTier,
    pub next: NextBadge,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub achievements: Vec<UnlockedAchievement>,
    /// Reward points of unlocked achievements, not part of `total_points`
    pub achievement_points: i64,
    pub last_donation_at: Option<DateTime<Utc>>,
    pub next_eligible_at: Option<DateTime<Utc>>,
}

pub fn summarize(
    rules: &RulesTable,
    profile: &DonorProfile,
    donations: &[DonationRecord],
    now: DateTime<Utc>,
) -> DonorSummary {
    let completed = donations.iter().filter(|d| d.is_completed()).count() as u32;
    let scheduled = donations
        .iter()
        .filter(|d| matches!(d.status, DonationStatus::Pending | DonationStatus::Upcoming))
        .count() as u32;

    let unlocked = achievements::evaluate(rules, profile, donations, now);
    let achievement_points = unlocked.iter().map(|a| a.points).sum();

    DonorSummary {
        donor_id: profile.id,
        total_points: total_points(rules, donations),
        completed_donations: completed,
        scheduled_donations: scheduled,
        badge: resolve_badge(&rules.badges, completed).clone(),
        next: resolve_next_badge(&rules.badges, completed),
        current_streak: streaks::compute_streak(donations),
        longest_streak: streaks::longest_streak(donations),
        achievements: unlocked,
        achievement_points,
        last_donation_at: streaks::completed_timestamps(donations).last().copied(),
        next_eligible_at: streaks::next_eligible_at(donations),
    }
}
