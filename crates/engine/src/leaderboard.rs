//! Leaderboard ranking

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use common::config::DEFAULT_LEADERBOARD_LIMIT;
use common::models::{BloodType, DonationRecord, DonorProfile, LeaderboardEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::points::total_points;
use crate::rules::RulesTable;

/// One donor's profile plus the snapshot of their donation records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorHistory {
    pub profile: DonorProfile,
    pub donations: Vec<DonationRecord>,
}

/// Time period a leaderboard covers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    Monthly,
    #[default]
    AllTime,
}

impl Period {
    /// Parse "week"/"weekly", "month"/"monthly", "all"/"all_time"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "week" | "weekly" => Some(Period::Weekly),
            "month" | "monthly" => Some(Period::Monthly),
            "all" | "all_time" | "alltime" => Some(Period::AllTime),
            _ => None,
        }
    }

    /// Start of the trailing window ending at `now`. `None` means no lower
    /// bound, either for all time or when the start precedes the smallest
    /// representable instant.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::AllTime => return None,
        };
        now.checked_sub_signed(Duration::days(days))
    }

    fn is_bounded(&self) -> bool {
        !matches!(self, Period::AllTime)
    }
}

/// Which donors and which slice of their history a ranking covers
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardQuery {
    pub period: Period,
    pub blood_type: Option<BloodType>,
    pub limit: usize,
    pub now: DateTime<Utc>,
}

impl LeaderboardQuery {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            period: Period::AllTime,
            blood_type: None,
            limit: DEFAULT_LEADERBOARD_LIMIT,
            now,
        }
    }

    fn in_period(&self, donation: &DonationRecord) -> bool {
        if !self.period.is_bounded() {
            return true;
        }
        let after_start = self
            .period
            .since(self.now)
            .map_or(true, |since| donation.timestamp >= since);
        after_start && donation.timestamp <= self.now
    }
}

/// Rank donors by points within the query's period.
///
/// Ties go to more completed donations, then to whoever reached their
/// latest donation earlier, then to the lower donor id. Donors with no
/// completed donation in the period are left out.
pub fn rank(
    rules: &RulesTable,
    donors: &[DonorHistory],
    query: &LeaderboardQuery,
) -> Vec<LeaderboardEntry> {
    let mut entries = rank_all(rules, donors, query);
    entries.truncate(query.limit.max(1));
    entries
}

/// Position of one donor on the full, uncapped board.
///
/// Fails with `NotFound` when the donor is absent or has no completed
/// donation in the period.
pub fn rank_of(
    rules: &RulesTable,
    donors: &[DonorHistory],
    query: &LeaderboardQuery,
    donor_id: Uuid,
) -> common::Result<u32> {
    rank_all(rules, donors, query)
        .into_iter()
        .find(|e| e.donor_id == donor_id)
        .map(|e| e.rank)
        .ok_or_else(|| common::Error::NotFound(format!("Donor {} is not ranked", donor_id)))
}

fn rank_all(
    rules: &RulesTable,
    donors: &[DonorHistory],
    query: &LeaderboardQuery,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = donors
        .iter()
        .filter(|d| query.blood_type.map_or(true, |bt| d.profile.blood_type == Some(bt)))
        .filter_map(|d| build_entry(rules, d, query))
        .collect();

    entries.sort_by(compare_entries);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx as u32 + 1;
    }

    debug!(
        "Ranked {} of {} donors for {:?}",
        entries.len(),
        donors.len(),
        query.period
    );
    entries
}

fn build_entry(
    rules: &RulesTable,
    donor: &DonorHistory,
    query: &LeaderboardQuery,
) -> Option<LeaderboardEntry> {
    let donations: Vec<DonationRecord> = donor
        .donations
        .iter()
        .filter(|d| d.is_completed() && query.in_period(d))
        .cloned()
        .collect();

    let last_donation_at = donations.iter().map(|d| d.timestamp).max()?;

    Some(LeaderboardEntry {
        rank: 0,
        donor_id: donor.profile.id,
        display_name: donor.profile.display_name.clone(),
        blood_type: donor.profile.blood_type,
        points: total_points(rules, &donations),
        completed_donations: donations.len() as u32,
        last_donation_at: Some(last_donation_at),
    })
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.completed_donations.cmp(&a.completed_donations))
        .then_with(|| a.last_donation_at.cmp(&b.last_donation_at))
        .then_with(|| a.donor_id.cmp(&b.donor_id))
}
