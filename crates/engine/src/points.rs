//! Donation point calculation

use common::models::DonationRecord;
use serde::{Deserialize, Serialize};

use crate::rules::{DistanceRules, RulesTable};

/// Points awarded per factor for a single donation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PointBreakdown {
    pub base: i64,
    pub urgency: i64,
    pub distance: i64,
    pub blood_rarity: i64,
    pub response_time: i64,
    pub time_of_day: i64,
    pub first_donation: i64,
    pub total: i64,
}

impl PointBreakdown {
    /// Factor name and awarded points, in display order
    pub fn factors(&self) -> [(&'static str, i64); 7] {
        [
            ("base", self.base),
            ("urgency", self.urgency),
            ("distance", self.distance),
            ("bloodRarity", self.blood_rarity),
            ("responseTime", self.response_time),
            ("timeOfDay", self.time_of_day),
            ("firstDonation", self.first_donation),
        ]
    }
}

/// Calculate the point breakdown for one donation.
///
/// Missing attributes contribute 0. The status is not consulted here;
/// only [`total_points`] restricts to completed donations.
pub fn calculate_points(rules: &RulesTable, donation: &DonationRecord) -> PointBreakdown {
    let scoring = &rules.scoring;

    let mut breakdown = PointBreakdown {
        base: scoring.base,
        urgency: scoring.urgency.points_for(donation.urgency),
        distance: distance_points(&scoring.distance, donation.distance()),
        blood_rarity: scoring.blood_rarity.points_for(donation.blood_type),
        response_time: scoring
            .response_time
            .points_for(donation.response_time_seconds),
        time_of_day: 0,
        first_donation: 0,
        total: 0,
    };

    if donation
        .local_hour(rules.local_utc_offset_minutes)
        .map_or(false, |hour| scoring.night.contains(hour))
    {
        breakdown.time_of_day = scoring.night.bonus;
    }

    if donation.is_first_donation.unwrap_or(false) {
        breakdown.first_donation = scoring.first_donation;
    }

    breakdown.total = breakdown.factors().iter().map(|(_, points)| points).sum();
    breakdown
}

fn distance_points(rules: &DistanceRules, distance_km: Option<f64>) -> i64 {
    match distance_km {
        Some(d) if d <= rules.local_max_km => rules.local_bonus,
        Some(d) if d >= rules.far_min_km => rules.far_bonus,
        _ => 0,
    }
}

/// Lifetime points: the sum of all completed donations' totals
pub fn total_points(rules: &RulesTable, donations: &[DonationRecord]) -> i64 {
    donations
        .iter()
        .filter(|d| d.is_completed())
        .map(|d| calculate_points(rules, d).total)
        .sum()
}
