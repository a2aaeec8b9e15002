//! Donation streaks under the eligibility window rule

use chrono::{DateTime, Duration, Utc};
use common::models::DonationRecord;

/// Maximum gap between two donations that still continues a streak
pub const ELIGIBILITY_WINDOW_DAYS: i64 = 90;

fn eligibility_window() -> Duration {
    Duration::days(ELIGIBILITY_WINDOW_DAYS)
}

/// Completed donation timestamps, oldest first
pub(crate) fn completed_timestamps(donations: &[DonationRecord]) -> Vec<DateTime<Utc>> {
    let mut timestamps: Vec<_> = donations
        .iter()
        .filter(|d| d.is_completed())
        .map(|d| d.timestamp)
        .collect();
    timestamps.sort();
    timestamps
}

/// Number of consecutive completed donations, counting back from the most
/// recent one, where no gap exceeds the eligibility window.
pub fn compute_streak(donations: &[DonationRecord]) -> u32 {
    let timestamps = completed_timestamps(donations);
    if timestamps.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in timestamps.windows(2).rev() {
        if pair[1] - pair[0] > eligibility_window() {
            break;
        }
        streak += 1;
    }
    streak
}

/// Longest run anywhere in the history under the same window rule
pub fn longest_streak(donations: &[DonationRecord]) -> u32 {
    let timestamps = completed_timestamps(donations);
    if timestamps.is_empty() {
        return 0;
    }

    let mut best = 1;
    let mut run = 1;
    for pair in timestamps.windows(2) {
        if pair[1] - pair[0] > eligibility_window() {
            run = 1;
        } else {
            run += 1;
            best = best.max(run);
        }
    }
    best
}

/// Earliest date the donor may give again.
///
/// `None` without a completed donation, or when that date is past the
/// largest representable instant.
pub fn next_eligible_at(donations: &[DonationRecord]) -> Option<DateTime<Utc>> {
    completed_timestamps(donations)
        .last()
        .and_then(|last| last.checked_add_signed(eligibility_window()))
}
