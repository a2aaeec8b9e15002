//! Badge tier resolution

use serde::{Deserialize, Serialize};

use crate::rules::{BadgeTable, BadgeTier};

/// Progress from the current tier toward the next one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NextBadge {
    pub next_badge: Option<BadgeTier>,
    pub progress_percent: f64,
    pub donations_needed: u32,
}

/// The tier whose range contains `completed_count`.
///
/// Counts past every bounded range fall into the last tier.
pub fn resolve_badge(table: &BadgeTable, completed_count: u32) -> &BadgeTier {
    let tiers = table.tiers();
    tiers
        .iter()
        .find(|t| t.contains(completed_count))
        .unwrap_or(&tiers[tiers.len() - 1])
}

/// The tier after the current one, with linear progress toward it
pub fn resolve_next_badge(table: &BadgeTable, completed_count: u32) -> NextBadge {
    let tiers = table.tiers();
    let current_idx = tiers
        .iter()
        .position(|t| t.contains(completed_count))
        .unwrap_or(tiers.len() - 1);

    let Some(next) = tiers.get(current_idx + 1) else {
        return NextBadge {
            next_badge: None,
            progress_percent: 100.0,
            donations_needed: 0,
        };
    };

    let current_min = tiers[current_idx].min_donations;
    let span = next.min_donations.saturating_sub(current_min).max(1);
    let done = completed_count.saturating_sub(current_min);
    let progress = (done as f64 / span as f64 * 100.0).clamp(0.0, 100.0);

    NextBadge {
        next_badge: Some(next.clone()),
        progress_percent: progress,
        donations_needed: next.min_donations.saturating_sub(completed_count),
    }
}
