//! Achievement rules and evaluation

use chrono::{DateTime, Duration, Utc};
use common::models::{
    AchievementFamily, BloodType, DonationRecord, DonorProfile, UnlockedAchievement, Urgency,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rules::{AchievementDef, NightWindow, RulesTable};

/// Longest trailing window a period streak rule may ask for
pub const MAX_STREAK_WINDOW_DAYS: i64 = 36_500;

/// How an achievement unlocks. Each rule belongs to exactly one family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementRule {
    /// At least `count` completed donations
    Milestone { count: u32 },
    /// At least `count` completed donations in the trailing `window_days`
    PeriodStreak { window_days: i64, count: u32 },
    /// Any completed donation committed within `max_response_secs`
    Speed { max_response_secs: u64 },
    /// Any completed donation at or below `max_km`
    LocalHero { max_km: f64 },
    /// Any completed donation at or beyond `min_km`
    LongDistance { min_km: f64 },
    /// The donor's own blood type is one of `types`
    RareBloodType { types: Vec<BloodType> },
    /// Any completed donation inside the wrap-around night window
    Overnight { start_hour: u32, end_hour: u32 },
    /// At least `count` completed donations answering critical requests
    CriticalCount { count: u32 },
}

impl AchievementRule {
    pub fn family(&self) -> AchievementFamily {
        match self {
            AchievementRule::Milestone { .. } => AchievementFamily::Milestone,
            AchievementRule::PeriodStreak { .. } => AchievementFamily::Streak,
            AchievementRule::Speed { .. } => AchievementFamily::Speed,
            AchievementRule::LocalHero { .. } | AchievementRule::LongDistance { .. } => {
                AchievementFamily::Distance
            }
            AchievementRule::RareBloodType { .. }
            | AchievementRule::Overnight { .. }
            | AchievementRule::CriticalCount { .. } => AchievementFamily::Special,
        }
    }

    /// Reject parameters no donation history could be checked against
    pub fn validate(&self) -> common::Result<()> {
        match self {
            AchievementRule::PeriodStreak { window_days, .. }
                if !(1..=MAX_STREAK_WINDOW_DAYS).contains(window_days) =>
            {
                Err(common::Error::Config(format!(
                    "streak window must be 1-{} days, got {}",
                    MAX_STREAK_WINDOW_DAYS, window_days
                )))
            }
            AchievementRule::Overnight {
                start_hour,
                end_hour,
            } if *start_hour > 23 || *end_hour > 23 => Err(common::Error::Config(format!(
                "overnight hours must be 0-23, got {}-{}",
                start_hour, end_hour
            ))),
            _ => Ok(()),
        }
    }

    /// When the rule is satisfied, the instant of the donation that satisfied it
    pub fn check(&self, ctx: &RuleContext<'_>) -> Option<DateTime<Utc>> {
        match self {
            AchievementRule::Milestone { count } => ctx.nth_completed(*count),
            AchievementRule::PeriodStreak { window_days, count } => {
                // A start before the smallest instant leaves the window open
                let since = Duration::try_days(*window_days)
                    .and_then(|window| ctx.now.checked_sub_signed(window));
                ctx.completed
                    .iter()
                    .filter(|d| since.map_or(true, |since| d.timestamp >= since))
                    .filter(|d| d.timestamp <= ctx.now)
                    .nth(threshold_index(*count))
                    .map(|d| d.timestamp)
            }
            AchievementRule::Speed { max_response_secs } => ctx.first_where(|d| {
                d.response_time_seconds
                    .map_or(false, |secs| secs <= *max_response_secs)
            }),
            AchievementRule::LocalHero { max_km } => {
                ctx.first_where(|d| d.distance().map_or(false, |km| km <= *max_km))
            }
            AchievementRule::LongDistance { min_km } => {
                ctx.first_where(|d| d.distance().map_or(false, |km| km >= *min_km))
            }
            AchievementRule::RareBloodType { types } => {
                let own = ctx.profile.blood_type?;
                if types.contains(&own) {
                    ctx.nth_completed(1)
                } else {
                    None
                }
            }
            AchievementRule::Overnight {
                start_hour,
                end_hour,
            } => {
                let window = NightWindow {
                    start_hour: *start_hour,
                    end_hour: *end_hour,
                    bonus: 0,
                };
                ctx.first_where(|d| {
                    d.local_hour(ctx.local_utc_offset_minutes)
                        .map_or(false, |hour| window.contains(hour))
                })
            }
            AchievementRule::CriticalCount { count } => ctx
                .completed
                .iter()
                .filter(|d| d.urgency == Some(Urgency::Critical))
                .nth(threshold_index(*count))
                .map(|d| d.timestamp),
        }
    }
}

/// Index of the donation that reaches a count threshold; a threshold of
/// zero still needs one donation.
fn threshold_index(count: u32) -> usize {
    count.max(1) as usize - 1
}

/// Shared input of every rule: the donor and their completed donations,
/// oldest first.
pub struct RuleContext<'a> {
    pub profile: &'a DonorProfile,
    pub completed: Vec<&'a DonationRecord>,
    pub now: DateTime<Utc>,
    pub local_utc_offset_minutes: i32,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        rules: &RulesTable,
        profile: &'a DonorProfile,
        donations: &'a [DonationRecord],
        now: DateTime<Utc>,
    ) -> Self {
        let mut completed: Vec<_> = donations.iter().filter(|d| d.is_completed()).collect();
        completed.sort_by_key(|d| d.timestamp);
        Self {
            profile,
            completed,
            now,
            local_utc_offset_minutes: rules.local_utc_offset_minutes,
        }
    }

    fn nth_completed(&self, count: u32) -> Option<DateTime<Utc>> {
        self.completed
            .get(threshold_index(count))
            .map(|d| d.timestamp)
    }

    fn first_where(&self, pred: impl Fn(&DonationRecord) -> bool) -> Option<DateTime<Utc>> {
        self.completed
            .iter()
            .find(|d| pred(**d))
            .map(|d| d.timestamp)
    }
}

/// Evaluate the whole catalogue against a donor's history.
///
/// The result follows catalogue order. Unlock instants come from the
/// triggering donation, so the same history and `now` always give the
/// same result.
pub fn evaluate(
    rules: &RulesTable,
    profile: &DonorProfile,
    donations: &[DonationRecord],
    now: DateTime<Utc>,
) -> Vec<UnlockedAchievement> {
    let ctx = RuleContext::new(rules, profile, donations, now);

    let unlocked: Vec<_> = rules
        .achievements
        .iter()
        .filter_map(|def| def.rule.check(&ctx).map(|at| unlock(def, at)))
        .collect();

    debug!(
        "Evaluated {} achievements for donor {}: {} unlocked",
        rules.achievements.len(),
        profile.id,
        unlocked.len()
    );
    unlocked
}

fn unlock(def: &AchievementDef, unlocked_at: DateTime<Utc>) -> UnlockedAchievement {
    UnlockedAchievement {
        id: def.id.clone(),
        title: def.title.clone(),
        emoji: def.emoji.clone(),
        family: def.family(),
        rarity: def.rarity,
        points: def.points,
        unlocked_at,
    }
}
