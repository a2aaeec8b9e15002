//! Rules tables: point values, badge tiers and the achievement catalogue

use std::collections::HashSet;
use std::path::Path;

use common::models::{AchievementFamily, AchievementRarity, BloodType, Urgency};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::achievements::AchievementRule;

/// Version tag of the built-in tables
pub const DEFAULT_RULES_VERSION: &str = "v1";

/// Everything the engine needs to score donors, injected rather than global
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesTable {
    pub version: String,
    /// Offset of the blood bank's local time from UTC, used for hour-of-day rules
    #[serde(default)]
    pub local_utc_offset_minutes: i32,
    pub scoring: ScoringRules,
    pub badges: BadgeTable,
    pub achievements: Vec<AchievementDef>,
}

impl Default for RulesTable {
    fn default() -> Self {
        Self {
            version: DEFAULT_RULES_VERSION.to_string(),
            local_utc_offset_minutes: 0,
            scoring: ScoringRules::default(),
            badges: BadgeTable::default(),
            achievements: default_achievements(),
        }
    }
}

impl RulesTable {
    /// Load a rules table from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> common::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| common::Error::Config(format!("{}: {}", path.display(), e)))?;
        let table: RulesTable = serde_json::from_str(&raw)
            .map_err(|e| common::Error::Config(format!("{}: {}", path.display(), e)))?;
        table.validate()?;
        info!(
            "Loaded rules table {} from {} ({} achievements)",
            table.version,
            path.display(),
            table.achievements.len()
        );
        Ok(table)
    }

    /// Check the invariants the calculators rely on
    pub fn validate(&self) -> common::Result<()> {
        self.badges.validate()?;
        self.scoring.validate()?;

        let mut seen = HashSet::new();
        for def in &self.achievements {
            if def.id.trim().is_empty() {
                return Err(common::Error::Config("achievement with empty id".into()));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(common::Error::Config(format!(
                    "duplicate achievement id {}",
                    def.id
                )));
            }
            def.rule.validate()?;
        }
        Ok(())
    }
}

/// Point values per scoring factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRules {
    pub base: i64,
    pub urgency: UrgencyPoints,
    pub distance: DistanceRules,
    pub blood_rarity: BloodRarityPoints,
    pub response_time: ResponseTimeRules,
    pub night: NightWindow,
    pub first_donation: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base: 100,
            urgency: UrgencyPoints {
                critical: 50,
                high: 30,
                medium: 15,
                low: 5,
            },
            distance: DistanceRules {
                local_max_km: 5.0,
                local_bonus: 20,
                far_min_km: 20.0,
                far_bonus: 40,
            },
            blood_rarity: BloodRarityPoints {
                a_positive: 5,
                a_negative: 20,
                b_positive: 10,
                b_negative: 25,
                ab_positive: 30,
                ab_negative: 50,
                o_positive: 5,
                o_negative: 40,
            },
            response_time: ResponseTimeRules {
                instant_max_secs: 300,
                instant_bonus: 30,
                quick_max_secs: 1800,
                quick_bonus: 20,
                normal_max_secs: 3600,
                normal_bonus: 10,
            },
            night: NightWindow {
                start_hour: 22,
                end_hour: 6,
                bonus: 15,
            },
            first_donation: 50,
        }
    }
}

impl ScoringRules {
    fn validate(&self) -> common::Result<()> {
        if self.distance.local_max_km > self.distance.far_min_km {
            return Err(common::Error::Config(
                "distance local_max_km must not exceed far_min_km".into(),
            ));
        }
        let rt = &self.response_time;
        if !(rt.instant_max_secs <= rt.quick_max_secs && rt.quick_max_secs <= rt.normal_max_secs) {
            return Err(common::Error::Config(
                "response time tiers must be ascending".into(),
            ));
        }
        if self.night.start_hour > 23 || self.night.end_hour > 23 {
            return Err(common::Error::Config("night window hours must be 0-23".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyPoints {
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

impl UrgencyPoints {
    pub fn points_for(&self, urgency: Option<Urgency>) -> i64 {
        match urgency {
            Some(Urgency::Critical) => self.critical,
            Some(Urgency::High) => self.high,
            Some(Urgency::Medium) => self.medium,
            Some(Urgency::Low) => self.low,
            Some(Urgency::Unknown) | None => 0,
        }
    }
}

/// Local and far distance bonuses. Distances strictly between the two
/// thresholds earn nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRules {
    pub local_max_km: f64,
    pub local_bonus: i64,
    pub far_min_km: f64,
    pub far_bonus: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRarityPoints {
    pub a_positive: i64,
    pub a_negative: i64,
    pub b_positive: i64,
    pub b_negative: i64,
    pub ab_positive: i64,
    pub ab_negative: i64,
    pub o_positive: i64,
    pub o_negative: i64,
}

impl BloodRarityPoints {
    pub fn points_for(&self, blood_type: Option<BloodType>) -> i64 {
        match blood_type {
            Some(BloodType::APositive) => self.a_positive,
            Some(BloodType::ANegative) => self.a_negative,
            Some(BloodType::BPositive) => self.b_positive,
            Some(BloodType::BNegative) => self.b_negative,
            Some(BloodType::AbPositive) => self.ab_positive,
            Some(BloodType::AbNegative) => self.ab_negative,
            Some(BloodType::OPositive) => self.o_positive,
            Some(BloodType::ONegative) => self.o_negative,
            Some(BloodType::Unknown) | None => 0,
        }
    }
}

/// Ascending response tiers, all ceilings inclusive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTimeRules {
    pub instant_max_secs: u64,
    pub instant_bonus: i64,
    pub quick_max_secs: u64,
    pub quick_bonus: i64,
    pub normal_max_secs: u64,
    pub normal_bonus: i64,
}

impl ResponseTimeRules {
    pub fn points_for(&self, response_secs: Option<u64>) -> i64 {
        match response_secs {
            Some(s) if s <= self.instant_max_secs => self.instant_bonus,
            Some(s) if s <= self.quick_max_secs => self.quick_bonus,
            Some(s) if s <= self.normal_max_secs => self.normal_bonus,
            _ => 0,
        }
    }
}

/// Overnight window that wraps past midnight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NightWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    #[serde(default)]
    pub bonus: i64,
}

impl NightWindow {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour || hour < self.end_hour
    }
}

/// A named badge level over completed-donation counts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeTier {
    pub name: String,
    pub emoji: String,
    pub min_donations: u32,
    /// Inclusive upper bound; `None` only for the open-ended top tier
    pub max_donations: Option<u32>,
}

impl BadgeTier {
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min_donations && self.max_donations.map_or(true, |max| count <= max)
    }
}

/// Ordered badge tiers partitioning the non-negative integers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<BadgeTier>", into = "Vec<BadgeTier>")]
pub struct BadgeTable {
    tiers: Vec<BadgeTier>,
}

impl BadgeTable {
    pub fn new(tiers: Vec<BadgeTier>) -> common::Result<Self> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    pub fn tiers(&self) -> &[BadgeTier] {
        &self.tiers
    }

    fn validate(&self) -> common::Result<()> {
        let first = self
            .tiers
            .first()
            .ok_or_else(|| common::Error::Config("badge table is empty".into()))?;
        if first.min_donations != 0 {
            return Err(common::Error::Config(format!(
                "first badge tier {} must start at 0",
                first.name
            )));
        }

        let last_idx = self.tiers.len() - 1;
        for (idx, tier) in self.tiers.iter().enumerate() {
            if tier.name.trim().is_empty() {
                return Err(common::Error::Config("badge tier with empty name".into()));
            }
            match tier.max_donations {
                Some(max) if max < tier.min_donations => {
                    return Err(common::Error::Config(format!(
                        "badge tier {} has max below min",
                        tier.name
                    )));
                }
                None if idx != last_idx => {
                    return Err(common::Error::Config(format!(
                        "only the last badge tier may be open-ended, not {}",
                        tier.name
                    )));
                }
                _ => {}
            }
            if let Some(next) = self.tiers.get(idx + 1) {
                let expected = tier.max_donations.and_then(|max| max.checked_add(1));
                if expected != Some(next.min_donations) {
                    return Err(common::Error::Config(format!(
                        "badge tier {} must start right after {}",
                        next.name, tier.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<BadgeTier>> for BadgeTable {
    type Error = common::Error;

    fn try_from(tiers: Vec<BadgeTier>) -> Result<Self, Self::Error> {
        BadgeTable::new(tiers)
    }
}

impl From<BadgeTable> for Vec<BadgeTier> {
    fn from(table: BadgeTable) -> Self {
        table.tiers
    }
}

impl Default for BadgeTable {
    fn default() -> Self {
        let tier = |name: &str, emoji: &str, min, max| BadgeTier {
            name: name.to_string(),
            emoji: emoji.to_string(),
            min_donations: min,
            max_donations: max,
        };
        Self {
            tiers: vec![
                tier("New Hero", "🌱", 0, Some(0)),
                tier("Bronze", "🥉", 1, Some(4)),
                tier("Silver", "🥈", 5, Some(9)),
                tier("Gold", "🥇", 10, Some(24)),
                tier("Platinum", "💎", 25, None),
            ],
        }
    }
}

/// A catalogue entry: what the achievement is and how it unlocks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub rarity: AchievementRarity,
    pub points: i64,
    pub rule: AchievementRule,
}

impl AchievementDef {
    pub fn family(&self) -> AchievementFamily {
        self.rule.family()
    }
}

/// Achievement ids of the built-in catalogue
pub mod defs {
    // Milestones
    pub const FIRST_DROP: &str = "first_drop";
    pub const REGULAR_DONOR: &str = "regular_donor";
    pub const LIFESAVER: &str = "lifesaver";
    pub const BLOOD_LEGEND: &str = "blood_legend";

    // Streaks
    pub const WEEKLY_WARRIOR: &str = "weekly_warrior";
    pub const MONTHLY_HERO: &str = "monthly_hero";

    // Speed
    pub const RAPID_RESPONDER: &str = "rapid_responder";
    pub const LIGHTNING_RESPONSE: &str = "lightning_response";

    // Distance
    pub const LOCAL_HERO: &str = "local_hero";
    pub const ROAD_WARRIOR: &str = "road_warrior";

    // Special
    pub const RARE_GIFT: &str = "rare_gift";
    pub const NIGHT_OWL: &str = "night_owl";
    pub const CRISIS_RESPONDER: &str = "crisis_responder";
}

fn default_achievements() -> Vec<AchievementDef> {
    use AchievementRarity::*;

    let def = |id: &str, title: &str, description: &str, emoji: &str, rarity, points, rule| {
        AchievementDef {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            emoji: emoji.to_string(),
            rarity,
            points,
            rule,
        }
    };

    vec![
        def(
            defs::FIRST_DROP,
            "First Drop",
            "Complete your first donation",
            "🩸",
            Common,
            50,
            AchievementRule::Milestone { count: 1 },
        ),
        def(
            defs::REGULAR_DONOR,
            "Regular Donor",
            "Complete 5 donations",
            "🎖️",
            Uncommon,
            100,
            AchievementRule::Milestone { count: 5 },
        ),
        def(
            defs::LIFESAVER,
            "Lifesaver",
            "Complete 10 donations",
            "🦸",
            Rare,
            200,
            AchievementRule::Milestone { count: 10 },
        ),
        def(
            defs::BLOOD_LEGEND,
            "Blood Legend",
            "Complete 25 donations",
            "👑",
            Legendary,
            500,
            AchievementRule::Milestone { count: 25 },
        ),
        def(
            defs::WEEKLY_WARRIOR,
            "Weekly Warrior",
            "Donate twice within 7 days",
            "⚡",
            Rare,
            100,
            AchievementRule::PeriodStreak {
                window_days: 7,
                count: 2,
            },
        ),
        def(
            defs::MONTHLY_HERO,
            "Monthly Hero",
            "Donate 3 times within 30 days",
            "📅",
            Epic,
            150,
            AchievementRule::PeriodStreak {
                window_days: 30,
                count: 3,
            },
        ),
        def(
            defs::RAPID_RESPONDER,
            "Rapid Responder",
            "Commit to an emergency request within 5 minutes",
            "🚑",
            Uncommon,
            75,
            AchievementRule::Speed {
                max_response_secs: 300,
            },
        ),
        def(
            defs::LIGHTNING_RESPONSE,
            "Lightning Response",
            "Commit to an emergency request within 1 minute",
            "🌩️",
            Epic,
            150,
            AchievementRule::Speed {
                max_response_secs: 60,
            },
        ),
        def(
            defs::LOCAL_HERO,
            "Local Hero",
            "Donate within 5 km of home",
            "🏠",
            Common,
            50,
            AchievementRule::LocalHero { max_km: 5.0 },
        ),
        def(
            defs::ROAD_WARRIOR,
            "Road Warrior",
            "Travel 50 km or more to donate",
            "🚗",
            Rare,
            100,
            AchievementRule::LongDistance { min_km: 50.0 },
        ),
        def(
            defs::RARE_GIFT,
            "Rare Gift",
            "Donate with a rare blood type",
            "💎",
            Rare,
            100,
            AchievementRule::RareBloodType {
                types: vec![
                    BloodType::AbNegative,
                    BloodType::AbPositive,
                    BloodType::ONegative,
                ],
            },
        ),
        def(
            defs::NIGHT_OWL,
            "Night Owl",
            "Donate overnight",
            "🦉",
            Uncommon,
            75,
            AchievementRule::Overnight {
                start_hour: 22,
                end_hour: 6,
            },
        ),
        def(
            defs::CRISIS_RESPONDER,
            "Crisis Responder",
            "Answer 3 critical requests",
            "🆘",
            Epic,
            200,
            AchievementRule::CriticalCount { count: 3 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, min: u32, max: Option<u32>) -> BadgeTier {
        BadgeTier {
            name: name.to_string(),
            emoji: String::new(),
            min_donations: min,
            max_donations: max,
        }
    }

    #[test]
    fn test_default_table_is_valid() {
        assert!(RulesTable::default().validate().is_ok());
    }

    #[test]
    fn test_badge_table_rejects_gap() {
        let result = BadgeTable::new(vec![tier("a", 0, Some(0)), tier("b", 2, None)]);
        assert!(matches!(result, Err(common::Error::Config(_))));
    }

    #[test]
    fn test_badge_table_rejects_overlap() {
        let result = BadgeTable::new(vec![tier("a", 0, Some(3)), tier("b", 3, None)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_badge_table_rejects_nonzero_start() {
        assert!(BadgeTable::new(vec![tier("a", 1, None)]).is_err());
    }

    #[test]
    fn test_badge_table_rejects_open_middle_tier() {
        let result = BadgeTable::new(vec![tier("a", 0, None), tier("b", 1, None)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_badge_table_rejects_empty() {
        assert!(BadgeTable::new(vec![]).is_err());
    }

    #[test]
    fn test_badge_table_deserialization_validates() {
        let json = r#"[{"name":"a","emoji":"","min_donations":0,"max_donations":0},
                       {"name":"b","emoji":"","min_donations":5,"max_donations":null}]"#;
        assert!(serde_json::from_str::<BadgeTable>(json).is_err());
    }

    #[test]
    fn test_duplicate_achievement_ids_rejected() {
        let mut table = RulesTable::default();
        let dup = table.achievements[0].clone();
        table.achievements.push(dup);
        assert!(table.validate().is_err());
    }

    fn with_rule(rule: AchievementRule) -> RulesTable {
        let mut table = RulesTable::default();
        table.achievements[0].rule = rule;
        table
    }

    #[test]
    fn test_streak_window_must_be_positive() {
        for window_days in [0, -7] {
            let table = with_rule(AchievementRule::PeriodStreak {
                window_days,
                count: 2,
            });
            assert!(matches!(table.validate(), Err(common::Error::Config(_))));
        }
    }

    #[test]
    fn test_streak_window_rejects_huge_values() {
        let table = with_rule(AchievementRule::PeriodStreak {
            window_days: i64::MAX,
            count: 2,
        });
        assert!(table.validate().is_err());

        let table = with_rule(AchievementRule::PeriodStreak {
            window_days: crate::achievements::MAX_STREAK_WINDOW_DAYS,
            count: 2,
        });
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_overnight_hours_must_be_on_the_clock() {
        let table = with_rule(AchievementRule::Overnight {
            start_hour: 24,
            end_hour: 6,
        });
        assert!(table.validate().is_err());

        let table = with_rule(AchievementRule::Overnight {
            start_hour: 22,
            end_hour: 30,
        });
        assert!(table.validate().is_err());

        let table = with_rule(AchievementRule::Overnight {
            start_hour: 23,
            end_hour: 0,
        });
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_rules_table_json_roundtrip_keeps_version() {
        let json = serde_json::to_string(&RulesTable::default()).unwrap();
        let parsed: RulesTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, DEFAULT_RULES_VERSION);
        assert_eq!(parsed.achievements.len(), RulesTable::default().achievements.len());
        assert_eq!(parsed.badges, BadgeTable::default());
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let night = ScoringRules::default().night;
        assert!(night.contains(22));
        assert!(night.contains(23));
        assert!(night.contains(0));
        assert!(night.contains(5));
        assert!(!night.contains(6));
        assert!(!night.contains(21));
    }

    #[test]
    fn test_missing_rules_file_is_config_error() {
        let result = RulesTable::from_json_file(Path::new("/nonexistent/rules.json"));
        assert!(matches!(result, Err(common::Error::Config(_))));
    }
}
