//! Domain models

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a donation event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Completed,
    Pending,
    Upcoming,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Urgency of the request a donation answered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

/// ABO/Rh blood type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(other)]
    Unknown,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::Unknown => "unknown",
        }
    }

    /// Parse the conventional notation (`"AB-"`, `"o+"`). Query strings
    /// usually carry `+` as a space, so a trailing space reads as positive.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim_start().to_ascii_uppercase();
        let normalized = match normalized.strip_suffix(' ') {
            Some(rest) => format!("{}+", rest.trim_end()),
            None => normalized.trim_end().to_string(),
        };
        Self::ALL.into_iter().find(|b| b.as_str() == normalized)
    }
}

/// One donation event as handed over by the donation-tracking store.
///
/// Optional attributes may be missing on older records; every consumer
/// treats a missing value as "contributes nothing".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub status: DonationStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub response_time_seconds: Option<u64>,
    #[serde(default)]
    pub is_first_donation: Option<bool>,
}

impl DonationRecord {
    /// A bare record with only the required attributes set
    pub fn new(status: DonationStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            status,
            timestamp,
            urgency: None,
            distance_km: None,
            blood_type: None,
            response_time_seconds: None,
            is_first_donation: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == DonationStatus::Completed
    }

    /// Distance in km, ignoring negative and non-finite values
    pub fn distance(&self) -> Option<f64> {
        self.distance_km.filter(|d| d.is_finite() && *d >= 0.0)
    }

    /// Hour of day (0-23) at the given offset from UTC, or `None` when the
    /// shifted instant is out of range
    pub fn local_hour(&self, utc_offset_minutes: i32) -> Option<u32> {
        self.timestamp
            .checked_add_signed(Duration::minutes(utc_offset_minutes as i64))
            .map(|local| local.hour())
    }
}

/// The donor attributes that matter for scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
}

/// Achievement rarity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Rule family an achievement belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AchievementFamily {
    Milestone,
    Streak,
    Speed,
    Distance,
    Special,
}

impl AchievementFamily {
    pub const ALL: [AchievementFamily; 5] = [
        AchievementFamily::Milestone,
        AchievementFamily::Streak,
        AchievementFamily::Speed,
        AchievementFamily::Distance,
        AchievementFamily::Special,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AchievementFamily::Milestone => "Milestone",
            AchievementFamily::Streak => "Streak",
            AchievementFamily::Speed => "Speed",
            AchievementFamily::Distance => "Distance",
            AchievementFamily::Special => "Special",
        }
    }
}

/// An achievement a donor has unlocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockedAchievement {
    pub id: String,
    pub title: String,
    pub emoji: String,
    pub family: AchievementFamily,
    pub rarity: AchievementRarity,
    pub points: i64,
    pub unlocked_at: DateTime<Utc>,
}

/// Leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub donor_id: Uuid,
    pub display_name: String,
    pub blood_type: Option<BloodType>,
    pub points: i64,
    pub completed_donations: u32,
    pub last_donation_at: Option<DateTime<Utc>>,
}
