//! Tests using donation snapshots in the shape the record store hands over
//!
//! These verify lenient decoding of real-world records and the derived
//! donor summary built from them.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::input::{parse_donations, parse_donor_history, parse_donors};
use crate::rules::{defs, RulesTable};
use crate::summary::summarize;
use common::models::{BloodType, DonationStatus, DonorProfile, Urgency};

/// History of a long-time O- donor, newest first as the store returns it
const DONOR_HISTORY: &str = r#"[
    {
        "id": "don_9",
        "status": "upcoming",
        "timestamp": "2026-07-20T09:00:00Z",
        "hospital": "City General"
    },
    {
        "status": "completed",
        "timestamp": "2026-05-28T02:15:00Z",
        "urgency": "critical",
        "distanceKm": 2.4,
        "bloodType": "O-",
        "responseTimeSeconds": 95
    },
    {
        "status": "completed",
        "timestamp": "2026-03-10T14:00:00Z",
        "urgency": "high",
        "distanceKm": 12,
        "bloodType": "O-"
    },
    {
        "status": "cancelled",
        "timestamp": "2026-02-01T10:00:00Z",
        "urgency": "critical"
    },
    {
        "status": "completed",
        "timestamp": "2025-12-20T11:00:00Z",
        "urgency": "emergency",
        "distanceKm": 64.0,
        "bloodType": "O-",
        "isFirstDonation": true
    }
]"#;

fn load() -> Value {
    serde_json::from_str(DONOR_HISTORY).expect("Invalid JSON")
}

#[test]
fn test_fixture_decodes_with_extra_fields() {
    let donations = parse_donations(&load()).unwrap();

    assert_eq!(donations.len(), 5);
    assert_eq!(donations[0].status, DonationStatus::Upcoming);
    assert_eq!(donations[1].urgency, Some(Urgency::Critical));
    assert_eq!(donations[1].blood_type, Some(BloodType::ONegative));
    assert_eq!(donations[2].distance_km, Some(12.0));
    assert_eq!(donations[2].response_time_seconds, None);
    assert_eq!(donations[4].urgency, Some(Urgency::Unknown));
    assert_eq!(donations[4].is_first_donation, Some(true));
}

#[test]
fn test_null_donations_rejected() {
    let err = parse_donations(&Value::Null).unwrap_err();
    assert!(matches!(err, common::Error::InvalidArgument(_)));
}

#[test]
fn test_object_donations_rejected() {
    let err = parse_donations(&json!({"status": "completed"})).unwrap_err();
    assert!(err.to_string().contains("object"));
}

#[test]
fn test_record_without_timestamp_rejected_with_index() {
    let value = json!([
        {"status": "completed", "timestamp": "2026-01-01T00:00:00Z"},
        {"status": "completed"}
    ]);
    let err = parse_donations(&value).unwrap_err();
    assert!(err.to_string().contains("donations[1]"));
}

#[test]
fn test_unknown_status_never_counts() {
    let value = json!([{"status": "archived", "timestamp": "2026-01-01T00:00:00Z"}]);
    let donations = parse_donations(&value).unwrap();
    assert_eq!(donations[0].status, DonationStatus::Unknown);
    assert!(!donations[0].is_completed());
}

#[test]
fn test_donor_history_requires_donations_array() {
    let value = json!({"profile": {"id": Uuid::new_v4()}, "donations": null});
    assert!(parse_donor_history(&value).is_err());

    let value = json!({"profile": {"id": Uuid::new_v4(), "bloodType": "AB+"}, "donations": []});
    let history = parse_donor_history(&value).unwrap();
    assert_eq!(history.profile.blood_type, Some(BloodType::AbPositive));
    assert_eq!(history.profile.display_name, "");
}

#[test]
fn test_donors_error_names_donor_index() {
    let value = json!([
        {"profile": {"id": Uuid::new_v4()}, "donations": []},
        {"profile": {"id": Uuid::new_v4()}, "donations": "none"}
    ]);
    let err = parse_donors(&value).unwrap_err();
    assert!(err.to_string().contains("donors[1]"));
}

#[test]
fn test_summary_from_fixture() {
    let rules = RulesTable::default();
    let profile = DonorProfile {
        id: Uuid::new_v4(),
        display_name: "Nadia".to_string(),
        blood_type: Some(BloodType::ONegative),
    };
    let donations = parse_donations(&load()).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();

    let summary = summarize(&rules, &profile, &donations, now);

    // 2026-05-28: 100 + 50 + 20 + 40 + 30 + 15 = 255
    // 2026-03-10: 100 + 30 + 0 + 40 = 170
    // 2025-12-20: 100 + 0 + 40 + 40 + 50 = 230
    assert_eq!(summary.total_points, 655);
    assert_eq!(summary.completed_donations, 3);
    assert_eq!(summary.scheduled_donations, 1);
    assert_eq!(summary.badge.name, "Bronze");
    assert_eq!(summary.next.donations_needed, 2);
    assert_eq!(summary.current_streak, 3);
    assert_eq!(summary.longest_streak, 3);
    assert_eq!(
        summary.last_donation_at,
        Some(Utc.with_ymd_and_hms(2026, 5, 28, 2, 15, 0).unwrap())
    );
    assert_eq!(
        summary.next_eligible_at,
        Some(Utc.with_ymd_and_hms(2026, 8, 26, 2, 15, 0).unwrap())
    );

    let ids: Vec<_> = summary.achievements.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            defs::FIRST_DROP,
            defs::RAPID_RESPONDER,
            defs::LOCAL_HERO,
            defs::ROAD_WARRIOR,
            defs::RARE_GIFT,
            defs::NIGHT_OWL,
        ]
    );
    assert_eq!(summary.achievement_points, 50 + 75 + 50 + 100 + 100 + 75);
}

#[test]
fn test_summary_for_new_donor() {
    let rules = RulesTable::default();
    let profile = DonorProfile {
        id: Uuid::new_v4(),
        display_name: String::new(),
        blood_type: None,
    };
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();

    let summary = summarize(&rules, &profile, &[], now);

    assert_eq!(summary.badge.name, "New Hero");
    assert_eq!(summary.current_streak, 0);
    assert!(summary.achievements.is_empty());
    assert_eq!(summary.total_points, 0);
    assert_eq!(summary.last_donation_at, None);
}

#[test]
fn test_summary_for_donation_at_end_of_time() {
    let rules = RulesTable::default();
    let latest = DateTime::<Utc>::MAX_UTC - Duration::days(1);
    let raw = json!([{
        "status": "completed",
        "timestamp": latest.to_rfc3339_opts(SecondsFormat::Secs, true),
        "urgency": "low"
    }]);

    let donations = parse_donations(&raw).unwrap();
    let profile = DonorProfile {
        id: Uuid::new_v4(),
        display_name: "Far Future".to_string(),
        blood_type: None,
    };
    let summary = summarize(&rules, &profile, &donations, latest);

    assert_eq!(summary.completed_donations, 1);
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.next_eligible_at, None);
    assert!(summary.last_donation_at.is_some());
}
