use std::sync::Arc;

use api::{app, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::Config;
use engine::RulesTable;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn build_router() -> Router {
    app(Arc::new(AppState::new(Config::default(), RulesTable::default())))
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(serde_json::to_vec(&body).expect("serialize body")),
            None => Body::empty(),
        })
        .expect("request");

    let response = router.oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    };
    (status, payload)
}

fn donor(id: Uuid, name: &str, timestamps: &[&str]) -> Value {
    let donations: Vec<Value> = timestamps
        .iter()
        .map(|ts| json!({"status": "completed", "timestamp": ts}))
        .collect();
    json!({
        "profile": {"id": id, "displayName": name, "bloodType": "A+"},
        "donations": donations,
    })
}

#[tokio::test]
async fn health_reports_rules_version() {
    let (status, payload) = send(build_router(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], json!("ok"));
    assert_eq!(payload["rules_version"], json!("v1"));
}

#[tokio::test]
async fn points_returns_breakdown() {
    let body = json!({
        "status": "completed",
        "timestamp": "2026-05-01T02:00:00Z",
        "urgency": "critical",
        "distanceKm": 2,
        "bloodType": "O-",
        "responseTimeSeconds": 120,
        "isFirstDonation": true,
        "notes": "ignored"
    });
    let (status, payload) = send(build_router(), "POST", "/api/points", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["total"], json!(305));
    assert_eq!(payload["bloodRarity"], json!(40));
    assert_eq!(payload["timeOfDay"], json!(15));
}

#[tokio::test]
async fn total_rejects_null_donations() {
    let (status, payload) = send(
        build_router(),
        "POST",
        "/api/points/total",
        Some(json!({"donations": null})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], json!("invalid_argument"));
}

#[tokio::test]
async fn total_of_empty_history_is_zero() {
    let (status, payload) = send(
        build_router(),
        "POST",
        "/api/points/total",
        Some(json!({"donations": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["total_points"], json!(0));
}

#[tokio::test]
async fn badge_for_count() {
    let (status, payload) = send(build_router(), "GET", "/api/badges/7", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["badge"]["name"], json!("Silver"));
    assert_eq!(payload["next"]["next_badge"]["name"], json!("Gold"));
    assert_eq!(payload["next"]["donations_needed"], json!(3));
}

#[tokio::test]
async fn streak_counts_window() {
    let body = json!({"donations": [
        {"status": "completed", "timestamp": "2026-01-01T10:00:00Z"},
        {"status": "completed", "timestamp": "2026-04-01T10:00:00Z"},
        {"status": "pending", "timestamp": "2026-05-01T10:00:00Z"}
    ]});
    let (status, payload) = send(build_router(), "POST", "/api/streak", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["current_streak"], json!(2));
}

#[tokio::test]
async fn achievement_catalog_grouped_by_family() {
    let (status, payload) = send(build_router(), "GET", "/api/achievements", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["total"], json!(13));
    let names: Vec<_> = payload["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Milestone", "Streak", "Speed", "Distance", "Special"]);
}

#[tokio::test]
async fn evaluate_with_fixed_time() {
    let body = json!({
        "profile": {"id": Uuid::new_v4(), "bloodType": "AB-"},
        "donations": [{"status": "completed", "timestamp": "2026-05-01T12:00:00Z"}],
        "now": "2026-06-01T00:00:00Z"
    });
    let (status, payload) = send(build_router(), "POST", "/api/achievements", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = payload
        .as_array()
        .expect("list")
        .iter()
        .map(|a| a["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["first_drop", "rare_gift"]);
}

#[tokio::test]
async fn summary_rejects_bad_now() {
    let body = json!({
        "profile": {"id": Uuid::new_v4()},
        "donations": [],
        "now": 42
    });
    let (status, _) = send(build_router(), "POST", "/api/donors/summary", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_handles_donation_at_end_of_time() {
    let body = json!({
        "profile": {"id": Uuid::new_v4()},
        "donations": [{"status": "completed", "timestamp": "+262142-12-31T00:00:00Z"}],
        "now": "2026-06-01T12:00:00Z"
    });
    let (status, payload) = send(build_router(), "POST", "/api/donors/summary", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(payload.is_object());
}

#[tokio::test]
async fn leaderboard_ranks_and_limits() {
    let top = Uuid::new_v4();
    let low = Uuid::new_v4();
    let body = json!({
        "now": "2026-06-01T12:00:00Z",
        "donors": [
            donor(low, "low", &["2026-05-30T12:00:00Z"]),
            donor(top, "top", &["2026-05-30T12:00:00Z", "2026-03-01T12:00:00Z"]),
        ]
    });

    let (status, payload) = send(
        build_router(),
        "POST",
        "/api/leaderboard?period=all&limit=1",
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = payload.as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["display_name"], json!("top"));
    assert_eq!(entries[0]["points"], json!(200));

    let (status, payload) = send(
        build_router(),
        "POST",
        "/api/leaderboard?period=week",
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.as_array().expect("entries").len(), 2);

    let (status, payload) = send(
        build_router(),
        "POST",
        &format!("/api/leaderboard/rank/{}", low),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["rank"], json!(2));
}

#[tokio::test]
async fn leaderboard_rejects_unknown_period() {
    let (status, payload) = send(
        build_router(),
        "POST",
        "/api/leaderboard?period=decade",
        Some(json!({"donors": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], json!("invalid_argument"));
}

#[tokio::test]
async fn rank_of_unknown_donor_is_not_found() {
    let (status, _) = send(
        build_router(),
        "POST",
        &format!("/api/leaderboard/rank/{}", Uuid::new_v4()),
        Some(json!({"donors": []})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
