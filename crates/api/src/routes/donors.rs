//! Donor summary routes

use std::sync::Arc;

use axum::{extract::State, Json};
use engine::input::parse_donor_history;
use engine::summary::DonorSummary;
use serde_json::Value;
use tracing::info;

use super::evaluation_time;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DonorSummary>> {
    let history = parse_donor_history(&body)?;
    let now = evaluation_time(&body)?;

    let summary = state
        .calculator
        .summarize(&history.profile, &history.donations, now);
    info!(
        "Summary for donor {}: {} points, {} achievements",
        summary.donor_id,
        summary.total_points,
        summary.achievements.len()
    );

    Ok(Json(summary))
}
