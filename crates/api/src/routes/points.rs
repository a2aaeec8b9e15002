//! Point calculation routes

use std::sync::Arc;

use axum::{extract::State, Json};
use engine::input::{parse_donation, parse_donations};
use engine::points::PointBreakdown;
use serde::Serialize;
use serde_json::Value;

use super::donations_field;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TotalResponse {
    pub total_points: i64,
    pub completed_donations: usize,
}

/// Breakdown for a single donation
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PointBreakdown>> {
    let donation = parse_donation(&body)?;
    Ok(Json(state.calculator.calculate_points(&donation)))
}

/// Lifetime total over a donation history
pub async fn total(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<TotalResponse>> {
    let donations = parse_donations(donations_field(&body))?;

    Ok(Json(TotalResponse {
        total_points: state.calculator.total_points(&donations),
        completed_donations: donations.iter().filter(|d| d.is_completed()).count(),
    }))
}
