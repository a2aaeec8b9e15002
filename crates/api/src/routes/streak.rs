//! Streak routes

use std::sync::Arc;

use axum::{extract::State, Json};
use engine::input::parse_donations;
use engine::streaks;
use serde::Serialize;
use serde_json::Value;

use super::donations_field;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub eligibility_window_days: i64,
}

pub async fn compute(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<StreakResponse>> {
    let donations = parse_donations(donations_field(&body))?;

    Ok(Json(StreakResponse {
        current_streak: state.calculator.compute_streak(&donations),
        longest_streak: streaks::longest_streak(&donations),
        eligibility_window_days: streaks::ELIGIBILITY_WINDOW_DAYS,
    }))
}
