//! Leaderboard routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::models::{BloodType, LeaderboardEntry};
use engine::input::parse_donors;
use engine::leaderboard::{LeaderboardQuery, Period};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::evaluation_time;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Time period: "week", "month", "all"
    #[serde(default = "default_period")]
    period: String,
    /// Restrict to donors of one blood type, e.g. "O-"
    #[serde(default)]
    blood_type: Option<String>,
    /// Limit
    #[serde(default)]
    limit: Option<usize>,
}

fn default_period() -> String {
    "all".to_string()
}

#[derive(Serialize)]
pub struct RankResponse {
    pub donor_id: Uuid,
    pub rank: u32,
}

fn build_query(
    state: &AppState,
    params: &LeaderboardParams,
    body: &Value,
) -> ApiResult<LeaderboardQuery> {
    let period = Period::parse(&params.period)
        .ok_or_else(|| ApiError::InvalidArgument(format!("unknown period {}", params.period)))?;
    let blood_type = match &params.blood_type {
        Some(raw) => Some(
            BloodType::parse(raw)
                .ok_or_else(|| ApiError::InvalidArgument(format!("unknown blood type {}", raw)))?,
        ),
        None => None,
    };
    let cap = state.config.leaderboard_limit;

    Ok(LeaderboardQuery {
        period,
        blood_type,
        limit: params.limit.unwrap_or(cap).min(cap).max(1),
        now: evaluation_time(body)?,
    })
}

pub async fn rank(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let query = build_query(&state, &params, &body)?;
    let donors = parse_donors(body.get("donors").unwrap_or(&Value::Null))?;

    Ok(Json(state.calculator.rank(&donors, &query)))
}

pub async fn rank_of(
    State(state): State<Arc<AppState>>,
    Path(donor_id): Path<Uuid>,
    Query(params): Query<LeaderboardParams>,
    Json(body): Json<Value>,
) -> ApiResult<Json<RankResponse>> {
    let query = build_query(&state, &params, &body)?;
    let donors = parse_donors(body.get("donors").unwrap_or(&Value::Null))?;

    let rank = state.calculator.rank_of(&donors, &query, donor_id)?;

    Ok(Json(RankResponse { donor_id, rank }))
}
