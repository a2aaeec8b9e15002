//! Badge routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use engine::badges::NextBadge;
use engine::rules::BadgeTier;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct BadgeResponse {
    pub completed_donations: u32,
    pub badge: BadgeTier,
    pub next: NextBadge,
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(count): Path<u32>,
) -> Json<BadgeResponse> {
    Json(BadgeResponse {
        completed_donations: count,
        badge: state.calculator.resolve_badge(count).clone(),
        next: state.calculator.resolve_next_badge(count),
    })
}
