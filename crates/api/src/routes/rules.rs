//! Active rules table

use std::sync::Arc;

use axum::{extract::State, Json};
use engine::RulesTable;

use crate::state::AppState;

pub async fn get(State(state): State<Arc<AppState>>) -> Json<RulesTable> {
    Json(state.calculator.rules().clone())
}
