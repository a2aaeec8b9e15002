//! Achievement routes

use std::sync::Arc;

use axum::{extract::State, Json};
use common::models::{AchievementFamily, UnlockedAchievement};
use engine::input::parse_donor_history;
use engine::rules::AchievementDef;
use serde::Serialize;
use serde_json::Value;

use super::evaluation_time;
use crate::error::ApiResult;
use crate::state::AppState;

/// Grouped achievements for the catalog
#[derive(Serialize)]
pub struct AchievementCatalog {
    pub total: usize,
    pub categories: Vec<CategoryGroup>,
}

#[derive(Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub family: AchievementFamily,
    pub achievements: Vec<AchievementDef>,
}

/// List all achievements (catalog)
pub async fn list(State(state): State<Arc<AppState>>) -> Json<AchievementCatalog> {
    let achievements = &state.calculator.rules().achievements;

    let categories = AchievementFamily::ALL
        .into_iter()
        .map(|family| CategoryGroup {
            name: family.name().to_string(),
            family,
            achievements: achievements
                .iter()
                .filter(|a| a.family() == family)
                .cloned()
                .collect(),
        })
        .filter(|c| !c.achievements.is_empty())
        .collect();

    Json(AchievementCatalog {
        total: achievements.len(),
        categories,
    })
}

/// Unlocked achievements for one donor's history
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Vec<UnlockedAchievement>>> {
    let history = parse_donor_history(&body)?;
    let now = evaluation_time(&body)?;

    Ok(Json(state.calculator.evaluate_achievements(
        &history.profile,
        &history.donations,
        now,
    )))
}
