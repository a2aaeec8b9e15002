//! HTTP surface over the scoring engine

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Build the application router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/rules", get(routes::rules::get))
        .route("/api/points", post(routes::points::calculate))
        .route("/api/points/total", post(routes::points::total))
        .route("/api/badges/:count", get(routes::badges::get))
        .route("/api/streak", post(routes::streak::compute))
        .route(
            "/api/achievements",
            get(routes::achievements::list).post(routes::achievements::evaluate),
        )
        .route("/api/donors/summary", post(routes::donors::summary))
        .route("/api/leaderboard", post(routes::leaderboard::rank))
        .route(
            "/api/leaderboard/rank/:donor_id",
            post(routes::leaderboard::rank_of),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
