//! Donor Rewards API Server

use std::sync::Arc;

use tracing::info;

use api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("donor_rewards=debug".parse()?)
                .add_directive("api=debug".parse()?)
                .add_directive("engine=info".parse()?),
        )
        .init();

    info!("🩸 Starting Donor Rewards API");

    // Load configuration and rules
    let config = common::Config::from_env();
    let state = AppState::from_config(config.clone())?;
    info!(
        "Rules table {} active ({} achievements, {} badge tiers)",
        state.calculator.rules().version,
        state.calculator.rules().achievements.len(),
        state.calculator.rules().badges.tiers().len()
    );

    let app = app(Arc::new(state));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
