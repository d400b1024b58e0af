use std::net::SocketAddr;

use anyhow::Context;
use food_planner::client::{ListParams, RecordList};
use food_planner::{router, AppConfig, AppState};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env may carry RUST_LOG too, so load it before tracing
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Using Airtable base {}", config.airtable.base_id);
    tracing::info!("Recipe link field: {}", config.airtable.recipe_link_field);

    let state = AppState::new(config);

    // Check the Airtable credential once so a bad token shows up at boot, not on
    // the first request. The server still starts either way.
    tracing::info!("Testing Airtable access...");
    match state
        .airtable
        .list_records::<RecordList>(&state.config.airtable.recipes_table, &ListParams::max_records(1))
        .await
    {
        Ok(_) => tracing::info!("Airtable access test passed"),
        Err(e) => {
            tracing::warn!("Airtable access test failed: {}", e);
            tracing::warn!("Please verify:");
            tracing::warn!("  - AIRTABLE_BASE_ID is correct: {}", state.config.airtable.base_id);
            tracing::warn!("  - AIRTABLE_TOKEN has read/write access to that base");
            tracing::warn!("  - The {} table exists", state.config.airtable.recipes_table);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on port {}", addr.port());

    let ct = CancellationToken::new();
    let shutdown = ct.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutting down...");
        ct.cancel();
    });

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Server error")?;

    Ok(())
}
