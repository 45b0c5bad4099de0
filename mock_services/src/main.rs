use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use dashboard_mock_services::{
    build_router, config::Config, services::spawn_action_log_generator, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state = AppState::new(Config::from_env());
    let config = state.config.clone();
    spawn_action_log_generator(state.store.clone(), config.action_log_interval);

    let app = build_router(state);
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    tracing::info!("mock services listening on http://{}", config.bind_address);
    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}
