pub mod config;
pub mod handlers;
pub mod services;
pub mod types;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use services::MockStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<MockStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = MockStore::new(config.users.clone(), config.action_log_capacity);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/chat", post(handlers::chat))
        .route("/api/chat_messages/recent", get(handlers::recent_chat_messages))
        .route("/api/action_logs", get(handlers::action_logs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
