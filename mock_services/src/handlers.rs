use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{
    services::{store::RECENT_CHAT_LIMIT, ActionLogQuery, ServiceError},
    types::{ActionLogParams, ChatRequest, ErrorResponse, LoginRequest},
    AppState,
};

const DEFAULT_ACTION_LOG_LIMIT: usize = 10;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    if let Err(err) = state.store.authenticate(&request.user_id, &request.password) {
        tracing::info!(user_id = %request.user_id, "rejected login");
        return Err(err);
    }
    tracing::info!(user_id = %request.user_id, "login accepted");
    Ok(Json(json!({ "success": true, "user_id": request.user_id })))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    let reply = format!("Received: {}", request.message);
    state.store.record_chat(&request.message, &reply);
    Json(json!({ "response": reply }))
}

pub async fn recent_chat_messages(State(state): State<AppState>) -> Json<serde_json::Value> {
    let messages = state.store.recent_chats(RECENT_CHAT_LIMIT);
    Json(json!({ "messages": messages }))
}

pub async fn action_logs(
    State(state): State<AppState>,
    Query(params): Query<ActionLogParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let query = ActionLogQuery::parse(params.query.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_ACTION_LOG_LIMIT);
    tracing::debug!(?query, limit, "action log query");
    let logs = state.store.query_action_logs(&query, limit);
    Ok(Json(json!({ "action_logs": logs })))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid credentials" })),
            )
                .into_response(),
            ServiceError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
        }
    }
}
