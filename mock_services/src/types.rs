use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub timestamp: String,
    pub actor: String,
    pub endpoint: String,
    pub method: String,
    pub status: u16,
    pub payload: Value,
    pub response: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub timestamp: String,
    pub user_message: String,
    pub ai_response: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionLogParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
