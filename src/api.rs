use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::chat::HistoryResponse;
use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::logs::{FetchOutcome, LogQuery, RESULT_LIMIT};
use crate::types::{ChatReply, ChatRecord, ChatRequest, FilterCriteria, LoginRequest};

/// Checks credentials with the login service. Any 2xx answer is a success.
pub async fn login(config: &DashboardConfig, user_id: &str, password: &str) -> Result<(), ApiError> {
    let request = post_json(
        &config.server_endpoint("/api/login"),
        &LoginRequest { user_id, password },
    )?;
    send(request).await?;
    Ok(())
}

pub async fn fetch_action_logs(config: &DashboardConfig, criteria: &FilterCriteria) -> FetchOutcome {
    let query = LogQuery::from_criteria(criteria).to_json();
    let url = format!(
        "{}?query={}&limit={}",
        config.log_service_endpoint("/api/action_logs"),
        String::from(js_sys::encode_uri_component(&query)),
        RESULT_LIMIT
    );
    FetchOutcome::from_response(get_json::<Value>(&url).await)
}

pub async fn fetch_chat_history(config: &DashboardConfig) -> Result<Vec<ChatRecord>, ApiError> {
    let history: HistoryResponse =
        get_json(&config.server_endpoint("/api/chat_messages/recent")).await?;
    Ok(history.into_records())
}

pub async fn send_chat(config: &DashboardConfig, message: String) -> Result<String, ApiError> {
    let request = post_json(
        &config.server_endpoint("/chat"),
        &ChatRequest { message: &message },
    )?;
    let reply: ChatReply = read_json(send(request).await?).await?;
    Ok(reply.response)
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let request = Request::new_with_str(url)?;
    read_json(send(request).await?).await
}

fn post_json<B: Serialize>(url: &str, body: &B) -> Result<Request, ApiError> {
    let body = serde_json::to_string(body)?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;
    Ok(request)
}

async fn send(request: Request) -> Result<Response, ApiError> {
    let window = web_sys::window().ok_or(ApiError::NoWindow)?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;
    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }
    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let text = JsFuture::from(resp.text()?).await?;
    let raw = text.as_string().unwrap_or_default();
    Ok(serde_json::from_str(&raw)?)
}
