use std::future::Future;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use yew::Reducible;

use crate::error::ApiError;
use crate::time::parse_instant;
use crate::types::{ChatMessage, ChatRecord, Sender};

pub const FALLBACK_REPLY: &str = "Failed to get response. Please try again.";

/// The history endpoint answers either with a bare list or wrapped in `messages`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HistoryResponse {
    Wrapped { messages: Vec<ChatRecord> },
    Bare(Vec<ChatRecord>),
}

impl HistoryResponse {
    pub fn into_records(self) -> Vec<ChatRecord> {
        match self {
            HistoryResponse::Wrapped { messages } => messages,
            HistoryResponse::Bare(records) => records,
        }
    }
}

/// Splits each stored turn into its user and bot halves, oldest turn first.
/// Timestamps without an offset are read in `zone`.
pub fn flatten_history<Tz: TimeZone>(records: Vec<ChatRecord>, zone: &Tz) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = records
        .into_iter()
        .flat_map(|record| {
            let user = ChatMessage {
                text: record.user_message.unwrap_or_default(),
                sender: Sender::User,
                timestamp: record.timestamp.clone(),
                id: Some(format!("{}_user", record.id)),
            };
            let bot = ChatMessage {
                text: record.ai_response.unwrap_or_default(),
                sender: Sender::Bot,
                timestamp: record.timestamp,
                id: Some(format!("{}_bot", record.id)),
            };
            [user, bot]
        })
        .collect();
    // Stable, so each user message stays ahead of its reply.
    messages.sort_by(|a, b| sort_key(a, zone).cmp(&sort_key(b, zone)));
    messages
}

fn sort_key<'a, Tz: TimeZone>(
    message: &'a ChatMessage,
    zone: &Tz,
) -> (Option<DateTime<Utc>>, Option<&'a str>) {
    let raw = message.timestamp.as_deref();
    (raw.and_then(|raw| parse_instant(raw, zone)), raw)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
}

#[derive(Clone, Debug)]
pub enum ChatAction {
    HistoryLoaded(Vec<ChatMessage>),
    Sent(String),
    Replied(Result<String, ApiError>),
}

impl Reducible for ChatState {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChatAction::HistoryLoaded(mut history) => {
                // Anything sent before the history arrived stays after it.
                history.append(&mut next.messages);
                next.messages = history;
            }
            ChatAction::Sent(text) => {
                next.messages.push(ChatMessage::user(text));
                next.loading = true;
            }
            ChatAction::Replied(Ok(reply)) => {
                next.messages.push(ChatMessage::bot(reply));
                next.loading = false;
            }
            ChatAction::Replied(Err(err)) => {
                log::warn!("chat request failed: {}", err);
                next.messages.push(ChatMessage::bot(FALLBACK_REPLY));
                next.loading = false;
            }
        }
        Rc::new(next)
    }
}

/// Starts a send. The user's message is dispatched before this returns; the returned
/// future waits for the reply and dispatches it, or the fallback on failure.
/// Blank input sends nothing.
pub fn send_message<D, F, Fut>(text: &str, dispatch: D, send: F) -> Option<impl Future<Output = ()>>
where
    D: Fn(ChatAction) + 'static,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, ApiError>> + 'static,
{
    if text.trim().is_empty() {
        return None;
    }
    dispatch(ChatAction::Sent(text.to_string()));
    let pending = send(text.to_string());
    Some(async move {
        let reply = pending.await;
        dispatch(ChatAction::Replied(reply));
    })
}
