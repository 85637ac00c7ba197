//! Events API HTTP server.
//!
//! Handles:
//! - `url_verification` — echoes the challenge during app setup
//! - `event_callback` / `app_mention` — runs the mention pipeline
//! - `event_callback` / `app_home_opened` — publishes the Home tab
//!
//! Slack expects an answer within 3 seconds, so events are acknowledged
//! immediately and handled on a spawned task. That task is the error
//! boundary: failures are logged and never turned into a chat message.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use slackgpt_core::{MentionEvent, PipelineError};

use crate::signature;

/// Header Slack sets on redeliveries of an event it thinks we missed.
const RETRY_NUM_HEADER: &str = "x-slack-retry-num";

/// What the server does with the events it accepts.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an `app_mention`. `bot_user_id` comes from the envelope's
    /// `authorizations` block when Slack includes one.
    async fn on_mention(
        &self,
        event: MentionEvent,
        bot_user_id: Option<String>,
    ) -> Result<(), PipelineError>;

    /// Handle `app_home_opened` for `user_id`.
    async fn on_home_opened(&self, user_id: String) -> anyhow::Result<()>;
}

/// Shared state of the events route.
#[derive(Clone)]
pub struct EventsState {
    signing_secret: Option<String>,
    handler: Arc<dyn EventHandler>,
    clock: fn() -> i64,
}

impl EventsState {
    /// `signing_secret = None` disables signature verification.
    pub fn new(signing_secret: Option<String>, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            signing_secret: signing_secret.filter(|s| !s.is_empty()),
            handler,
            clock: slackgpt_core::utils::unix_now,
        }
    }

    /// Replace the Unix-seconds clock used for replay checks (builder pattern).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }
}

/// Build the router serving the Events API at `path`.
pub fn router(path: &str, state: EventsState) -> Router {
    Router::new()
        .route(path, post(handle_events))
        .with_state(state)
}

async fn handle_events(
    State(state): State<EventsState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // -- 1. Signature verification
    if let Some(ref secret) = state.signing_secret {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        if let Err(e) = signature::verify(
            secret,
            header("x-slack-request-timestamp"),
            header("x-slack-signature"),
            &body,
            (state.clock)(),
        ) {
            warn!(error = %e, "rejected Events API request");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    // -- 2. Redeliveries were already acknowledged once
    if let Some(retry) = headers.get(RETRY_NUM_HEADER) {
        debug!(retry = ?retry, "ignoring Slack redelivery");
        return StatusCode::OK.into_response();
    }

    // -- 3. Route by payload type
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to parse Events API body as JSON");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match payload["type"].as_str() {
        Some("url_verification") => {
            info!("answering url_verification challenge");
            let challenge = payload["challenge"].as_str().unwrap_or_default();
            Json(json!({ "challenge": challenge })).into_response()
        }
        Some("event_callback") => {
            dispatch_event(&state, &payload);
            StatusCode::OK.into_response()
        }
        other => {
            debug!(payload_type = ?other, "ignoring Events API payload");
            StatusCode::OK.into_response()
        }
    }
}

/// The bot user id from the envelope's first authorization, when that
/// authorization belongs to a bot.
fn bot_authorization(payload: &Value) -> Option<String> {
    let auth = &payload["authorizations"][0];
    if auth["is_bot"].as_bool() != Some(true) {
        return None;
    }
    auth["user_id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .map(String::from)
}

/// Spawn the handler for a single `event_callback`.
fn dispatch_event(state: &EventsState, payload: &Value) {
    let event = &payload["event"];
    let event_type = event["type"].as_str().unwrap_or("");

    match event_type {
        "app_mention" => {
            let mention: MentionEvent = match serde_json::from_value(event.clone()) {
                Ok(m) => m,
                Err(e) => {
                    warn!(error = %e, "malformed app_mention event");
                    return;
                }
            };
            let bot_user_id = bot_authorization(payload);

            debug!(
                channel = %mention.channel,
                thread_ts = mention.thread_ts.as_deref().unwrap_or("-"),
                "dispatching app_mention"
            );

            let handler = state.handler.clone();
            tokio::spawn(async move {
                let channel = mention.channel.clone();
                if let Err(e) = handler.on_mention(mention, bot_user_id).await {
                    error!(
                        stage = e.stage(),
                        channel = %channel,
                        error = %e,
                        "mention handling failed"
                    );
                }
            });
        }
        "app_home_opened" => {
            let Some(user_id) = event["user"].as_str().map(String::from) else {
                warn!("app_home_opened without user");
                return;
            };
            let handler = state.handler.clone();
            tokio::spawn(async move {
                if let Err(e) = handler.on_home_opened(user_id).await {
                    error!(error = %e, "failed to publish home view");
                }
            });
        }
        other => {
            debug!(event_type = %other, "ignoring event type");
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
