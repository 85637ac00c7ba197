//! Slack Web API client.
//!
//! Covers the handful of methods the bot uses:
//! - `auth.test` — resolve the bot's own user id
//! - `conversations.history` / `conversations.replies` — read context
//! - `chat.postMessage` — post the generated reply
//! - `views.publish` — render the App Home tab
//!
//! Every call is a single attempt. Slack reports most failures as HTTP 200
//! with `ok: false`, so the `ok` flag is checked on every response.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use slackgpt_core::config::schema::SlackConfig;
use slackgpt_core::{FetchError, Message, ReplyError};

use crate::base::{ConversationApi, ReplySink};

/// Response envelope shared by the history and replies methods.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

/// Slack Web API client authenticated with the bot token.
#[derive(Clone, Debug)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackClient {
    /// Create a client from the Slack section of the config.
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Call `auth.test` to resolve the bot's own user id.
    pub async fn auth_test(&self) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(self.url("auth.test"))
            .bearer_auth(&self.bot_token)
            .send()
            .await?;

        let body: Value = resp.json().await?;
        check_ok("auth.test", &body).map_err(|e| anyhow::anyhow!("auth.test failed: {}", e))?;

        let user_id = body["user_id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("no user_id in auth.test response"))?;

        Ok(user_id.to_string())
    }

    /// Publish a Home tab view for `user_id` via `views.publish`.
    pub async fn publish_home(&self, user_id: &str, view: Value) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(self.url("views.publish"))
            .bearer_auth(&self.bot_token)
            .json(&json!({ "user_id": user_id, "view": view }))
            .send()
            .await?;

        let body: Value = resp.json().await?;
        check_ok("views.publish", &body)
            .map_err(|e| anyhow::anyhow!("views.publish failed: {}", e))?;

        debug!(user = %user_id, "published home view");
        Ok(())
    }

    /// GET a messages-returning method and decode its `messages` array.
    async fn get_messages(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Message>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            method: method.to_string(),
            message: e.to_string(),
        };

        let resp = self
            .http
            .get(self.url(method))
            .bearer_auth(&self.bot_token)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let body: Value = resp.json().await.map_err(|e| FetchError::InvalidResponse {
            method: method.to_string(),
            message: e.to_string(),
        })?;

        check_ok(method, &body).map_err(|error| FetchError::Api {
            method: method.to_string(),
            error,
        })?;

        let parsed: MessagesResponse =
            serde_json::from_value(body).map_err(|e| FetchError::InvalidResponse {
                method: method.to_string(),
                message: e.to_string(),
            })?;

        debug!(method, count = parsed.messages.len(), "fetched messages");
        Ok(parsed.messages)
    }
}

/// Return the Slack `error` string when `ok` is not `true`.
fn check_ok(method: &str, body: &Value) -> Result<(), String> {
    if body["ok"].as_bool() == Some(true) {
        return Ok(());
    }
    let err = body["error"].as_str().unwrap_or("unknown").to_string();
    debug!(method, error = %err, "Slack API returned ok=false");
    Err(err)
}

#[async_trait]
impl ConversationApi for SlackClient {
    async fn fetch_history(&self, channel: &str, limit: usize) -> Result<Vec<Message>, FetchError> {
        self.get_messages(
            "conversations.history",
            &[("channel", channel.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn fetch_replies(
        &self,
        channel: &str,
        thread_ts: &str,
        limit: usize,
    ) -> Result<Vec<Message>, FetchError> {
        self.get_messages(
            "conversations.replies",
            &[
                ("channel", channel.to_string()),
                ("ts", thread_ts.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl ReplySink for SlackClient {
    async fn post_reply(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<(), ReplyError> {
        const METHOD: &str = "chat.postMessage";

        let mut body = json!({
            "channel": channel,
            "text": text,
        });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = json!(ts);
        }

        let transport = |e: reqwest::Error| ReplyError::Transport {
            method: METHOD.to_string(),
            message: e.to_string(),
        };

        let resp = self
            .http
            .post(self.url(METHOD))
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let resp_body: Value = resp.json().await.map_err(transport)?;
        check_ok(METHOD, &resp_body).map_err(|error| ReplyError::Api {
            method: METHOD.to_string(),
            error,
        })?;

        debug!(channel = %channel, threaded = thread_ts.is_some(), "posted reply");
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SlackClient {
        SlackClient::new(&SlackConfig {
            bot_token: "xoxb-test".into(),
            api_base: format!("{}/api/", server.uri()),
            ..SlackConfig::default()
        })
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = SlackClient::new(&SlackConfig {
            api_base: "https://slack.com/api/".into(),
            ..SlackConfig::default()
        });
        assert_eq!(client.url("auth.test"), "https://slack.com/api/auth.test");
    }

    #[tokio::test]
    async fn test_auth_test_returns_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth.test"))
            .and(header("Authorization", "Bearer xoxb-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true, "user_id": "UBOT", "team_id": "T1"
            })))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).auth_test().await.unwrap(), "UBOT");
    }

    #[tokio::test]
    async fn test_auth_test_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth.test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": false, "error": "invalid_auth" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).auth_test().await.unwrap_err();
        assert!(err.to_string().contains("invalid_auth"));
    }

    #[tokio::test]
    async fn test_fetch_history_passes_channel_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations.history"))
            .and(query_param("channel", "C1"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "messages": [
                    { "type": "message", "user": "U2", "text": "newer", "ts": "2.0" },
                    {
                        "type": "message",
                        "subtype": "channel_join",
                        "user": "U3",
                        "text": "joined",
                        "ts": "1.5"
                    },
                    { "type": "message", "user": "U1", "text": "older", "ts": "1.0" }
                ],
                "has_more": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let msgs = client_for(&server).fetch_history("C1", 10).await.unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].timestamp, "2.0");
        assert_eq!(msgs[1].subtype.as_deref(), Some("channel_join"));
    }

    #[tokio::test]
    async fn test_fetch_history_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations.history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false, "error": "channel_not_found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_history("CNOPE", 10).await.unwrap_err();
        match err {
            FetchError::Api { method, error } => {
                assert_eq!(method, "conversations.history");
                assert_eq!(error, "channel_not_found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_history_transport_error() {
        let client = SlackClient::new(&SlackConfig {
            api_base: "http://127.0.0.1:1/api".into(),
            ..SlackConfig::default()
        });
        let err = client.fetch_history("C1", 10).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_replies_passes_thread_ts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations.replies"))
            .and(query_param("channel", "C1"))
            .and(query_param("ts", "1.0"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "messages": [
                    { "user": "U1", "text": "anchor", "ts": "1.0", "thread_ts": "1.0" },
                    { "user": "U2", "text": "reply", "ts": "1.1", "thread_ts": "1.0" }
                ]
            })))
            .mount(&server)
            .await;

        let msgs = client_for(&server).fetch_replies("C1", "1.0", 10).await.unwrap();
        let ts: Vec<_> = msgs.iter().map(|m| m.timestamp.as_str()).collect();
        assert_eq!(ts, vec!["1.0", "1.1"]);
    }

    #[tokio::test]
    async fn test_post_reply_threaded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .and(body_json(json!({ "channel": "C1", "text": "hello", "thread_ts": "1.0" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "ts": "3.0" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .post_reply("C1", "hello", Some("1.0"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_post_reply_top_level_omits_thread_ts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .and(body_json(json!({ "channel": "C1", "text": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).post_reply("C1", "hello", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_reply_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": false, "error": "not_in_channel" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .post_reply("C1", "hello", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not_in_channel"));
    }

    #[tokio::test]
    async fn test_publish_home() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/views.publish"))
            .and(body_json(json!({ "user_id": "U1", "view": { "type": "home", "blocks": [] } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .publish_home("U1", json!({ "type": "home", "blocks": [] }))
            .await
            .unwrap();
    }
}
