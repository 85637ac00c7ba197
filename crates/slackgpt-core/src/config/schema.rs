//! Configuration schema.
//!
//! Hierarchy: `Config` → `SlackConfig`, `OpenAiConfig`, `CompletionConfig`,
//! `ContextConfig`, `GatewayConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! Every struct is `#[serde(default)]`, so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.slackgpt/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub slack: SlackConfig,
    pub openai: OpenAiConfig,
    pub completion: CompletionConfig,
    pub context: ContextConfig,
    pub gateway: GatewayConfig,
}

// ─────────────────────────────────────────────
// Slack
// ─────────────────────────────────────────────

/// Slack app credentials and endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`), used for every Web API call.
    pub bot_token: String,
    /// Signing secret used to verify Events API requests.
    /// Empty disables verification (local testing only).
    pub signing_secret: String,
    /// HTTP path the Events API request URL points at.
    pub events_path: String,
    /// Web API base URL. Overridden in tests.
    pub api_base: String,
    /// Static content of the App Home tab.
    pub home: HomeTabConfig,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            signing_secret: String::new(),
            events_path: "/slack/events".to_string(),
            api_base: "https://slack.com/api".to_string(),
            home: HomeTabConfig::default(),
        }
    }
}

impl SlackConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty()
    }

    pub fn verifies_signatures(&self) -> bool {
        !self.signing_secret.is_empty()
    }
}

/// Text and links shown on the App Home tab.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeTabConfig {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub image_alt_text: String,
    pub button_text: String,
    pub button_url: String,
}

impl Default for HomeTabConfig {
    fn default() -> Self {
        Self {
            title: "*OpenAI's GPT-3 Bot*".to_string(),
            description: "You can identify me and ask me anything,\n\
                          I'll answer with an AI generated response following the \
                          context of the conversation."
                .to_string(),
            image_url: "https://openai.com/content/images/2022/05/openai-avatar.png".to_string(),
            image_alt_text: "Open AI Logo".to_string(),
            button_text: "OpenAi GPT-3 Playground".to_string(),
            button_url: "https://beta.openai.com/playground".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// OpenAI
// ─────────────────────────────────────────────

/// Completion API credentials (any OpenAI-compatible `/completions` endpoint).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Custom API base URL (defaults to `https://api.openai.com/v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Completion model identifier.
    pub model: String,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gpt-3.5-turbo-instruct".to_string(),
            extra_headers: None,
        }
    }
}

impl OpenAiConfig {
    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Completion options
// ─────────────────────────────────────────────

/// Sampling options sent with every completion request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 100,
            top_p: 1.0,
            frequency_penalty: 0.5,
            presence_penalty: 0.0,
        }
    }
}

// ─────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────

/// How much history goes into each prompt.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextConfig {
    /// Window size N for channel history, thread history, and the merged window.
    pub history_limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP listener for the Events API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
