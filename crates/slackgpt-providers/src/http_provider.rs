//! HTTP completion provider for OpenAI-compatible `/completions` endpoints.
//!
//! Sends the rendered prompt as a single text completion request and
//! returns the first choice's text.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use slackgpt_core::config::schema::OpenAiConfig;
use slackgpt_core::CompletionError;

use crate::traits::{CompletionOptions, CompletionProvider};

/// Default API base when none is configured.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Request timeout for a single completion call.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

// ─────────────────────────────────────────────
// HttpCompletionProvider
// ─────────────────────────────────────────────

/// A completion provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpCompletionProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Model sent with every request.
    model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
}

impl std::fmt::Debug for HttpCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl HttpCompletionProvider {
    /// Create a provider from the OpenAI section of the config.
    pub fn new(config: &OpenAiConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            });

        HttpCompletionProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            extra_headers,
        }
    }

    /// Build the full completions URL.
    fn completions_url(&self) -> String {
        format!("{}/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            max_tokens = options.max_tokens,
            "Calling completion API"
        );

        let body = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion HTTP request failed");
                CompletionError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_text, "completion API error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("?"),
            total_tokens = parsed.usage.map_or(0, |u| u.total_tokens),
            "completion received"
        );

        Ok(choice.text)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        "OpenAI"
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an `HttpCompletionProvider`, refusing configs without an API key.
pub fn create_provider(config: &OpenAiConfig) -> Result<HttpCompletionProvider, String> {
    if !config.is_configured() {
        return Err(
            "No OpenAI API key configured. Set OPENAI_API_KEY or openai.apiKey in the config."
                .to_string(),
        );
    }

    debug!(
        model = %config.model,
        api_base = config.api_base.as_deref().unwrap_or("default"),
        "Creating completion provider"
    );

    Ok(HttpCompletionProvider::new(config))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
