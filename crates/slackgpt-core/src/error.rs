//! Error taxonomy for the mention pipeline.
//!
//! Each stage has its own error type so call sites can tell which step of
//! fetch → complete → reply failed. None of them are retried.

use thiserror::Error;

/// Failure while reading channel or thread history.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself failed (DNS, connect, timeout, body read).
    #[error("{method}: transport error: {message}")]
    Transport { method: String, message: String },

    /// Slack answered with `ok: false` (invalid channel, rate limit, ...).
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    /// The response body could not be decoded.
    #[error("{method}: invalid response: {message}")]
    InvalidResponse { method: String, message: String },
}

/// Failure while calling the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(String),

    /// Non-2xx status from the completion endpoint.
    #[error("completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    #[error("completion response contained no choices")]
    NoChoices,
}

/// Failure while posting the reply back to the conversation.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("{method}: transport error: {message}")]
    Transport { method: String, message: String },

    #[error("{method} failed: {error}")]
    Api { method: String, error: String },
}

/// Any failure of the mention pipeline, tagged by stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("history fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("reply failed: {0}")]
    Reply(#[from] ReplyError),
}

impl PipelineError {
    /// Short stage label used as a structured log field.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Completion(_) => "completion",
            PipelineError::Reply(_) => "reply",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Api {
            method: "conversations.history".into(),
            error: "channel_not_found".into(),
        };
        assert_eq!(
            err.to_string(),
            "conversations.history failed: channel_not_found"
        );
    }

    #[test]
    fn test_pipeline_error_from_stage_errors() {
        let err: PipelineError = CompletionError::NoChoices.into();
        assert_eq!(err.stage(), "completion");
        assert!(err.to_string().contains("no choices"));

        let err: PipelineError = ReplyError::Api {
            method: "chat.postMessage".into(),
            error: "not_in_channel".into(),
        }
        .into();
        assert_eq!(err.stage(), "reply");
    }

    #[test]
    fn test_completion_status_display() {
        let err = CompletionError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "completion API returned 429: rate limited");
    }
}
