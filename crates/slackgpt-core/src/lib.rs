//! slackgpt core — shared types, error taxonomy, configuration, and helpers.
//!
//! This crate contains:
//! - **types**: Slack messages, conversation windows, and mention events
//! - **error**: one error type per pipeline stage plus the umbrella `PipelineError`
//! - **config**: schema, JSON loading, and env var overrides
//! - **utils**: data path and clock helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{CompletionError, FetchError, PipelineError, ReplyError};
pub use types::{ConversationWindow, MentionEvent, Message};
