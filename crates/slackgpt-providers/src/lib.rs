//! Completion provider layer for slackgpt.
//!
//! # Architecture
//!
//! - [`traits::CompletionProvider`] — trait every completion backend implements
//! - [`traits::CompletionOptions`] — sampling options sent with each request
//! - [`http_provider::HttpCompletionProvider`] — OpenAI-compatible `/completions` client
//! - [`http_provider::create_provider`] — convenience builder from config

pub mod http_provider;
pub mod traits;

pub use http_provider::{create_provider, HttpCompletionProvider};
pub use traits::{CompletionOptions, CompletionProvider};
