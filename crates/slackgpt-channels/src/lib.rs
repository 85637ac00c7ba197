//! slackgpt channels — everything that talks to Slack.
//!
//! This crate provides:
//! - **base**: `ConversationApi` and `ReplySink`, the seams the mention pipeline depends on
//! - **slack**: `SlackClient`, a Web API client implementing both traits
//! - **events**: the Events API HTTP server with request signature verification
//! - **signature**: Slack `v0` request signing
//! - **home**: the App Home tab view

pub mod base;
pub mod events;
pub mod home;
pub mod signature;
pub mod slack;

pub use base::{ConversationApi, ReplySink};
pub use events::{EventHandler, EventsState};
pub use slack::SlackClient;
