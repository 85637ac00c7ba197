//! slackgpt agent — the mention pipeline.
//!
//! This crate contains:
//! - **history**: channel and thread fetchers producing chronological windows
//! - **context**: thread classification, window merging, prompt rendering
//! - **handler**: `MentionHandler`, which runs fetch → merge → render → complete → reply

pub mod context;
pub mod handler;
pub mod history;

pub use context::{is_thread, merge_windows, render_prompt, strip_mention};
pub use handler::{assemble_prompt, MentionHandler};
pub use history::{fetch_channel_window, fetch_thread_window};
