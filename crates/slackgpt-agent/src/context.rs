//! Context assembly — thread classification, window merging, prompt rendering.
//!
//! A prompt looks like:
//!
//! ```text
//! <@U1>: hi
//! <@U2>: hello
//! <@UBOT>:
//! ```
//!
//! one line per authored message, followed by the bot's open turn.

use std::sync::LazyLock;

use regex::Regex;
use slackgpt_core::{ConversationWindow, MentionEvent};
use tracing::debug;

/// First `<...>` markup token in a message (normally the `<@BOT>` mention).
static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("mention pattern is valid"));

/// Whether the event was posted inside a thread.
pub fn is_thread(event: &MentionEvent) -> bool {
    event.thread_anchor().is_some()
}

/// Merge the channel window and the thread window into one window of at
/// most `limit` entries.
///
/// The thread's first entry is its anchor, which is usually also the last
/// entry of the channel window; that copy is dropped before concatenating.
/// Other overlaps are passed through.
pub fn merge_windows(
    mut channel: ConversationWindow,
    thread: ConversationWindow,
    limit: usize,
) -> ConversationWindow {
    let anchor_is_channel_tail = match (channel.last(), thread.first()) {
        (Some(tail), Some(anchor)) => tail.timestamp == anchor.timestamp,
        _ => false,
    };
    if anchor_is_channel_tail {
        channel.pop_last();
    }

    channel.append(thread);
    channel.keep_last(limit);

    debug!(
        messages = channel.len(),
        dropped_anchor = anchor_is_channel_tail,
        "merged channel and thread windows"
    );
    channel
}

/// Remove the first `<...>` token from `text` and trim what is left.
///
/// Text without a bracket pair is returned unchanged, whitespace included.
pub fn strip_mention(text: &str) -> String {
    match MENTION_TOKEN.find(text) {
        Some(token) => {
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(&text[..token.start()]);
            stripped.push_str(&text[token.end()..]);
            stripped.trim().to_string()
        }
        None => text.to_string(),
    }
}

/// Render `window` as a completion prompt ending on the bot's turn.
///
/// Messages from `bot_user_id` keep their text as-is; everyone else's
/// leading mention is stripped. System entries are skipped.
pub fn render_prompt(window: &ConversationWindow, bot_user_id: &str) -> String {
    let mut lines: Vec<String> = window
        .iter()
        .filter(|m| m.is_authored())
        .map(|m| {
            let body = if m.author == bot_user_id {
                m.text.clone()
            } else {
                strip_mention(&m.text)
            };
            format!("<@{}>: {}", m.author, body)
        })
        .collect();

    lines.push(format!("<@{bot_user_id}>: "));
    lines.join("\n")
}
