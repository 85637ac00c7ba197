//! History fetchers — turn raw Slack history into chronological windows.

use slackgpt_channels::ConversationApi;
use slackgpt_core::{ConversationWindow, FetchError, Message};
use tracing::debug;

/// Most recent `limit` authored messages of `channel`'s main timeline,
/// oldest first.
///
/// `conversations.history` returns newest first and includes system entries
/// (joins, topic changes); both are corrected here.
pub async fn fetch_channel_window(
    api: &dyn ConversationApi,
    channel: &str,
    limit: usize,
) -> Result<ConversationWindow, FetchError> {
    let mut messages = api.fetch_history(channel, limit).await?;
    let fetched = messages.len();

    messages.retain(Message::is_authored);
    messages.reverse();

    debug!(
        channel,
        fetched,
        messages = messages.len(),
        "fetched channel history"
    );
    Ok(ConversationWindow::new(messages))
}

/// Most recent `limit` messages of the thread anchored at `thread_ts`, in the
/// order Slack returns them (oldest first, anchor included).
pub async fn fetch_thread_window(
    api: &dyn ConversationApi,
    channel: &str,
    thread_ts: &str,
    limit: usize,
) -> Result<ConversationWindow, FetchError> {
    let messages = api.fetch_replies(channel, thread_ts, limit).await?;

    debug!(
        channel,
        thread_ts,
        messages = messages.len(),
        "fetched thread replies"
    );
    Ok(ConversationWindow::new(messages))
}
