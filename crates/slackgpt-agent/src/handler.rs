//! Mention handler — runs the full pipeline for one `app_mention` event.
//!
//! fetch channel → (fetch thread → merge) → render → complete → reply
//!
//! Each step is awaited in turn and the first failure ends the attempt.
//! Nothing is retried and no error text is posted to the conversation.

use std::sync::Arc;

use slackgpt_channels::{ConversationApi, ReplySink};
use slackgpt_core::{FetchError, MentionEvent, PipelineError};
use slackgpt_providers::{CompletionOptions, CompletionProvider};
use tracing::{debug, info, warn};

use crate::context::{is_thread, merge_windows, render_prompt};
use crate::history::{fetch_channel_window, fetch_thread_window};

/// Messages of history fed into each prompt unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Fetch the channel window and, for a thread, the thread window; merge
/// them and render the prompt. `limit` bounds every window.
pub async fn assemble_prompt(
    api: &dyn ConversationApi,
    channel: &str,
    thread_ts: Option<&str>,
    limit: usize,
    bot_user_id: &str,
) -> Result<String, FetchError> {
    let channel_window = fetch_channel_window(api, channel, limit).await?;

    let window = match thread_ts.filter(|ts| !ts.is_empty()) {
        Some(thread_ts) => {
            let thread_window = fetch_thread_window(api, channel, thread_ts, limit).await?;
            merge_windows(channel_window, thread_window, limit)
        }
        None => channel_window,
    };

    Ok(render_prompt(&window, bot_user_id))
}

/// Answers mentions of the bot with a completion of the recent conversation.
///
/// Holds no per-conversation state, so one instance can serve concurrent
/// events.
pub struct MentionHandler {
    api: Arc<dyn ConversationApi>,
    sink: Arc<dyn ReplySink>,
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
    history_limit: usize,
    /// Bot user id from `auth.test`; events may override it.
    bot_user_id: String,
}

impl MentionHandler {
    pub fn new(
        api: Arc<dyn ConversationApi>,
        sink: Arc<dyn ReplySink>,
        provider: Arc<dyn CompletionProvider>,
        bot_user_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            sink,
            provider,
            options: CompletionOptions::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            bot_user_id: bot_user_id.into(),
        }
    }

    /// Set the completion sampling options (builder pattern).
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Set how many messages of history each prompt sees (builder pattern).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Fetch, merge and render the prompt for a conversation without calling
    /// the completion API.
    pub async fn build_prompt(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        bot_user_id: &str,
    ) -> Result<String, FetchError> {
        assemble_prompt(
            self.api.as_ref(),
            channel,
            thread_ts,
            self.history_limit,
            bot_user_id,
        )
        .await
    }

    /// Run the pipeline for `event`.
    ///
    /// `bot_override` replaces the configured bot id when the event envelope
    /// names the installation's bot user.
    pub async fn handle(
        &self,
        event: &MentionEvent,
        bot_override: Option<&str>,
    ) -> Result<(), PipelineError> {
        let bot_user_id = bot_override
            .filter(|id| !id.is_empty())
            .unwrap_or(self.bot_user_id.as_str());
        let thread_ts = if is_thread(event) {
            event.thread_anchor()
        } else {
            None
        };

        info!(
            channel = %event.channel,
            user = %event.user,
            thread_ts = thread_ts.unwrap_or("-"),
            "handling mention"
        );

        let prompt = self
            .build_prompt(&event.channel, thread_ts, bot_user_id)
            .await?;
        debug!(
            prompt_lines = prompt.lines().count(),
            provider = self.provider.display_name(),
            model = self.provider.model(),
            "prompt rendered"
        );

        let completion = self.provider.complete(&prompt, &self.options).await?;
        let reply = completion.trim();
        if reply.is_empty() {
            warn!(channel = %event.channel, "completion was empty, not replying");
            return Ok(());
        }

        self.sink
            .post_reply(&event.channel, reply, thread_ts)
            .await?;

        info!(
            channel = %event.channel,
            reply_chars = reply.len(),
            "reply posted"
        );
        Ok(())
    }
}
