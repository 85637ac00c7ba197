//! Conversation traits — the Slack operations the mention pipeline needs.
//!
//! `SlackClient` implements both against the real Web API; tests use
//! in-memory fakes.

use async_trait::async_trait;
use slackgpt_core::{FetchError, Message, ReplyError};

/// Read access to conversation history.
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Most recent `limit` entries of a channel's main timeline, **newest first**,
    /// system entries included.
    async fn fetch_history(&self, channel: &str, limit: usize) -> Result<Vec<Message>, FetchError>;

    /// Most recent `limit` entries of the thread anchored at `thread_ts`,
    /// **oldest first**, anchor included.
    async fn fetch_replies(
        &self,
        channel: &str,
        thread_ts: &str,
        limit: usize,
    ) -> Result<Vec<Message>, FetchError>;
}

/// Write access: post a message back into a conversation.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Post `text` into `channel`, inside the thread `thread_ts` when given.
    async fn post_reply(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<(), ReplyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A recording sink for trait-object checks.
    #[derive(Default)]
    struct RecordingSink {
        posts: Mutex<Vec<(String, String, Option<String>)>>,
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn post_reply(
            &self,
            channel: &str,
            text: &str,
            thread_ts: Option<&str>,
        ) -> Result<(), ReplyError> {
            self.posts.lock().unwrap().push((
                channel.to_string(),
                text.to_string(),
                thread_ts.map(String::from),
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reply_sink_as_trait_object() {
        let sink = RecordingSink::default();
        {
            let dyn_sink: &dyn ReplySink = &sink;
            dyn_sink.post_reply("C1", "hello", Some("1.0")).await.unwrap();
            dyn_sink.post_reply("C1", "top level", None).await.unwrap();
        }
        let posts = sink.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].2.as_deref(), Some("1.0"));
        assert_eq!(posts[1].2, None);
    }
}
