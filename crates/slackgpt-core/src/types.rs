//! Core types — Slack messages, conversation windows, and inbound mention events.
//!
//! Field names follow the Slack Web API wire format (`user`, `ts`, `thread_ts`)
//! so these types deserialize straight out of `conversations.history`,
//! `conversations.replies`, and `app_mention` payloads.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────

/// A single posted message in a channel or thread.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Poster id, a human user or the bot itself.
    #[serde(rename = "user", default)]
    pub author: String,
    /// Raw text, possibly containing `<@id>` mention tokens.
    #[serde(default)]
    pub text: String,
    /// Ordering key; also the thread anchor id when this message starts a thread.
    #[serde(rename = "ts")]
    pub timestamp: String,
    /// Set for system entries (joins, edits, ...); absent for authored messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl Message {
    /// Create an authored message (no subtype).
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Message {
            author: author.into(),
            text: text.into(),
            timestamp: timestamp.into(),
            subtype: None,
        }
    }

    /// Mark this message as a system entry (builder pattern).
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Whether a person (or the bot) authored this message, as opposed to
    /// a system event. An empty subtype counts as authored.
    pub fn is_authored(&self) -> bool {
        self.subtype.as_deref().map_or(true, str::is_empty)
    }
}

// ─────────────────────────────────────────────
// Conversation window
// ─────────────────────────────────────────────

/// An ordered slice of conversation history, oldest first.
///
/// The window never re-sorts its contents; callers hand it messages in
/// chronological order and it only trims from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationWindow {
    messages: Vec<Message>,
}

impl ConversationWindow {
    /// Wrap messages that are already in chronological order.
    pub fn new(messages: Vec<Message>) -> Self {
        ConversationWindow { messages }
    }

    /// Drop entries from the front until at most `limit` remain.
    pub fn keep_last(&mut self, limit: usize) {
        if self.messages.len() > limit {
            let excess = self.messages.len() - limit;
            self.messages.drain(..excess);
        }
    }

    /// Append another window after this one, preserving both orders.
    pub fn append(&mut self, other: ConversationWindow) {
        self.messages.extend(other.messages);
    }

    /// Remove and return the newest entry.
    pub fn pop_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Timestamps in window order (handy for assertions and logging).
    pub fn timestamps(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.timestamp.as_str()).collect()
    }
}

impl From<Vec<Message>> for ConversationWindow {
    fn from(messages: Vec<Message>) -> Self {
        ConversationWindow::new(messages)
    }
}

impl<'a> IntoIterator for &'a ConversationWindow {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

// ─────────────────────────────────────────────
// Mention event
// ─────────────────────────────────────────────

/// An `app_mention` event, as delivered inside an Events API `event_callback`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MentionEvent {
    /// Conversation the bot was mentioned in.
    pub channel: String,
    /// User who mentioned the bot.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    pub ts: String,
    /// Anchor of the thread this mention was posted in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl MentionEvent {
    /// Create a top-level (non-threaded) mention.
    pub fn new(
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
        ts: impl Into<String>,
    ) -> Self {
        MentionEvent {
            channel: channel.into(),
            user: user.into(),
            text: text.into(),
            ts: ts.into(),
            thread_ts: None,
        }
    }

    /// Place this mention inside a thread (builder pattern).
    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }

    /// The thread anchor, if one is present and non-empty.
    pub fn thread_anchor(&self) -> Option<&str> {
        self.thread_ts.as_deref().filter(|ts| !ts.is_empty())
    }
}
