//! Message feed traits for Huddle.
//!
//! A feed yields inbound messages and delivers outbound text. The engine only
//! talks to feeds through [`MessageFeed`], so it runs the same against the
//! Telegram API and the in-memory feed used in tests.

use async_trait::async_trait;
use huddle_core::{InboundMessage, Sequence, SessionId};
use thiserror::Error;

/// Feed errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Failed to fetch inbound messages.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Failed to deliver a message.
    #[error("Send to {session} failed: {reason}")]
    SendFailed {
        /// Target session.
        session: SessionId,
        /// Failure description.
        reason: String,
    },

    /// Protocol error.
    #[error("Protocol error: {0}")]
    Protocol(#[from] huddle_protocol::ProtocolError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// One fetch worth of inbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundBatch {
    /// Messages in arrival order.
    pub messages: Vec<InboundMessage>,
    /// Sequence of the last update seen, including updates that carried no
    /// message. `None` when nothing new arrived.
    pub last_sequence: Option<Sequence>,
}

impl InboundBatch {
    /// Batch whose last sequence is taken from its last message.
    #[must_use]
    pub fn from_messages(messages: Vec<InboundMessage>) -> Self {
        let last_sequence = messages.last().map(|m| m.sequence);
        Self {
            messages,
            last_sequence,
        }
    }

    /// Check if nothing new arrived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_sequence.is_none()
    }

    /// The cursor to use for the next fetch.
    #[must_use]
    pub fn next_cursor(&self, current: Sequence) -> Sequence {
        self.last_sequence.map_or(current, |last| last + 1)
    }
}

/// A source of inbound messages and sink for outbound ones.
#[async_trait]
pub trait MessageFeed: Send + Sync {
    /// Fetch messages with a sequence at or after `cursor`.
    async fn fetch_inbound(&self, cursor: Sequence) -> Result<InboundBatch, FeedError>;

    /// Deliver text to a session. Failures are not retried.
    async fn send_outbound(&self, session: SessionId, text: &str) -> Result<(), FeedError>;

    /// Get the feed name (e.g., "telegram", "memory").
    fn name(&self) -> &'static str;
}
