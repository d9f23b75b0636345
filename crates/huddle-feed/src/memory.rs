//! In-memory feed.
//!
//! Inbound messages are queued by hand and outbound messages are recorded.
//! Fetching follows the same offset rule as the Bot API: everything before
//! the cursor is considered confirmed and discarded.

use async_trait::async_trait;
use huddle_core::{InboundMessage, Outbound, Sequence, SessionId};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::debug;

use crate::traits::{FeedError, InboundBatch, MessageFeed};

#[derive(Debug, Default)]
struct State {
    pending: Vec<InboundMessage>,
    next_sequence: Sequence,
    sent: Vec<Outbound>,
    unreachable: HashSet<SessionId>,
    failing_fetches: usize,
}

/// A scripted feed for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryFeed {
    state: Mutex<State>,
}

impl MemoryFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message from `session`, assigning the next sequence id.
    ///
    /// Returns the assigned sequence.
    pub async fn push(&self, session: SessionId, sender_name: &str, text: &str) -> Sequence {
        let mut state = self.state.lock().await;
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state
            .pending
            .push(InboundMessage::new(sequence, session, sender_name, text));
        sequence
    }

    /// Get everything delivered so far.
    pub async fn sent(&self) -> Vec<Outbound> {
        self.state.lock().await.sent.clone()
    }

    /// Get and clear everything delivered so far.
    pub async fn take_sent(&self) -> Vec<Outbound> {
        std::mem::take(&mut self.state.lock().await.sent)
    }

    /// Get the texts delivered to one session, in order.
    pub async fn sent_to(&self, session: SessionId) -> Vec<String> {
        self.state
            .lock()
            .await
            .sent
            .iter()
            .filter(|o| o.target == session)
            .map(|o| o.text.clone())
            .collect()
    }

    /// Make every send to `session` fail.
    pub async fn make_unreachable(&self, session: SessionId) {
        self.state.lock().await.unreachable.insert(session);
    }

    /// Make the next `count` fetches fail.
    pub async fn fail_fetches(&self, count: usize) {
        self.state.lock().await.failing_fetches = count;
    }

    /// Get the number of queued messages not yet confirmed.
    pub async fn pending(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}

#[async_trait]
impl MessageFeed for MemoryFeed {
    async fn fetch_inbound(&self, cursor: Sequence) -> Result<InboundBatch, FeedError> {
        let mut state = self.state.lock().await;

        if state.failing_fetches > 0 {
            state.failing_fetches -= 1;
            return Err(FeedError::FetchFailed("scripted fetch failure".to_string()));
        }

        state.pending.retain(|m| m.sequence >= cursor);
        let batch = InboundBatch::from_messages(state.pending.clone());
        debug!(cursor, count = batch.messages.len(), "Memory feed fetch");
        Ok(batch)
    }

    async fn send_outbound(&self, session: SessionId, text: &str) -> Result<(), FeedError> {
        let mut state = self.state.lock().await;
        if state.unreachable.contains(&session) {
            return Err(FeedError::SendFailed {
                session,
                reason: "session unreachable".to_string(),
            });
        }
        state.sent.push(Outbound::new(session, text));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_feed_cursor() {
        let feed = MemoryFeed::new();
        feed.push(1, "Ann", "a").await;
        feed.push(2, "Bob", "b").await;

        let batch = feed.fetch_inbound(0).await.unwrap();
        assert_eq!(batch.messages.len(), 2);
        let cursor = batch.next_cursor(0);
        assert_eq!(cursor, 2);

        // Without advancing, the same messages come back.
        assert_eq!(feed.fetch_inbound(0).await.unwrap().messages.len(), 2);

        assert!(feed.fetch_inbound(cursor).await.unwrap().is_empty());
        assert_eq!(feed.pending().await, 0);

        feed.push(1, "Ann", "c").await;
        let batch = feed.fetch_inbound(cursor).await.unwrap();
        assert_eq!(batch.messages[0].sequence, 2);
        assert_eq!(batch.messages[0].text, "c");
    }

    #[tokio::test]
    async fn test_memory_feed_failures() {
        let feed = MemoryFeed::new();
        feed.fail_fetches(1).await;
        assert!(feed.fetch_inbound(0).await.is_err());
        assert!(feed.fetch_inbound(0).await.is_ok());

        feed.make_unreachable(7).await;
        assert!(matches!(
            feed.send_outbound(7, "x").await,
            Err(FeedError::SendFailed { session: 7, .. })
        ));
        feed.send_outbound(8, "y").await.unwrap();
        assert_eq!(feed.sent().await, vec![Outbound::new(8, "y")]);
        assert_eq!(feed.sent_to(8).await, vec!["y".to_string()]);
        assert_eq!(feed.take_sent().await.len(), 1);
        assert!(feed.sent().await.is_empty());
    }
}
