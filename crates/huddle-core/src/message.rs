//! Message types exchanged with the feed.

use crate::room::SessionId;

/// Arrival sequence number assigned by the feed.
pub type Sequence = i64;

/// A message received from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Feed sequence id.
    pub sequence: Sequence,
    /// Sending session.
    pub session: SessionId,
    /// Sender's display name.
    pub sender_name: String,
    /// Raw message text.
    pub text: String,
}

impl InboundMessage {
    /// Create a new inbound message.
    #[must_use]
    pub fn new(
        sequence: Sequence,
        session: SessionId,
        sender_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            session,
            sender_name: sender_name.into(),
            text: text.into(),
        }
    }

    /// Get the first whitespace-delimited token, the command key.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.text.split_whitespace().next()
    }

    /// Get the tokens following the command key.
    #[must_use]
    pub fn args(&self) -> Vec<&str> {
        self.text.split_whitespace().skip(1).collect()
    }

    /// Check if the text carries no tokens at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.command().is_none()
    }
}

/// A message ready for delivery to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Target session.
    pub target: SessionId,
    /// Message text.
    pub text: String,
}

impl Outbound {
    /// Create a new outbound message.
    #[must_use]
    pub fn new(target: SessionId, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_tokens() {
        let msg = InboundMessage::new(1, 10, "Ann", "  /create   Alpha\t2 ");
        assert_eq!(msg.command(), Some("/create"));
        assert_eq!(msg.args(), vec!["Alpha", "2"]);
        assert!(!msg.is_blank());
    }

    #[test]
    fn test_inbound_blank() {
        assert!(InboundMessage::new(1, 10, "Ann", "").is_blank());
        assert!(InboundMessage::new(1, 10, "Ann", " \n\t").is_blank());
        assert!(InboundMessage::new(1, 10, "Ann", "").args().is_empty());
    }
}
