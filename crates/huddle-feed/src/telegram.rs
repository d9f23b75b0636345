//! Telegram Bot API feed.
//!
//! Polls `getUpdates` for inbound messages and delivers replies with
//! `sendMessage`, using reqwest.

use async_trait::async_trait;
use huddle_core::{InboundMessage, Sequence, SessionId};
use huddle_protocol::types::{GET_UPDATES, SEND_MESSAGE};
use huddle_protocol::{codec, GetUpdates, SendMessage, Update};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

use crate::traits::{FeedError, InboundBatch, MessageFeed};

/// Default Bot API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram feed configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// API base URL.
    pub base_url: String,
    /// Bot token.
    pub token: String,
    /// Timeout for a single request, on top of any long-polling wait.
    pub request_timeout: Duration,
    /// Long-polling wait for `getUpdates` in seconds (0 = short polling).
    pub long_poll_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            request_timeout: Duration::from_secs(10),
            long_poll_secs: 0,
        }
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("long_poll_secs", &self.long_poll_secs)
            .finish()
    }
}

/// Feed backed by the Telegram Bot API.
pub struct TelegramFeed {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramFeed {
    /// Create a new Telegram feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: TelegramConfig) -> Result<Self, FeedError> {
        let timeout = config.request_timeout + Duration::from_secs(u64::from(config.long_poll_secs));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Other(format!("Failed to build HTTP client: {e}")))?;

        debug!("Telegram feed configured: {:?}", config);
        Ok(Self { client, config })
    }

    fn url(&self, method: &str) -> String {
        codec::method_url(&self.config.base_url, &self.config.token, method)
    }
}

/// Convert a batch of updates into inbound messages.
///
/// Updates without a message are skipped but still count toward the batch's
/// last sequence.
#[must_use]
pub fn to_batch(updates: Vec<Update>) -> InboundBatch {
    let last_sequence = updates.last().map(|u| u.update_id);
    let messages = updates
        .into_iter()
        .filter_map(|update| {
            let message = update.message?;
            let sender_name = message.sender_name().to_string();
            Some(InboundMessage::new(
                update.update_id,
                message.chat.id,
                sender_name,
                message.text.unwrap_or_default(),
            ))
        })
        .collect();

    InboundBatch {
        messages,
        last_sequence,
    }
}

fn request_error(e: reqwest::Error, otherwise: impl FnOnce(String) -> FeedError) -> FeedError {
    if e.is_timeout() {
        return FeedError::Timeout;
    }
    // The URL embeds the token.
    otherwise(e.without_url().to_string())
}

#[async_trait]
impl MessageFeed for TelegramFeed {
    async fn fetch_inbound(&self, cursor: Sequence) -> Result<InboundBatch, FeedError> {
        let params = GetUpdates::from_cursor(cursor).with_timeout(self.config.long_poll_secs);

        let response = self
            .client
            .post(self.url(GET_UPDATES))
            .json(&params)
            .send()
            .await
            .map_err(|e| request_error(e, FeedError::FetchFailed))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(e, FeedError::FetchFailed))?;

        let updates = codec::decode_updates(&body)?;
        trace!(cursor, count = updates.len(), "Fetched updates");
        Ok(to_batch(updates))
    }

    async fn send_outbound(&self, session: SessionId, text: &str) -> Result<(), FeedError> {
        let params = SendMessage::new(session, text);
        let send_failed = move |reason: String| FeedError::SendFailed { session, reason };

        let response = self
            .client
            .post(self.url(SEND_MESSAGE))
            .json(&params)
            .send()
            .await
            .map_err(|e| request_error(e, send_failed))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(e, send_failed))?;

        codec::decode::<huddle_protocol::Message>(&body).map_err(|e| send_failed(e.to_string()))?;
        trace!(session, "Message sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
