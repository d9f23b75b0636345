//! Bot API objects used by Huddle.
//!
//! Only the fields the bot reads are modelled; unknown fields are ignored on
//! decode.

use serde::{Deserialize, Serialize};

/// API method for fetching updates.
pub const GET_UPDATES: &str = "getUpdates";

/// API method for sending a text message.
pub const SEND_MESSAGE: &str = "sendMessage";

/// An incoming update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New incoming message, if this update carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier inside the chat.
    pub message_id: i64,
    /// Sender; absent for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,
    /// Message text, absent for media messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A user or bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
    /// Whether the user is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// First name.
    pub first_name: String,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
    /// Chat type ("private", "group", ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// First name of the other party in a private chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name of the other party in a private chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username, for private chats and public groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Message {
    /// Best available display name for the sender.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.from
            .as_ref()
            .map(|user| user.first_name.as_str())
            .filter(|name| !name.is_empty())
            .or(self.chat.first_name.as_deref())
            .or(self.chat.username.as_deref())
            .unwrap_or("Someone")
    }
}

/// Parameters for `getUpdates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetUpdates {
    /// First update to return; earlier updates are confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-polling timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl GetUpdates {
    /// Request starting at `cursor`. A zero cursor sends no offset.
    #[must_use]
    pub fn from_cursor(cursor: i64) -> Self {
        Self {
            offset: (cursor != 0).then_some(cursor),
            timeout: None,
        }
    }

    /// Set the long-polling timeout. Zero disables long polling.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = (seconds > 0).then_some(seconds);
        self
    }
}

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Target chat.
    pub chat_id: i64,
    /// Message text.
    pub text: String,
}

impl SendMessage {
    /// Create a new request.
    #[must_use]
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(from: Option<&str>, chat_first: Option<&str>, chat_user: Option<&str>) -> Message {
        Message {
            message_id: 1,
            from: from.map(|name| User {
                id: 1,
                is_bot: false,
                first_name: name.to_string(),
                last_name: None,
                username: None,
                language_code: None,
            }),
            chat: Chat {
                id: 1,
                kind: "private".to_string(),
                first_name: chat_first.map(str::to_string),
                last_name: None,
                username: chat_user.map(str::to_string),
            },
            date: 0,
            text: None,
        }
    }

    #[test]
    fn test_sender_name_fallbacks() {
        assert_eq!(message(Some("Ann"), Some("Chat"), None).sender_name(), "Ann");
        assert_eq!(message(None, Some("Chat"), Some("u")).sender_name(), "Chat");
        assert_eq!(message(Some(""), None, Some("u")).sender_name(), "u");
        assert_eq!(message(None, None, None).sender_name(), "Someone");
    }

    #[test]
    fn test_get_updates_serialization() {
        assert_eq!(serde_json::to_value(GetUpdates::from_cursor(0)).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(GetUpdates::from_cursor(17).with_timeout(25)).unwrap(),
            json!({"offset": 17, "timeout": 25})
        );
        assert_eq!(
            serde_json::to_value(GetUpdates::from_cursor(17).with_timeout(0)).unwrap(),
            json!({"offset": 17})
        );
    }

    #[test]
    fn test_send_message_serialization() {
        assert_eq!(
            serde_json::to_value(SendMessage::new(-100, "hi")).unwrap(),
            json!({"chat_id": -100, "text": "hi"})
        );
    }
}
