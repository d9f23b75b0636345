//! # huddle-protocol
//!
//! Wire types for the Telegram Bot API calls Huddle makes.
//!
//! Huddle only needs two methods:
//!
//! - `getUpdates` - Fetch inbound messages newer than an offset
//! - `sendMessage` - Send text to a chat
//!
//! ## Example
//!
//! ```rust
//! use huddle_protocol::{codec, Update};
//!
//! let body = br#"{"ok":true,"result":[{"update_id":1}]}"#;
//! let updates: Vec<Update> = codec::decode(body).unwrap();
//! assert_eq!(updates[0].update_id, 1);
//! ```

pub mod codec;
pub mod types;

pub use codec::{decode, ApiResponse, ProtocolError};
pub use types::{Chat, GetUpdates, Message, SendMessage, Update, User};
