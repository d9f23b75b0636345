//! # huddle-feed
//!
//! Message feed abstraction for the Huddle chat-room bot.
//!
//! A feed is where inbound messages come from and where replies go:
//!
//! - **Telegram** - Polls the Bot API with `getUpdates`, replies with `sendMessage`
//! - **Memory** - Scripted queue for tests and local runs
//!
//! ## Feed Abstraction
//!
//! All feeds implement the `MessageFeed` trait, so the poll engine is
//! feed-agnostic.
//!
//! ```rust,ignore
//! use huddle_feed::MessageFeed;
//!
//! async fn poll_once(feed: &dyn MessageFeed, cursor: i64) -> i64 {
//!     match feed.fetch_inbound(cursor).await {
//!         Ok(batch) => batch.next_cursor(cursor),
//!         Err(_) => cursor,
//!     }
//! }
//! ```

pub mod memory;
pub mod traits;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use memory::MemoryFeed;
pub use traits::{FeedError, InboundBatch, MessageFeed};

#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramFeed};
