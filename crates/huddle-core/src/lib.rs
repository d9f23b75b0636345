//! # huddle-core
//!
//! Room membership and command routing for the Huddle chat-room bot.
//!
//! This crate provides the fundamental building blocks:
//!
//! - **Room** - Capacity-bounded group of sessions
//! - **RoomRegistry** - Owns rooms, allocates ids, sweeps empty rooms
//! - **SessionDirectory** - Which room each session occupies
//! - **Hub** - Keeps the registry and the directory in step
//! - **Router** - Picks the room or lobby handler for each message
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Inbound   │────▶│   Router    │────▶│  Handlers   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Directory  │◀────│     Hub     │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use huddle_core::{Hub, InboundMessage, Router};
//!
//! let mut hub = Hub::new();
//! let mut router = Router::seeded(42);
//!
//! router.route(&mut hub, &InboundMessage::new(1, 100, "Ann", "/create Alpha 2"));
//! router.route(&mut hub, &InboundMessage::new(2, 200, "Bob", "/join 0"));
//!
//! let dispatch = router
//!     .route(&mut hub, &InboundMessage::new(3, 200, "Bob", "hi"))
//!     .unwrap();
//! assert_eq!(dispatch.outbound[0].target, 100);
//! assert_eq!(dispatch.outbound[0].text, "Bob: hi");
//! ```

pub mod command;
pub mod directory;
pub mod handlers;
pub mod hub;
pub mod message;
pub mod registry;
pub mod replies;
pub mod room;
pub mod router;

pub use command::{DispatchTable, LobbyCommand, RoomCommand};
pub use directory::SessionDirectory;
pub use hub::{Hub, HubError, HubStats};
pub use message::{InboundMessage, Outbound, Sequence};
pub use registry::RoomRegistry;
pub use replies::CannedReplies;
pub use room::{Room, RoomDefaults, RoomId, RoomSpec, RoomSummary, SessionId};
pub use router::{Dispatch, Route, Router};
