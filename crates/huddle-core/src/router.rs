//! Two-tier message router.
//!
//! A sender seated in a room is routed through the room table, anyone else
//! through the lobby table. Each table falls back to its own default, so the
//! same text means different things inside and outside a room.

use crate::command::{DispatchTable, LobbyCommand, RoomCommand};
use crate::handlers;
use crate::hub::Hub;
use crate::message::{InboundMessage, Outbound};
use crate::replies::CannedReplies;
use crate::room::RoomId;
use tracing::{debug, trace};

/// The handler selected for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Sender is in the lobby.
    Lobby(LobbyCommand),
    /// Sender is seated in `room`.
    Room {
        /// The sender's room.
        room: RoomId,
        /// The resolved command.
        command: RoomCommand,
    },
}

impl Route {
    /// Get the command name used in logs and metrics.
    #[must_use]
    pub fn command_name(&self) -> &'static str {
        match self {
            Self::Lobby(command) => command.name(),
            Self::Room { command, .. } => command.name(),
        }
    }
}

/// Result of routing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// The handler that ran.
    pub route: Route,
    /// Messages to deliver, in order.
    pub outbound: Vec<Outbound>,
}

/// The message router.
#[derive(Debug, Clone)]
pub struct Router {
    lobby: DispatchTable<LobbyCommand>,
    room: DispatchTable<RoomCommand>,
    canned: CannedReplies,
}

impl Router {
    /// Create a router with an entropy-seeded canned reply picker.
    #[must_use]
    pub fn new() -> Self {
        Self::with_replies(CannedReplies::new())
    }

    /// Create a router whose canned replies follow a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_replies(CannedReplies::seeded(seed))
    }

    /// Create a router with a custom canned reply picker.
    #[must_use]
    pub fn with_replies(canned: CannedReplies) -> Self {
        Self {
            lobby: DispatchTable::lobby(),
            room: DispatchTable::room(),
            canned,
        }
    }

    /// Get the lobby table.
    #[must_use]
    pub fn lobby_table(&self) -> &DispatchTable<LobbyCommand> {
        &self.lobby
    }

    /// Get the room table.
    #[must_use]
    pub fn room_table(&self) -> &DispatchTable<RoomCommand> {
        &self.room
    }

    /// Select the handler for a message without running it.
    ///
    /// Returns `None` for messages without any text tokens.
    #[must_use]
    pub fn resolve(&self, hub: &Hub, msg: &InboundMessage) -> Option<Route> {
        let token = msg.command()?;
        let seated = hub
            .sessions()
            .lookup(msg.session)
            .filter(|&room| hub.rooms().contains(room));

        Some(match seated {
            Some(room) => Route::Room {
                room,
                command: self.room.resolve(token),
            },
            None => Route::Lobby(self.lobby.resolve(token)),
        })
    }

    /// Route a message to exactly one handler and run it.
    ///
    /// Returns `None`, invoking nothing, for blank messages.
    pub fn route(&mut self, hub: &mut Hub, msg: &InboundMessage) -> Option<Dispatch> {
        // Drops a stale directory entry before the mode is chosen.
        let _ = hub.room_of(msg.session);

        let Some(route) = self.resolve(hub, msg) else {
            trace!(session = msg.session, sequence = msg.sequence, "Dropping blank message");
            return None;
        };
        debug!(session = msg.session, ?route, "Routing message");

        let outbound = match route {
            Route::Lobby(command) => match command {
                LobbyCommand::Start => handlers::start(msg),
                LobbyCommand::Help => handlers::help(msg),
                LobbyCommand::Create => handlers::create(hub, msg),
                LobbyCommand::Join => handlers::join(hub, msg),
                LobbyCommand::List => handlers::list(hub, msg),
                LobbyCommand::Chatter => handlers::chatter(&mut self.canned, msg),
            },
            Route::Room { room, command } => match command {
                RoomCommand::Info => handlers::info(hub, room, msg),
                RoomCommand::Quit => handlers::quit(hub, msg),
                RoomCommand::Broadcast => handlers::broadcast(hub, room, msg),
            },
        };

        Some(Dispatch { route, outbound })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
