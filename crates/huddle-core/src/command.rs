//! Command tokens and dispatch tables.
//!
//! Each scope has its own table: a map from the exact command token to a
//! command, plus a fallback used for any other text.

use std::collections::HashMap;
use std::fmt;

/// Commands available to sessions in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LobbyCommand {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `/create [name] [capacity] [private]`
    Create,
    /// `/join <room id>`
    Join,
    /// `/list`
    List,
    /// Anything else: a canned reply.
    Chatter,
}

impl LobbyCommand {
    /// Get the command name used in logs and metrics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Create => "create",
            Self::Join => "join",
            Self::List => "list",
            Self::Chatter => "chatter",
        }
    }
}

/// Commands available to sessions inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomCommand {
    /// `/info`
    Info,
    /// `/quit`
    Quit,
    /// Anything else: relayed to the other members.
    Broadcast,
}

impl RoomCommand {
    /// Get the command name used in logs and metrics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Quit => "quit",
            Self::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for LobbyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for RoomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token to command map with a fallback entry.
#[derive(Debug, Clone)]
pub struct DispatchTable<C> {
    entries: HashMap<&'static str, C>,
    fallback: C,
}

impl<C: Copy> DispatchTable<C> {
    /// Create a table that resolves everything to `fallback`.
    #[must_use]
    pub fn new(fallback: C) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// Bind a token to a command.
    #[must_use]
    pub fn with(mut self, token: &'static str, command: C) -> Self {
        self.entries.insert(token, command);
        self
    }

    /// Resolve a token. Matching is exact and case-sensitive.
    #[must_use]
    pub fn resolve(&self, token: &str) -> C {
        self.entries.get(token).copied().unwrap_or(self.fallback)
    }

    /// Get the fallback command.
    #[must_use]
    pub fn fallback(&self) -> C {
        self.fallback
    }

    /// Get the bound tokens.
    #[must_use]
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<_> = self.entries.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }
}

impl DispatchTable<LobbyCommand> {
    /// The lobby table.
    #[must_use]
    pub fn lobby() -> Self {
        Self::new(LobbyCommand::Chatter)
            .with("/start", LobbyCommand::Start)
            .with("/help", LobbyCommand::Help)
            .with("/create", LobbyCommand::Create)
            .with("/join", LobbyCommand::Join)
            .with("/list", LobbyCommand::List)
    }
}

impl DispatchTable<RoomCommand> {
    /// The in-room table.
    #[must_use]
    pub fn room() -> Self {
        Self::new(RoomCommand::Broadcast)
            .with("/info", RoomCommand::Info)
            .with("/quit", RoomCommand::Quit)
    }
}
