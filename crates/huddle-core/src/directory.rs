//! Session directory.
//!
//! Tracks which room each session currently occupies. A session with no
//! entry is in the lobby.

use crate::room::{RoomId, SessionId};
use std::collections::HashMap;
use tracing::trace;

/// Map of session to occupied room.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    entries: HashMap<SessionId, RoomId>,
}

impl SessionDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `session` occupies `room`.
    ///
    /// Returns the previous assignment, if any. Keeping the room's member list
    /// in step is the caller's job.
    pub fn assign(&mut self, session: SessionId, room: RoomId) -> Option<RoomId> {
        trace!(session, room, "Directory: assigned");
        self.entries.insert(session, room)
    }

    /// Get the room a session occupies.
    #[must_use]
    pub fn lookup(&self, session: SessionId) -> Option<RoomId> {
        self.entries.get(&session).copied()
    }

    /// Clear a session's assignment.
    pub fn remove(&mut self, session: SessionId) -> Option<RoomId> {
        let room = self.entries.remove(&session);
        if room.is_some() {
            trace!(session, "Directory: removed");
        }
        room
    }

    /// Iterate over all assignments.
    pub fn iter(&self) -> impl Iterator<Item = (SessionId, RoomId)> + '_ {
        self.entries.iter().map(|(&s, &r)| (s, r))
    }

    /// Get the number of seated sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if every session is in the lobby.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
