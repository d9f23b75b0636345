//! Room and session state.
//!
//! The hub pairs the [`RoomRegistry`] with the [`SessionDirectory`] and is the
//! only place where membership changes, so a room's member list and the
//! directory entries pointing at it always agree.

use crate::directory::SessionDirectory;
use crate::registry::RoomRegistry;
use crate::room::{Room, RoomDefaults, RoomId, RoomSpec, RoomSummary, SessionId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Membership errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// Session already occupies a room.
    #[error("Session {session} is already in room {room}")]
    AlreadyInRoom {
        /// The session.
        session: SessionId,
        /// The room it occupies.
        room: RoomId,
    },

    /// Room not found.
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// Room is at capacity.
    #[error("Room {id} is full ({capacity} members)")]
    RoomFull {
        /// Room id.
        id: RoomId,
        /// Room capacity.
        capacity: usize,
    },
}

/// Rooms plus the sessions seated in them.
#[derive(Debug, Default)]
pub struct Hub {
    rooms: RoomRegistry,
    sessions: SessionDirectory,
}

impl Hub {
    /// Create an empty hub with default room settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(RoomDefaults::default())
    }

    /// Create an empty hub with custom room settings.
    #[must_use]
    pub fn with_defaults(defaults: RoomDefaults) -> Self {
        Self {
            rooms: RoomRegistry::with_defaults(defaults),
            sessions: SessionDirectory::new(),
        }
    }

    /// Get the room registry.
    #[must_use]
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Get the session directory.
    #[must_use]
    pub fn sessions(&self) -> &SessionDirectory {
        &self.sessions
    }

    /// Get the room a session occupies.
    ///
    /// A directory entry whose room no longer exists is dropped and the
    /// session is treated as being in the lobby.
    pub fn room_of(&mut self, session: SessionId) -> Option<&Room> {
        let id = self.sessions.lookup(session)?;
        if !self.rooms.contains(id) {
            warn!(session, room = id, "Directory pointed at a missing room, clearing");
            self.sessions.remove(session);
            return None;
        }
        self.rooms.get(id)
    }

    /// Create a room founded by `session` and seat the founder in it.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AlreadyInRoom`] if the founder occupies a room.
    pub fn create_room(&mut self, founder: SessionId, spec: RoomSpec) -> Result<&Room, HubError> {
        if let Some(room) = self.sessions.lookup(founder) {
            return Err(HubError::AlreadyInRoom {
                session: founder,
                room,
            });
        }

        let id = self.rooms.create_room(founder, spec).id();
        self.sessions.assign(founder, id);
        self.rooms.get(id).ok_or(HubError::RoomNotFound(id))
    }

    /// Seat a session in an existing room.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving all state untouched, if the session already
    /// occupies a room, the room does not exist, or the room is full.
    pub fn join(&mut self, session: SessionId, id: RoomId) -> Result<&Room, HubError> {
        if let Some(room) = self.sessions.lookup(session) {
            return Err(HubError::AlreadyInRoom { session, room });
        }

        let room = self.rooms.get_mut(id).ok_or(HubError::RoomNotFound(id))?;
        if room.is_full() {
            return Err(HubError::RoomFull {
                id,
                capacity: room.capacity(),
            });
        }

        room.add_member(session);
        self.sessions.assign(session, id);
        info!(session, room = id, name = %room.name(), "Session joined room");
        Ok(room)
    }

    /// Take a session out of its room.
    ///
    /// Returns the room as it stands after the departure, or `None` if the
    /// session was in the lobby. An emptied room stays until the next
    /// [`sweep`](Self::sweep).
    pub fn quit(&mut self, session: SessionId) -> Option<RoomSummary> {
        let id = self.sessions.remove(session)?;
        let room = self.rooms.get_mut(id)?;
        room.remove_member(session);
        info!(
            session,
            room = id,
            name = %room.name(),
            remaining = room.member_count(),
            "Session left room"
        );
        Some(room.summary())
    }

    /// Remove every room without members.
    pub fn sweep(&mut self) -> Vec<Room> {
        self.rooms.sweep_empty()
    }

    /// Get hub statistics.
    #[must_use]
    pub fn stats(&self) -> HubStats {
        HubStats {
            rooms: self.rooms.len(),
            public_rooms: self.rooms.list_public().len(),
            sessions: self.sessions.len(),
        }
    }

    /// Check that every room respects its capacity and that the directory and
    /// the member lists describe the same seating.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let rooms_ok = self.rooms.iter().all(|room| {
            room.member_count() <= room.capacity()
                && room
                    .members()
                    .iter()
                    .all(|&s| self.sessions.lookup(s) == Some(room.id()))
        });
        let sessions_ok = self.sessions.iter().all(|(session, id)| {
            self.rooms
                .get(id)
                .is_some_and(|room| room.contains(session))
        });
        rooms_ok && sessions_ok
    }
}

/// Hub statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Number of live rooms.
    pub rooms: usize,
    /// Number of rooms visible in listings.
    pub public_rooms: usize,
    /// Number of sessions seated in a room.
    pub sessions: usize,
}
