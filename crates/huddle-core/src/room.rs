//! Room abstraction for Huddle.
//!
//! Rooms are ephemeral, capacity-bounded groups of sessions that relay chat
//! text to each other.

use serde::Serialize;
use tracing::debug;

/// A room identifier.
pub type RoomId = u64;

/// A session identifier (one per remote chat).
pub type SessionId = i64;

/// Default room display name.
pub const DEFAULT_ROOM_NAME: &str = "Huddle";

/// Default maximum number of members in a room.
pub const DEFAULT_ROOM_CAPACITY: usize = 10;

/// Whether rooms are hidden from listings unless stated otherwise.
pub const DEFAULT_PRIVATE: bool = true;

/// Values applied to a [`RoomSpec`] for any field left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDefaults {
    /// Display name for unnamed rooms.
    pub name: String,
    /// Capacity for rooms created without one.
    pub capacity: usize,
    /// Visibility for rooms created without an explicit flag.
    pub private: bool,
}

impl Default for RoomDefaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROOM_NAME.to_string(),
            capacity: DEFAULT_ROOM_CAPACITY,
            private: DEFAULT_PRIVATE,
        }
    }
}

/// Requested properties of a new room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSpec {
    /// Display name.
    pub name: Option<String>,
    /// Maximum number of members.
    pub capacity: Option<usize>,
    /// Hide the room from listings.
    pub private: Option<bool>,
}

impl RoomSpec {
    /// Create an empty spec that takes every value from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the visibility flag.
    #[must_use]
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = Some(private);
        self
    }
}

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    id: RoomId,
    name: String,
    capacity: usize,
    private: bool,
    /// Member sessions in join order.
    members: Vec<SessionId>,
}

impl Room {
    /// Build a room whose only member is `founder`.
    ///
    /// A zero capacity is raised to one so the founder always fits.
    #[must_use]
    pub(crate) fn new(id: RoomId, founder: SessionId, spec: RoomSpec, defaults: &RoomDefaults) -> Self {
        Self {
            id,
            name: spec.name.unwrap_or_else(|| defaults.name.clone()),
            capacity: spec.capacity.unwrap_or(defaults.capacity).max(1),
            private: spec.private.unwrap_or(defaults.private),
            members: vec![founder],
        }
    }

    /// Get the room id.
    #[must_use]
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Get the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the maximum number of members.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check whether the room is hidden from listings.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Get the member sessions in join order.
    #[must_use]
    pub fn members(&self) -> &[SessionId] {
        &self.members
    }

    /// Get the number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Check whether a session is a member.
    #[must_use]
    pub fn contains(&self, session: SessionId) -> bool {
        self.members.contains(&session)
    }

    /// Check whether the room has no members left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check whether the room is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Add a member.
    ///
    /// Returns `false` without changes if the session is already a member or
    /// the room is full.
    pub(crate) fn add_member(&mut self, session: SessionId) -> bool {
        if self.is_full() || self.contains(session) {
            return false;
        }
        self.members.push(session);
        debug!(room = self.id, session, members = self.members.len(), "Member added");
        true
    }

    /// Remove one occurrence of a member.
    ///
    /// Returns `true` if the session was a member.
    pub(crate) fn remove_member(&mut self, session: SessionId) -> bool {
        match self.members.iter().position(|&m| m == session) {
            Some(index) => {
                self.members.remove(index);
                debug!(room = self.id, session, members = self.members.len(), "Member removed");
                true
            }
            None => false,
        }
    }

    /// Lightweight copy of the room's identity.
    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            members: self.members.len(),
            capacity: self.capacity,
        }
    }
}

/// Identity and occupancy of a room at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    /// Room id.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Number of members.
    pub members: usize,
    /// Maximum number of members.
    pub capacity: usize,
}
