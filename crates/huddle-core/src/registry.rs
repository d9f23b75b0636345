//! Room registry.
//!
//! The registry owns every live room, allocates room ids and removes rooms
//! that have emptied out.

use crate::room::{Room, RoomDefaults, RoomId, RoomSpec, SessionId};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Owner of all rooms, keyed by id.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, Room>,
    defaults: RoomDefaults,
}

impl RoomRegistry {
    /// Create an empty registry with default room settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(RoomDefaults::default())
    }

    /// Create an empty registry with custom room settings.
    #[must_use]
    pub fn with_defaults(defaults: RoomDefaults) -> Self {
        debug!("Creating room registry with defaults: {:?}", defaults);
        Self {
            rooms: BTreeMap::new(),
            defaults,
        }
    }

    /// Get the settings applied to unspecified room fields.
    #[must_use]
    pub fn defaults(&self) -> &RoomDefaults {
        &self.defaults
    }

    /// The id the next created room will receive.
    ///
    /// Recomputed from the live rooms on every call, so the id of a swept room
    /// can be handed out again.
    #[must_use]
    pub fn next_id(&self) -> RoomId {
        self.rooms
            .last_key_value()
            .map_or(0, |(&id, _)| id.saturating_add(1))
    }

    /// Create a room with `founder` as its only member.
    pub fn create_room(&mut self, founder: SessionId, spec: RoomSpec) -> &Room {
        let id = self.next_id();
        let room = Room::new(id, founder, spec, &self.defaults);
        info!(
            room = id,
            name = %room.name(),
            capacity = room.capacity(),
            private = room.is_private(),
            founder,
            "Room created"
        );
        self.rooms.entry(id).or_insert(room)
    }

    /// Look up a room.
    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    /// Check if a room exists.
    #[must_use]
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// Remove every room without members.
    ///
    /// Returns the removed rooms in id order.
    pub fn sweep_empty(&mut self) -> Vec<Room> {
        let empty: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, room)| room.is_empty())
            .map(|(&id, _)| id)
            .collect();

        let mut removed = Vec::with_capacity(empty.len());
        for id in empty {
            if let Some(room) = self.rooms.remove(&id) {
                info!(room = id, name = %room.name(), "Room is empty, deleted");
                removed.push(room);
            }
        }
        removed
    }

    /// Get all rooms that are visible in listings.
    #[must_use]
    pub fn list_public(&self) -> Vec<&Room> {
        self.rooms.values().filter(|room| !room.is_private()).collect()
    }

    /// Iterate over all rooms in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Get the number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Check if there are no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_allocates_max_plus_one() {
        let mut registry = RoomRegistry::new();
        assert_eq!(registry.next_id(), 0);

        assert_eq!(registry.create_room(1, RoomSpec::new()).id(), 0);
        assert_eq!(registry.create_room(2, RoomSpec::new()).id(), 1);
        assert_eq!(registry.create_room(3, RoomSpec::new()).id(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_reuses_swept_top_id() {
        let mut registry = RoomRegistry::new();
        registry.create_room(1, RoomSpec::new());
        registry.create_room(2, RoomSpec::new());

        registry.get_mut(1).unwrap().remove_member(2);
        let removed = registry.sweep_empty();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), 1);

        assert_eq!(registry.create_room(3, RoomSpec::new()).id(), 1);
    }

    #[test]
    fn test_registry_sweep_keeps_occupied_rooms() {
        let mut registry = RoomRegistry::new();
        registry.create_room(1, RoomSpec::new());
        registry.create_room(2, RoomSpec::new());
        registry.create_room(3, RoomSpec::new());

        registry.get_mut(0).unwrap().remove_member(1);
        registry.get_mut(2).unwrap().remove_member(3);

        let removed: Vec<RoomId> = registry.sweep_empty().iter().map(Room::id).collect();
        assert_eq!(removed, vec![0, 2]);
        assert!(registry.contains(1));
        assert_eq!(registry.get(1).unwrap().members(), &[2]);
        assert!(registry.sweep_empty().is_empty());
    }

    #[test]
    fn test_registry_list_public() {
        let mut registry = RoomRegistry::new();
        assert!(registry.list_public().is_empty());

        registry.create_room(1, RoomSpec::new());
        registry.create_room(2, RoomSpec::new().with_private(false));
        registry.create_room(3, RoomSpec::new().with_name("open").with_private(false));

        let public: Vec<RoomId> = registry.list_public().iter().map(|r| r.id()).collect();
        assert_eq!(public, vec![1, 2]);
    }

    #[test]
    fn test_registry_custom_defaults() {
        let mut registry = RoomRegistry::with_defaults(RoomDefaults {
            name: "Den".to_string(),
            capacity: 3,
            private: false,
        });

        let room = registry.create_room(1, RoomSpec::new());
        assert_eq!(room.name(), "Den");
        assert_eq!(room.capacity(), 3);
        assert!(!room.is_private());
    }
}
