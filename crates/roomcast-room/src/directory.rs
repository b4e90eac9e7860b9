//! Room directory: maps identities to live actors.

use dashmap::DashMap;
use roomcast_addr::RoomIdentifier;

use crate::RoomHandle;
use crate::room::spawn_room;

/// Maps each room identity to its single live actor.
///
/// The linchpin invariant lives here: **at most one live actor per
/// identity**, even under concurrent first access. `DashMap::entry` holds
/// the shard lock across the get-or-insert, so racing callers converge on
/// the same handle and only one actor is ever spawned.
///
/// Membership is process-local: rooms and their connections are lost on
/// restart, and a room actor, once spawned, lives for the lifetime of the
/// process.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: DashMap<RoomIdentifier, RoomHandle>,
}

impl RoomDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live actor for `id`, spawning it on first reference.
    ///
    /// Unknown identities are not an error — they name rooms nobody has
    /// touched yet, which start out empty.
    pub fn get_or_spawn(&self, id: RoomIdentifier) -> RoomHandle {
        self.rooms
            .entry(id)
            .or_insert_with(|| {
                tracing::info!(room = %id, "room created");
                spawn_room(id)
            })
            .clone()
    }

    /// Number of rooms referenced so far.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
