//! The per-room membership set.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::{ConnectionHandle, ConnectionId, Payload};

/// The set of connections currently accepted by one room actor.
///
/// Membership mirrors "currently open connections" exactly: insertion
/// happens when an upgrade is accepted, removal on close or error.
/// Owned by a single actor, so no interior locking.
#[derive(Debug, Default)]
pub struct Registry {
    members: HashMap<ConnectionId, ConnectionHandle>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle. Returns `false` if a handle with the same id is
    /// already present (the existing member is kept, the new handle is
    /// dropped).
    pub fn insert(&mut self, handle: ConnectionHandle) -> bool {
        match self.members.entry(handle.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
        }
    }

    /// Removes a handle. Idempotent: removing an absent id returns `None`.
    pub fn remove(&mut self, id: ConnectionId) -> Option<ConnectionHandle> {
        self.members.remove(&id)
    }

    /// Returns `true` if `id` is currently a member.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of current members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no connections are registered.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fans one frame out to every member, including the sender if it is
    /// still registered.
    ///
    /// A failed enqueue means the transport side is gone; those members
    /// are pruned on the spot, equivalent to them closing. Returns the
    /// number of members the frame was delivered to.
    pub fn broadcast(&mut self, payload: &Payload) -> usize {
        self.members.retain(|_, handle| handle.send(payload.clone()));
        self.members.len()
    }
}
