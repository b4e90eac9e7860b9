//! Room lifecycle for Roomcast.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! set of live connections for that room. Frames relayed into the room
//! fan out to every member, including the sender.
//!
//! # Key types
//!
//! - [`RoomDirectory`] — maps room identities to live actors, spawning
//!   each actor exactly once
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Registry`] — the membership set an actor owns
//! - [`ConnectionHandle`] — the room-facing side of one client's transport

mod connection;
mod directory;
mod error;
mod registry;
mod room;

pub use connection::{ConnectionHandle, ConnectionId, Outbound, OutboundSender, Payload};
pub use directory::RoomDirectory;
pub use error::RoomError;
pub use registry::Registry;
pub use room::{CLOSE_CODE, CLOSE_REASON, RoomHandle};
