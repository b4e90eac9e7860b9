//! Error types for the room layer.

use roomcast_addr::RoomIdentifier;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's command channel is closed (the actor is gone) or a
    /// reply was dropped mid-operation.
    #[error("room {0} is unavailable")]
    Unavailable(RoomIdentifier),
}
