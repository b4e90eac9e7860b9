//! Room actor: an isolated Tokio task that owns one room's membership.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The channel is the serialization boundary —
//! no two operations on the same room ever run concurrently, which makes
//! every registry mutation linearizable without locking. Rooms never
//! share state with each other.

use roomcast_addr::RoomIdentifier;
use tokio::sync::{mpsc, oneshot};

use crate::{ConnectionHandle, ConnectionId, Payload, Registry, RoomError};

/// Close code used when the room removes a connection.
pub const CLOSE_CODE: u16 = 1000;

/// Close reason paired with [`CLOSE_CODE`].
pub const CLOSE_REASON: &str = "room connection closed";

/// Command channel capacity per room.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel — the caller
/// sends a command and waits for the response on it. Commands without one
/// are fire-and-forget.
pub(crate) enum RoomCommand {
    /// Register an accepted connection.
    Connect {
        handle: ConnectionHandle,
        reply: oneshot::Sender<()>,
    },

    /// Relay a frame from a member to every member.
    Inbound {
        from: ConnectionId,
        payload: Payload,
    },

    /// Remove a connection and close its transport.
    Disconnect { id: ConnectionId },

    /// Request the current member count.
    Count { reply: oneshot::Sender<usize> },
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. The
/// [`RoomDirectory`](crate::RoomDirectory) holds one of these per room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    id: RoomIdentifier,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's identity.
    pub fn room_id(&self) -> RoomIdentifier {
        self.id
    }

    /// Registers `handle` with the room.
    ///
    /// Resolves once the registry insertion has happened, so a `count`
    /// issued afterwards is guaranteed to see the new member.
    pub async fn connect(&self, handle: ConnectionHandle) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Connect {
                handle,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.id))
    }

    /// Relays a frame from `from` to every member (fire-and-forget).
    pub async fn message(&self, from: ConnectionId, payload: Payload) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Inbound { from, payload })
            .await
            .map_err(|_| RoomError::Unavailable(self.id))
    }

    /// Removes a connection from the room (fire-and-forget, idempotent).
    pub async fn disconnect(&self, id: ConnectionId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { id })
            .await
            .map_err(|_| RoomError::Unavailable(self.id))
    }

    /// Requests the current member count.
    pub async fn count(&self) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Count { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.id))
    }

    /// Returns `true` if `other` addresses the same actor instance.
    pub fn same_actor(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    id: RoomIdentifier,
    registry: Registry,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until every handle to the
    /// room is gone.
    async fn run(mut self) {
        tracing::info!(room = %self.id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Connect { handle, reply } => {
                    self.handle_connect(handle);
                    let _ = reply.send(());
                }
                RoomCommand::Inbound { from, payload } => {
                    self.handle_inbound(from, payload);
                }
                RoomCommand::Disconnect { id } => {
                    self.handle_disconnect(id);
                }
                RoomCommand::Count { reply } => {
                    let _ = reply.send(self.registry.len());
                }
            }
        }

        tracing::info!(room = %self.id, "room actor stopped");
    }

    fn handle_connect(&mut self, handle: ConnectionHandle) {
        let conn = handle.id();
        if !self.registry.insert(handle) {
            tracing::warn!(room = %self.id, %conn, "duplicate connect ignored");
            return;
        }
        tracing::info!(
            room = %self.id,
            %conn,
            members = self.registry.len(),
            "connection joined"
        );
    }

    fn handle_inbound(&mut self, from: ConnectionId, payload: Payload) {
        if !self.registry.contains(from) {
            // Frame raced past the sender's removal; drop it.
            tracing::debug!(room = %self.id, conn = %from, "frame from closed connection dropped");
            return;
        }

        let before = self.registry.len();
        let delivered = self.registry.broadcast(&payload);
        if delivered < before {
            tracing::debug!(
                room = %self.id,
                pruned = before - delivered,
                "dead connections pruned during broadcast"
            );
        }
    }

    fn handle_disconnect(&mut self, id: ConnectionId) {
        let Some(handle) = self.registry.remove(id) else {
            // Already gone; removal is idempotent.
            return;
        };
        handle.close(CLOSE_CODE, CLOSE_REASON);
        tracing::info!(
            room = %self.id,
            conn = %id,
            members = self.registry.len(),
            "connection left"
        );
    }
}

/// Spawns a new room actor task and returns a handle to communicate
/// with it.
pub(crate) fn spawn_room(id: RoomIdentifier) -> RoomHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = RoomActor {
        id,
        registry: Registry::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { id, sender: tx }
}
