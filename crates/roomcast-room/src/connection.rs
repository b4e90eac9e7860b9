//! Connection handles: the room-facing side of one client's transport.
//!
//! A [`ConnectionHandle`] is not the socket. It is the sending half of the
//! connection's outbound queue plus a process-unique id; the transport
//! side of the system drains the queue into the real socket. This keeps
//! every send fire-and-forget from the room's point of view — a slow or
//! dead peer can never block a broadcast.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A relayed frame. Forwarded to every member of a room unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// What a room can push toward one connection's transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A broadcast frame.
    Frame(Payload),
    /// Close the underlying transport.
    Close { code: u16, reason: String },
}

/// Channel sender draining into one connection's transport.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Handle to one client's live transport.
///
/// Owned exclusively by the registry of the room that accepted the
/// connection; destroyed on close or error; never migrates between rooms.
#[derive(Debug)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: OutboundSender,
}

impl ConnectionHandle {
    /// Wraps the sending half of a connection's outbound queue, assigning
    /// a fresh process-unique id.
    pub fn new(sender: OutboundSender) -> Self {
        Self {
            id: ConnectionId::next(),
            sender,
        }
    }

    /// Returns this connection's id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueues a frame. Returns `false` if the transport side is gone,
    /// which callers treat as the connection having closed.
    pub fn send(&self, payload: Payload) -> bool {
        self.sender.send(Outbound::Frame(payload)).is_ok()
    }

    /// Asks the transport to close. Safe to call repeatedly; silently a
    /// no-op if the transport is already gone.
    pub fn close(&self, code: u16, reason: &str) {
        let _ = self.sender.send(Outbound::Close {
            code,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = ConnectionHandle::new(tx.clone());
        let b = ConnectionHandle::new(tx);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_connection_id_display() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        let text = handle.id().to_string();
        assert!(text.starts_with("conn-"), "was {text:?}");
    }

    #[test]
    fn test_send_reports_dead_transport() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        assert!(handle.send(Payload::Text("up".into())));
        drop(rx);
        assert!(!handle.send(Payload::Text("down".into())));
    }

    #[test]
    fn test_close_is_repeatable() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        handle.close(1000, "done");
        handle.close(1000, "done");
        assert!(matches!(rx.try_recv(), Ok(Outbound::Close { code: 1000, .. })));
        drop(rx);
        // Transport gone: still a no-op, never a panic.
        handle.close(1000, "done");
    }
}
