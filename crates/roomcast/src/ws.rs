//! Per-connection plumbing between an upgraded socket and a room actor.
//!
//! Each accepted connection gets two halves: the reader loop runs in the
//! upgrade task and forwards inbound frames to the room; a writer task
//! drains the connection's outbound queue into the socket sink. The room
//! never touches the socket directly — its whole view of the connection
//! is the [`ConnectionHandle`] it holds in its registry.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use roomcast_room::{ConnectionHandle, ConnectionId, Outbound, Payload, RoomHandle};
use serde::Serialize;
use tokio::sync::mpsc;

/// Close code for a connection dying to an internal failure.
const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// JSON payload delivered over a doomed connection before the 1011 close.
#[derive(Debug, Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Runs one relay connection from upgrade to close.
pub(crate) async fn run_connection(mut socket: WebSocket, room: RoomHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(tx);
    let conn = handle.id();

    // The handshake already succeeded, so a registration failure has to
    // be delivered over the socket itself: a JSON error, then 1011.
    if let Err(e) = room.connect(handle).await {
        tracing::error!(room = %room.room_id(), %conn, error = %e, "failed to register connection");
        send_error_and_close(&mut socket, &e.to_string()).await;
        return;
    }
    tracing::debug!(room = %room.room_id(), %conn, "relay connection established");

    let (sink, stream) = socket.split();
    let writer = tokio::spawn(write_outbound(sink, rx));

    read_inbound(stream, &room, conn).await;

    // The peer closed or errored: deregister. The actor drops the handle,
    // which lets the writer flush the close frame and exit.
    if room.disconnect(conn).await.is_err() {
        writer.abort();
    }
    let _ = writer.await;
}

/// Forwards inbound frames to the room until the peer goes away.
async fn read_inbound(mut stream: SplitStream<WebSocket>, room: &RoomHandle, conn: ConnectionId) {
    while let Some(msg) = stream.next().await {
        let payload = match msg {
            Ok(Message::Text(text)) => Payload::Text(text.to_string()),
            Ok(Message::Binary(bytes)) => Payload::Binary(bytes.to_vec()),
            // Ping/Pong are answered by the protocol layer.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(room = %room.room_id(), %conn, error = %e, "socket error");
                break;
            }
        };
        if room.message(conn, payload).await.is_err() {
            break;
        }
    }
}

/// Drains the outbound queue into the socket sink.
async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(out) = rx.recv().await {
        let result = match out {
            Outbound::Frame(Payload::Text(text)) => sink.send(Message::Text(text.into())).await,
            Outbound::Frame(Payload::Binary(bytes)) => {
                sink.send(Message::Binary(bytes.into())).await
            }
            Outbound::Close { code, reason } => {
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: reason.into(),
                    })))
                    .await;
                break;
            }
        };
        if result.is_err() {
            // Peer is gone; the room prunes this handle on its next send.
            break;
        }
    }
}

/// Best-effort error delivery on a connection that is about to die.
async fn send_error_and_close(socket: &mut WebSocket, error: &str) {
    let payload = serde_json::to_string(&ErrorPayload { error })
        .unwrap_or_else(|_| r#"{"error":"internal failure"}"#.to_string());
    let _ = socket.send(Message::Text(payload.into())).await;
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: CLOSE_INTERNAL_ERROR,
            reason: "internal failure".into(),
        })))
        .await;
}
