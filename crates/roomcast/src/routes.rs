//! The HTTP front door: path routing and responses.
//!
//! Everything here is a thin shell around addressing and the room layer.
//! Addressing failures surface as 404-class responses; a missing upgrade
//! on the websocket endpoint surfaces as 426. Nothing in this module can
//! take the process down.

use std::sync::Arc;

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use roomcast_addr::{mint_unique, resolve};
use roomcast_room::RoomDirectory;

use crate::error::RoomcastError;
use crate::ws;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) directory: Arc<RoomDirectory>,
}

/// Usage text returned for room-local paths the relay doesn't know.
const ROOM_USAGE: &str = "This room serves two endpoints:\n\
  /websocket              open a relay connection (WebSocket upgrade required)\n\
  /getCurrentConnections  number of clients currently connected\n";

/// Builds the full router for the relay.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/room", post(create_room))
        .route("/api/room/{token}", any(room_root))
        .route("/api/room/{token}/{*rest}", any(room_request))
        .fallback(not_found)
        .with_state(state)
}

/// `POST /api/room` — mint a fresh opaque room identifier.
///
/// The identifier is not bound to any room state yet; the room comes into
/// existence when someone first connects to it. The CORS header lets
/// browser clients on other origins read the identifier.
async fn create_room() -> Response {
    let id = mint_unique();
    tracing::info!(room = %id, "room identifier minted");
    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        id.to_string(),
    )
        .into_response()
}

/// `/api/room/{token}` with no room-local path: validate the token, then
/// point the caller at the endpoints that exist.
async fn room_root(Path(token): Path<String>) -> Result<Response, RoomcastError> {
    resolve(&token)?;
    Ok(ROOM_USAGE.into_response())
}

/// `/api/room/{token}/{rest}` — resolve the token, dispatch on the
/// room-local path.
async fn room_request(
    State(state): State<AppState>,
    Path((token, rest)): Path<(String, String)>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, RoomcastError> {
    let id = resolve(&token)?;

    match rest.as_str() {
        "websocket" => {
            // Plain requests to the websocket endpoint are a client
            // error, not an extractor detail.
            let upgrade = upgrade.map_err(|_| RoomcastError::UpgradeRequired)?;
            let room = state.directory.get_or_spawn(id);
            Ok(upgrade.on_upgrade(move |socket| ws::run_connection(socket, room)))
        }
        "getCurrentConnections" => {
            let room = state.directory.get_or_spawn(id);
            let count = room.count().await?;
            Ok(connection_count_text(count).into_response())
        }
        _ => Ok(ROOM_USAGE.into_response()),
    }
}

/// Fallback for unrecognized top-level paths.
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Human-readable connection count, singular when there is exactly one.
fn connection_count_text(count: usize) -> String {
    if count == 1 {
        "There is 1 WebSocket client connected to this room.".to_string()
    } else {
        format!("There are {count} WebSocket clients connected to this room.")
    }
}
