//! Unified error type for the Roomcast server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roomcast_addr::AddrError;
use roomcast_room::RoomError;

/// Top-level error for the front door and server lifecycle.
///
/// Addressing and room errors convert automatically via `#[from]`, and the
/// `IntoResponse` impl turns every variant into a client-visible response —
/// no request error ever escalates beyond its own request.
#[derive(Debug, thiserror::Error)]
pub enum RoomcastError {
    /// A room addressing error (bad token, name too long).
    #[error(transparent)]
    Addr(#[from] AddrError),

    /// A room layer error (actor unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The websocket endpoint was hit without a WebSocket upgrade.
    #[error("websocket upgrade required")]
    UpgradeRequired,

    /// Binding or serving the listener failed.
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for RoomcastError {
    fn into_response(self) -> Response {
        match self {
            Self::Addr(AddrError::NameTooLong) => {
                (StatusCode::NOT_FOUND, "Name too long").into_response()
            }
            Self::Addr(AddrError::InvalidToken) => {
                (StatusCode::NOT_FOUND, "Invalid room token").into_response()
            }
            Self::UpgradeRequired => (
                StatusCode::UPGRADE_REQUIRED,
                "This endpoint expects a WebSocket upgrade (Upgrade: websocket)",
            )
                .into_response(),
            Self::Room(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("internal error: {self}"),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing_errors_map_to_not_found() {
        let resp = RoomcastError::from(AddrError::NameTooLong).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = RoomcastError::from(AddrError::InvalidToken).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_upgrade_maps_to_426() {
        let resp = RoomcastError::UpgradeRequired.into_response();
        assert_eq!(resp.status(), StatusCode::UPGRADE_REQUIRED);
    }
}
