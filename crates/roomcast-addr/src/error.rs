//! Error types for room addressing.

use crate::MAX_NAME_LEN;

/// Errors that can occur while resolving a room path token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    /// The token is not a usable room reference (empty, or a malformed
    /// identifier passed to a direct parse).
    #[error("invalid room token")]
    InvalidToken,

    /// A client-chosen room name exceeded the name length limit.
    #[error("room name exceeds {MAX_NAME_LEN} characters")]
    NameTooLong,
}
