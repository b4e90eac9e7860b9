//! # Roomcast
//!
//! A room-addressed WebSocket relay. Clients resolve a room name or an
//! opaque identifier to a per-room actor, and every frame a client sends
//! is fanned out to every connection currently registered with that room,
//! the sender included.
//!
//! The layers, bottom up:
//!
//! - `roomcast-addr` — identity minting and token resolution
//! - `roomcast-room` — connection registry and room actors
//! - this crate — the HTTP front door and per-connection plumbing
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use roomcast::RoomcastServer;
//!
//! # async fn run() -> Result<(), roomcast::RoomcastError> {
//! let server = RoomcastServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod routes;
mod server;
mod ws;

pub use error::RoomcastError;
pub use server::{RoomcastServer, RoomcastServerBuilder};
