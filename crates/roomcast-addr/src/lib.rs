//! Room addressing for Roomcast.
//!
//! This crate maps the room reference a client puts in a URL onto the
//! stable internal identity the rest of the system keys on:
//!
//! - **Minted identifiers** ([`mint_unique`]) — 32 random bytes the server
//!   hands out, shown as 64 lowercase hex characters. Opaque and globally
//!   unique.
//! - **Name-derived identifiers** ([`resolve`]) — a client-chosen name of
//!   up to [`MAX_NAME_LEN`] characters, hashed down to the same 32-byte
//!   shape. The same name always resolves to the same identity.
//!
//! The two namespaces are disjoint by construction, so a minted identifier
//! can never collide with one derived from a name.
//!
//! Addressing knows nothing about rooms being live or empty — an unknown
//! identifier is still a valid identity, and simply names a room nobody
//! has touched yet.

mod error;
mod identity;

pub use error::AddrError;
pub use identity::{HEX_LEN, MAX_NAME_LEN, RoomIdentifier, mint_unique, resolve};
