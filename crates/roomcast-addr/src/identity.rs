//! Room identifiers and the rules for producing them.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::AddrError;

/// Maximum length of a client-chosen room name, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Length of the hex display form of a [`RoomIdentifier`].
pub const HEX_LEN: usize = 64;

/// The stable internal identity of a room.
///
/// 32 bytes, displayed as 64 lowercase hex characters. Two disjoint
/// namespaces share this type, split on the top bit of byte 0:
///
/// - minted identifiers ([`mint_unique`]) have the bit clear
/// - name-derived identifiers have the bit set
///
/// The split guarantees an identifier minted by the server can never
/// collide with one derived from a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomIdentifier([u8; 32]);

impl RoomIdentifier {
    /// Returns the raw identity bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` if this identity was derived from a room name.
    pub fn is_derived(&self) -> bool {
        self.0[0] & 0x80 != 0
    }
}

impl fmt::Display for RoomIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for RoomIdentifier {
    type Err = AddrError;

    /// Parses exactly 64 lowercase hex characters. Anything else —
    /// uppercase, wrong length, non-hex — is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_hex64(s) {
            return Err(AddrError::InvalidToken);
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            bytes[i] = (hex_val(chunk[0]) << 4) | hex_val(chunk[1]);
        }
        Ok(Self(bytes))
    }
}

/// Mints a fresh opaque room identifier.
///
/// Globally unique (256 bits of entropy less the namespace bit) and never
/// equal to any name-derived identity. Entropy exhaustion aborts inside
/// the OS RNG rather than surfacing as a recoverable error.
pub fn mint_unique() -> RoomIdentifier {
    let mut bytes: [u8; 32] = rand::rng().random();
    bytes[0] &= 0x7f;
    RoomIdentifier(bytes)
}

/// Resolves a room path token to an internal identity.
///
/// A token matching `^[0-9a-f]{64}$` is taken verbatim as an opaque
/// identifier — no existence check, unknown identifiers simply name rooms
/// nobody has touched yet. Any other token is treated as a room name and
/// derived deterministically, provided it is non-empty and at most
/// [`MAX_NAME_LEN`] characters.
pub fn resolve(token: &str) -> Result<RoomIdentifier, AddrError> {
    if is_hex64(token) {
        return token.parse();
    }
    if token.is_empty() {
        return Err(AddrError::InvalidToken);
    }
    if token.chars().count() > MAX_NAME_LEN {
        return Err(AddrError::NameTooLong);
    }
    Ok(derive_from_name(token))
}

/// Derives the stable identity for a room name. Same name, same identity,
/// for the lifetime of the scheme.
fn derive_from_name(name: &str) -> RoomIdentifier {
    let mut bytes: [u8; 32] = Sha256::digest(name.as_bytes()).into();
    bytes[0] |= 0x80;
    RoomIdentifier(bytes)
}

fn is_hex64(s: &str) -> bool {
    s.len() == HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        _ => b - b'a' + 10,
    }
}
