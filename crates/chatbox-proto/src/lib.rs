//! Wire contract for the chatbox channel.
//!
//! The channel is a named-event JSON transport: every frame is an object
//! with an `event` tag and an optional `data` payload. The field names in
//! this crate ARE the contract the server and client agree on - renaming
//! anything here is a protocol break, not a refactor.
//!
//! # Components
//!
//! - [`Inbound`]: events delivered by the server
//! - [`Outbound`]: events emitted by the client
//! - [`codec`]: JSON encode/decode for both directions

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod error;
mod inbound;
mod outbound;

pub use codec::{decode_inbound, encode_outbound};
pub use error::ProtoError;
pub use inbound::{Inbound, Presence};
pub use outbound::Outbound;

use serde::{Deserialize, Serialize};

/// Opaque server-assigned connection identifier.
///
/// Used only to address moderation commands back at the server. The client
/// never interprets the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
