//! JSON codec for wire events.
//!
//! One event per frame. The transport below this layer (websocket frames,
//! socket.io packets) is the channel adapter's concern.

use crate::{Inbound, Outbound, error::ProtoError};

/// Encode an outbound event to its JSON frame.
pub fn encode_outbound(event: &Outbound) -> Result<Vec<u8>, ProtoError> {
    serde_json::to_vec(event).map_err(|e| ProtoError::Encode { reason: e.to_string() })
}

/// Decode an inbound event from a JSON frame.
///
/// # Errors
///
/// Returns [`ProtoError::MalformedInbound`] for anything that is not a
/// well-formed known event - unknown event tags included, since the contract
/// is closed.
pub fn decode_inbound(bytes: &[u8]) -> Result<Inbound, ProtoError> {
    serde_json::from_slice(bytes).map_err(|e| ProtoError::MalformedInbound { reason: e.to_string() })
}
