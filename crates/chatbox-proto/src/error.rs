//! Codec error types.

use thiserror::Error;

/// Errors from encoding or decoding wire events.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Inbound bytes were not a well-formed event object.
    #[error("malformed inbound event: {reason}")]
    MalformedInbound {
        /// Description of the decode failure.
        reason: String,
    },

    /// An outbound event could not be serialized.
    #[error("encode failed: {reason}")]
    Encode {
        /// Description of the encode failure.
        reason: String,
    },
}
