//! Driver error types.
//!
//! The session state machine itself is total: invalid local input is a
//! silent no-op by design. Failures only exist at the channel boundary.

use chatbox_proto::ProtoError;
use thiserror::Error;

/// Errors from driving a session against a channel adapter.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The channel adapter failed to send or receive.
    #[error("channel failure: {reason}")]
    Channel {
        /// Description of the transport failure.
        reason: String,
    },

    /// A wire frame could not be encoded or decoded.
    #[error("codec failure: {0}")]
    Codec(#[from] ProtoError),
}

impl DriverError {
    /// Wrap a transport-level failure.
    pub fn channel(reason: impl Into<String>) -> Self {
        Self::Channel { reason: reason.into() }
    }
}
