//! Operations for model-based testing.
//!
//! Operations represent the user-facing command surface of one session.
//! They are generated randomly and applied to both the model and the real
//! implementation.

use arbitrary::Arbitrary;

/// Client identifier (0-indexed into the world's session fleet).
pub type ClientId = u8;

/// Deterministic username for a client.
///
/// Client 0 gets the reserved administrator name so that random operation
/// sequences exercise the moderation path.
pub fn client_name(id: ClientId) -> String {
    if id == 0 { "admin".to_owned() } else { format!("user{id}") }
}

/// Operations that can be applied to the system.
///
/// Each operation targets one client's session. Operations are small and
/// composable so proptest can explore interesting interleavings.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Client submits its deterministic username.
    Join {
        /// Client performing the operation.
        client_id: ClientId,
    },

    /// Client submits the compose box (targets its active conversation).
    SendMessage {
        /// Client sending the message.
        client_id: ClientId,
        /// Message content.
        content: SmallMessage,
    },

    /// Client opens a private conversation with another client.
    OpenChat {
        /// Client performing the operation.
        client_id: ClientId,
        /// Counterparty, by client id.
        target_id: ClientId,
    },

    /// Client switches back to the public conversation.
    SwitchToPublic {
        /// Client performing the operation.
        client_id: ClientId,
    },

    /// Client asks to kick another client.
    Kick {
        /// Client performing the operation.
        client_id: ClientId,
        /// Kick target, by client id.
        target_id: ClientId,
    },
}

/// Small message content for testing.
///
/// Compact representation so test cases stay small while still exercising
/// whitespace rejection and distinct bodies.
#[derive(Debug, Clone, Arbitrary)]
pub struct SmallMessage {
    /// Content seed.
    pub seed: u8,
    /// Shape selector (one value maps to whitespace-only content).
    pub shape: u8,
}

impl SmallMessage {
    /// Expand to the actual compose text.
    pub fn to_text(&self) -> String {
        match self.shape % 4 {
            0 => String::from("   "),
            1 => format!("m{}", self.seed),
            2 => format!("hello {}", self.seed),
            _ => format!("  padded {} ", self.seed),
        }
    }
}
