//! Client-to-server events.

use serde::{Deserialize, Serialize};

use crate::ConnectionId;

/// Events emitted by the client.
///
/// All emissions are fire-and-forget: no acknowledgement is awaited and no
/// response correlates back to the command that triggered one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Outbound {
    /// Register (or re-register after reconnect) the session's identity.
    SetUsername {
        /// The chosen display name, already trimmed.
        username: String,
    },

    /// Ask the server to confirm administrator privilege.
    ///
    /// A demo convenience hook - privilege is only real once the server
    /// answers with `adminStatus(true)`.
    RequestAdminStatus {
        /// The requesting display name.
        username: String,
    },

    /// Broadcast a message to the public conversation.
    SendMessage {
        /// Sender's display name.
        username: String,
        /// Message body.
        message: String,
    },

    /// Send a one-to-one message.
    SendPrivateMessage {
        /// Sender's display name.
        username: String,
        /// Recipient's display name.
        to: String,
        /// Message body.
        message: String,
    },

    /// Ask the server to disconnect another participant.
    #[serde(rename_all = "camelCase")]
    KickUser {
        /// Connection of the participant to remove, from the last
        /// presence snapshot.
        target_connection_id: ConnectionId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_username_wire_shape() {
        let event = Outbound::SetUsername { username: "alice".to_owned() };
        let json = serde_json::to_string(&event).expect("encode");
        assert_eq!(json, r#"{"event":"setUsername","data":{"username":"alice"}}"#);
    }

    #[test]
    fn kick_user_uses_target_connection_id_field_name() {
        let event = Outbound::KickUser { target_connection_id: ConnectionId::from("id7") };
        let json = serde_json::to_string(&event).expect("encode");
        assert_eq!(json, r#"{"event":"kickUser","data":{"targetConnectionId":"id7"}}"#);
    }

    #[test]
    fn send_private_message_wire_shape() {
        let event = Outbound::SendPrivateMessage {
            username: "alice".to_owned(),
            to: "bob".to_owned(),
            message: "hey".to_owned(),
        };
        let json = serde_json::to_string(&event).expect("encode");
        assert_eq!(
            json,
            concat!(
                r#"{"event":"sendPrivateMessage","data":"#,
                r#"{"username":"alice","to":"bob","message":"hey"}}"#,
            )
        );
    }
}
