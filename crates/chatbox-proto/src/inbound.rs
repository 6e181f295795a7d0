//! Server-to-client events.

use serde::{Deserialize, Serialize};

use crate::ConnectionId;

/// One roster entry in a presence snapshot.
///
/// The server sends the complete roster on every presence change; entries
/// are never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Display name, unique within the roster.
    pub username: String,
    /// Connection identifier for addressing moderation commands.
    pub id: ConnectionId,
}

/// Events delivered by the channel.
///
/// Applied strictly in delivery order - the client performs no reordering
/// and no deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Inbound {
    /// Public broadcast message.
    Message {
        /// Sender's display name.
        username: String,
        /// Message body.
        message: String,
    },

    /// One-to-one message, echoed to both parties.
    ///
    /// `from_self` is the authoritative "this is your own echo" marker.
    /// Sender-name comparison is NOT used because a username string can
    /// collide with channel-assigned metadata.
    #[serde(rename_all = "camelCase")]
    PrivateMessage {
        /// Sender's display name.
        from: String,
        /// Recipient's display name.
        to: String,
        /// Message body.
        message: String,
        /// True when this event is the echo of the local user's own send.
        from_self: bool,
    },

    /// Complete presence snapshot. Replaces the roster wholesale.
    Users(Vec<Presence>),

    /// Server confirmation (or revocation) of administrator privilege.
    AdminStatus(bool),

    /// Forced termination - the session must reset to its pre-join state.
    Kicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_wire_shape() {
        let json = r#"{"event":"message","data":{"username":"alice","message":"hi"}}"#;
        let event: Inbound = serde_json::from_str(json).expect("decode");
        assert_eq!(
            event,
            Inbound::Message { username: "alice".to_owned(), message: "hi".to_owned() }
        );
    }

    #[test]
    fn private_message_uses_from_self_field_name() {
        let json = concat!(
            r#"{"event":"privateMessage","data":"#,
            r#"{"from":"bob","to":"alice","message":"hey","fromSelf":false}}"#,
        );
        let event: Inbound = serde_json::from_str(json).expect("decode");
        match event {
            Inbound::PrivateMessage { from, to, from_self, .. } => {
                assert_eq!(from, "bob");
                assert_eq!(to, "alice");
                assert!(!from_self);
            },
            other => panic!("expected private message, got {other:?}"),
        }
    }

    #[test]
    fn users_snapshot_is_an_array() {
        let json = r#"{"event":"users","data":[{"username":"alice","id":"sock-1"}]}"#;
        let event: Inbound = serde_json::from_str(json).expect("decode");
        assert_eq!(
            event,
            Inbound::Users(vec![Presence {
                username: "alice".to_owned(),
                id: ConnectionId::from("sock-1"),
            }])
        );
    }

    #[test]
    fn kicked_carries_no_payload() {
        let event: Inbound = serde_json::from_str(r#"{"event":"kicked"}"#).expect("decode");
        assert_eq!(event, Inbound::Kicked);
    }

    #[test]
    fn admin_status_is_a_bare_bool() {
        let event: Inbound =
            serde_json::from_str(r#"{"event":"adminStatus","data":true}"#).expect("decode");
        assert_eq!(event, Inbound::AdminStatus(true));
    }
}
