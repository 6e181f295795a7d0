//! Session events and actions.
//!
//! Both channel deliveries and user commands flow through the same
//! [`SessionEvent`] enum, which is what guarantees a single ordered stream
//! of state transitions.

use chatbox_proto::{Inbound, Outbound};

/// Events fed into the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An event delivered by the channel, in delivery order.
    Channel(Inbound),

    /// The channel adapter re-established its connection.
    ///
    /// A joined session must re-register its identity so the server can
    /// rebuild presence; the next `users` snapshot is the new ground truth.
    Reconnected,

    /// User submitted a username on the pre-join screen.
    SubmitUsername {
        /// Raw input text; trimmed before use.
        username: String,
    },

    /// User submitted the compose box.
    ///
    /// The target is the active conversation at the moment of dispatch.
    SendMessage {
        /// Raw compose text.
        body: String,
    },

    /// User opened a private conversation with another participant.
    OpenPrivateChat {
        /// The counterparty's username.
        username: String,
    },

    /// User switched back to the public conversation.
    SwitchToPublic,

    /// Admin asked to kick a participant.
    KickUser {
        /// Username of the participant to kick.
        username: String,
    },

    /// User toggled the light/dark theme.
    ToggleTheme,
}

/// Actions produced by the session for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Emit an outbound event on the channel. Fire-and-forget.
    Emit(Outbound),

    /// The server terminated the session; state has been reset to pre-join.
    ///
    /// The presentation layer should tell the user. Not retryable from
    /// within the session.
    Kicked,
}
