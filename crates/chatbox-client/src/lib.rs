//! Chatbox client.
//!
//! Action-based session state machine for a realtime chat room. Manages one
//! user-facing session: identity, presence roster, public and private
//! conversation histories, unread counters, and the admin/kicked lifecycle.
//!
//! # Architecture
//!
//! The session is a pure state machine that:
//! - Receives events from the caller (channel events, user commands)
//! - Produces actions for the caller to execute (emit outbound events,
//!   surface a forced termination)
//! - Never performs I/O itself
//!
//! Inbound channel events and user commands are serialized into one ordered
//! stream of [`SessionEvent`]s; no two reducer applications run
//! concurrently. The [`SessionDriver`] provides that serialization on top of
//! an injected [`ChannelAdapter`].
//!
//! # Components
//!
//! - [`Session`]: the state machine (state model, reducer, dispatcher)
//! - [`SessionEvent`]: events fed into the session
//! - [`SessionAction`]: actions produced by the session
//! - [`SessionDriver`]: async loop tying a session to a channel adapter

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod event;
mod session;

pub use chatbox_proto::{ConnectionId, Inbound, Outbound, Presence};
pub use driver::{ChannelAdapter, ChannelInput, CommandSender, SessionDriver};
pub use error::DriverError;
pub use event::{SessionAction, SessionEvent};
pub use session::{
    ADMIN_USERNAME, Conversation, Participant, PrivateEntry, PublicEntry, Session, SessionPhase,
    SYSTEM_SENDER, Theme,
};
