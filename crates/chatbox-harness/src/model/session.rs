//! Model session.
//!
//! Obviously-correct reimplementation of the session data model: plain maps
//! and vectors, no action plumbing. Command side effects (what gets emitted
//! on the channel) live in [`super::ModelWorld`], which routes them through
//! the model server.

use std::collections::BTreeMap;

use chatbox_proto::{Inbound, Presence};

/// One stored message: `(sender, body, is_system)` for public entries,
/// `(body, from_self)` for private entries.
pub type PublicRecord = (String, String, bool);
/// Private record: `(body, from_self)`.
pub type PrivateRecord = (String, bool);

/// Reference session state.
#[derive(Debug, Clone, Default)]
pub struct ModelSession {
    /// Identity once joined.
    pub username: Option<String>,
    /// Public history.
    pub public: Vec<PublicRecord>,
    /// Private histories by counterparty.
    pub private: BTreeMap<String, Vec<PrivateRecord>>,
    /// Unread counts by counterparty.
    pub unread: BTreeMap<String, u32>,
    /// Last presence snapshot.
    pub roster: Vec<Presence>,
    /// Active private counterparty; `None` means the public conversation.
    pub active: Option<String>,
    /// Confirmed admin privilege.
    pub is_admin: bool,
}

impl ModelSession {
    /// Create a pristine pre-join session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session has joined.
    pub fn joined(&self) -> bool {
        self.username.is_some()
    }

    /// Submit a username. Returns the accepted (trimmed) name, or `None`
    /// when the submission is a no-op.
    pub fn submit_username(&mut self, raw: &str) -> Option<String> {
        if self.joined() {
            return None;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.username = Some(trimmed.to_owned());
        Some(trimmed.to_owned())
    }

    /// Open a private conversation. No-op when targeting self.
    pub fn open_chat(&mut self, counterparty: &str) {
        if self.username.as_deref() == Some(counterparty) {
            return;
        }
        self.private.entry(counterparty.to_owned()).or_default();
        self.unread.insert(counterparty.to_owned(), 0);
        self.active = Some(counterparty.to_owned());
    }

    /// Switch to the public conversation.
    pub fn switch_to_public(&mut self) {
        self.active = None;
    }

    /// Whether a username is in the current roster.
    pub fn in_roster(&self, username: &str) -> bool {
        self.roster.iter().any(|p| p.username == username)
    }

    /// Apply one inbound channel event.
    pub fn apply_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Message { username, message } => {
                let is_system = username == "System";
                self.public.push((username, message, is_system));
            },
            Inbound::PrivateMessage { from, to, message, from_self } => {
                let partner = if from_self { to } else { from };
                self.private.entry(partner.clone()).or_default().push((message, from_self));
                if self.active.as_deref() != Some(partner.as_str()) {
                    *self.unread.entry(partner).or_insert(0) += 1;
                }
            },
            Inbound::Users(snapshot) => {
                self.roster = snapshot;
            },
            Inbound::AdminStatus(granted) => {
                self.is_admin = granted;
            },
            Inbound::Kicked => {
                let _ = std::mem::take(self);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kicked_takes_everything_back_to_default() {
        let mut session = ModelSession::new();
        session.submit_username("alice");
        session.apply_inbound(Inbound::Message {
            username: "bob".to_owned(),
            message: "hi".to_owned(),
        });
        session.apply_inbound(Inbound::AdminStatus(true));

        session.apply_inbound(Inbound::Kicked);

        assert!(!session.joined());
        assert!(session.public.is_empty());
        assert!(!session.is_admin);
    }

    #[test]
    fn second_submission_is_a_no_op() {
        let mut session = ModelSession::new();
        assert_eq!(session.submit_username(" alice "), Some("alice".to_owned()));
        assert_eq!(session.submit_username("mallory"), None);
        assert_eq!(session.username.as_deref(), Some("alice"));
    }
}
