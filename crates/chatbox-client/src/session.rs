//! Session state machine.
//!
//! The `Session` merges inbound channel events and user commands into one
//! consistent local view: message history per conversation, presence roster,
//! unread counters, and the admin/kicked lifecycle. All transitions are
//! total - once a precondition holds the transition applies unconditionally,
//! and when a precondition fails the event is a silent no-op (the UI already
//! constrains those paths).

use std::collections::HashMap;

use chatbox_proto::{ConnectionId, Inbound, Outbound, Presence};

use crate::event::{SessionAction, SessionEvent};

/// Sender name reserved for system notices in the public conversation.
pub const SYSTEM_SENDER: &str = "System";

/// Username that triggers an admin-status request on join.
///
/// A demo convenience hook, not a security control: the string match only
/// sends the request, and privilege is real only once the server answers
/// with `adminStatus(true)`.
pub const ADMIN_USERNAME: &str = "admin";

/// Session lifecycle phase.
///
/// `PreJoin -> Joined` on a successful username submission, back to
/// `PreJoin` only on a `kicked` event. No other transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity submitted yet.
    PreJoin,
    /// Identity submitted and immutable for the rest of the session.
    Joined,
}

/// Light/dark UI affinity. Not session state - it survives a kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Which message sequence is rendered and whose unread counter resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversation {
    /// The shared room.
    Public,
    /// A one-to-one exchange, identified by the counterparty's username.
    Private(String),
}

/// One online participant, as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name, unique within the roster.
    pub username: String,
    /// Back-reference for addressing moderation commands.
    pub connection_id: ConnectionId,
}

/// One entry in the public conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEntry {
    /// Sender's display name.
    pub sender: String,
    /// Message body.
    pub body: String,
    /// True for system notices (kick announcements and the like).
    pub is_system: bool,
}

/// One entry in a private conversation.
///
/// The counterparty is the map key, so both sides of the exchange live in
/// one sequence; `from_self` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateEntry {
    /// Message body.
    pub body: String,
    /// True when the local user authored this entry.
    pub from_self: bool,
}

/// Session state machine.
///
/// Owns the complete local view for one connection's lifetime. The
/// presentation layer is a read-only observer of the accessor surface;
/// mutation happens only through [`Session::handle`].
#[derive(Debug, Clone)]
pub struct Session {
    /// Lifecycle phase.
    phase: SessionPhase,
    /// Identity, set once per session. `None` before join.
    username: Option<String>,
    /// Presence roster, replaced wholesale on each `users` snapshot.
    roster: Vec<Participant>,
    /// Username -> connection index rebuilt from the same snapshot.
    connection_ids: HashMap<String, ConnectionId>,
    /// Public conversation history, append-only.
    public: Vec<PublicEntry>,
    /// Private histories keyed by counterparty, append-only per key.
    private: HashMap<String, Vec<PrivateEntry>>,
    /// Unread counts per counterparty. Always 0 for the active conversation.
    unread: HashMap<String, u32>,
    /// The conversation currently rendered.
    active: Conversation,
    /// Granted only via explicit `adminStatus(true)`, never self-asserted.
    is_admin: bool,
    /// UI affinity, untouched by the session lifecycle.
    theme: Theme,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a pristine pre-join session.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::PreJoin,
            username: None,
            roster: Vec::new(),
            connection_ids: HashMap::new(),
            public: Vec::new(),
            private: HashMap::new(),
            unread: HashMap::new(),
            active: Conversation::Public,
            is_admin: false,
            theme: Theme::Light,
        }
    }

    /// Apply one event and return the actions the caller must execute.
    ///
    /// Events are applied strictly in the order they are passed in; the
    /// session never reorders or deduplicates.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Channel(inbound) => self.handle_channel(inbound),
            SessionEvent::Reconnected => self.handle_reconnected(),
            SessionEvent::SubmitUsername { username } => self.handle_submit_username(&username),
            SessionEvent::SendMessage { body } => self.handle_send_message(body),
            SessionEvent::OpenPrivateChat { username } => self.handle_open_private_chat(username),
            SessionEvent::SwitchToPublic => {
                self.active = Conversation::Public;
                vec![]
            },
            SessionEvent::KickUser { username } => self.handle_kick_user(&username),
            SessionEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                vec![]
            },
        }
    }

    fn handle_channel(&mut self, inbound: Inbound) -> Vec<SessionAction> {
        match inbound {
            Inbound::Message { username, message } => {
                let is_system = username == SYSTEM_SENDER;
                self.public.push(PublicEntry { sender: username, body: message, is_system });
                vec![]
            },
            Inbound::PrivateMessage { from, to, message, from_self } => {
                self.apply_private_message(from, to, message, from_self);
                vec![]
            },
            Inbound::Users(snapshot) => {
                self.apply_presence_snapshot(snapshot);
                vec![]
            },
            Inbound::AdminStatus(granted) => {
                if granted != self.is_admin {
                    tracing::info!(granted, "admin status changed");
                }
                self.is_admin = granted;
                vec![]
            },
            Inbound::Kicked => self.apply_kicked(),
        }
    }

    /// Append to the counterparty's sequence and bump its unread counter
    /// when that conversation is not on screen.
    fn apply_private_message(&mut self, from: String, to: String, body: String, from_self: bool) {
        // The self-flag is authoritative: an echo of our own send files
        // under the recipient, everything else under the sender.
        let partner = if from_self { to } else { from };

        self.private.entry(partner.clone()).or_default().push(PrivateEntry { body, from_self });

        if self.active != Conversation::Private(partner.clone()) {
            *self.unread.entry(partner).or_insert(0) += 1;
        }
    }

    /// Replace the roster with the server's latest snapshot. No merge: the
    /// snapshot is the only ground truth, including after a reconnect.
    fn apply_presence_snapshot(&mut self, snapshot: Vec<Presence>) {
        self.connection_ids = snapshot
            .iter()
            .map(|entry| (entry.username.clone(), entry.id.clone()))
            .collect();
        self.roster = snapshot
            .into_iter()
            .map(|entry| Participant { username: entry.username, connection_id: entry.id })
            .collect();
    }

    /// Forced termination: reset everything except the theme and return to
    /// the pre-join phase.
    fn apply_kicked(&mut self) -> Vec<SessionAction> {
        tracing::warn!(username = self.username.as_deref(), "kicked from the chat");

        self.phase = SessionPhase::PreJoin;
        self.username = None;
        self.roster.clear();
        self.connection_ids.clear();
        self.public.clear();
        self.private.clear();
        self.unread.clear();
        self.active = Conversation::Public;
        self.is_admin = false;

        vec![SessionAction::Kicked]
    }

    /// Re-register identity after the channel adapter reconnected.
    fn handle_reconnected(&mut self) -> Vec<SessionAction> {
        match self.username.clone() {
            Some(username) if self.phase == SessionPhase::Joined => {
                tracing::info!(%username, "re-registering identity after reconnect");
                Self::identity_events(&username)
            },
            _ => vec![],
        }
    }

    fn handle_submit_username(&mut self, raw: &str) -> Vec<SessionAction> {
        if self.phase == SessionPhase::Joined {
            // Identity is immutable once submitted.
            tracing::debug!("ignoring username submission while joined");
            return vec![];
        }

        let username = raw.trim();
        if username.is_empty() {
            return vec![];
        }

        tracing::info!(%username, "joining chat");
        self.username = Some(username.to_owned());
        self.phase = SessionPhase::Joined;

        Self::identity_events(username)
    }

    /// The outbound events that register an identity with the server.
    fn identity_events(username: &str) -> Vec<SessionAction> {
        let mut actions =
            vec![SessionAction::Emit(Outbound::SetUsername { username: username.to_owned() })];

        if username.eq_ignore_ascii_case(ADMIN_USERNAME) {
            actions.push(SessionAction::Emit(Outbound::RequestAdminStatus {
                username: username.to_owned(),
            }));
        }

        actions
    }

    fn handle_send_message(&mut self, body: String) -> Vec<SessionAction> {
        let Some(username) = self.username.clone() else {
            tracing::debug!("ignoring send without identity");
            return vec![];
        };
        if body.trim().is_empty() {
            return vec![];
        }

        let outbound = match &self.active {
            Conversation::Public => Outbound::SendMessage { username, message: body },
            Conversation::Private(to) => {
                Outbound::SendPrivateMessage { username, to: to.clone(), message: body }
            },
        };

        vec![SessionAction::Emit(outbound)]
    }

    fn handle_open_private_chat(&mut self, username: String) -> Vec<SessionAction> {
        if self.username.as_deref() == Some(username.as_str()) {
            // A user is never a valid counterparty of their own chat.
            tracing::debug!(%username, "ignoring self-targeted private chat");
            return vec![];
        }

        // Materialize the conversation so its (empty) pane can render, and
        // so conversation keys stay a superset of unread keys.
        self.private.entry(username.clone()).or_default();
        self.unread.insert(username.clone(), 0);
        self.active = Conversation::Private(username);

        vec![]
    }

    fn handle_kick_user(&mut self, username: &str) -> Vec<SessionAction> {
        if !self.is_admin {
            tracing::debug!(%username, "ignoring kick without admin privilege");
            return vec![];
        }
        let Some(target) = self.connection_ids.get(username).cloned() else {
            // Stale UI state: the target already left. Silently ignore so
            // the command stays safe to repeat.
            tracing::debug!(%username, "ignoring kick of unknown user");
            return vec![];
        };

        tracing::info!(%username, connection = %target, "kicking user");

        vec![
            SessionAction::Emit(Outbound::KickUser { target_connection_id: target }),
            SessionAction::Emit(Outbound::SendMessage {
                username: SYSTEM_SENDER.to_owned(),
                message: format!("{username} has been kicked from the chat"),
            }),
        ]
    }

    // --- Read-only projection surface ---

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The session's identity, once submitted.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether the server has confirmed administrator privilege.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Current UI theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The conversation currently rendered.
    pub fn active_conversation(&self) -> &Conversation {
        &self.active
    }

    /// Online participants, in the order of the last snapshot.
    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    /// Connection id for a roster member, if present.
    pub fn connection_id(&self, username: &str) -> Option<&ConnectionId> {
        self.connection_ids.get(username)
    }

    /// Public conversation history.
    pub fn public_messages(&self) -> &[PublicEntry] {
        &self.public
    }

    /// Private history with a counterparty. `None` if no such conversation
    /// has been observed or opened.
    pub fn private_messages(&self, counterparty: &str) -> Option<&[PrivateEntry]> {
        self.private.get(counterparty).map(Vec::as_slice)
    }

    /// Counterparties with an accumulated private conversation.
    pub fn conversations(&self) -> impl Iterator<Item = &str> {
        self.private.keys().map(String::as_str)
    }

    /// Unread count for a counterparty. Zero when unknown or active.
    pub fn unread(&self, counterparty: &str) -> u32 {
        self.unread.get(counterparty).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn joined(name: &str) -> Session {
        let mut session = Session::new();
        session.handle(SessionEvent::SubmitUsername { username: name.to_owned() });
        session
    }

    fn presence(entries: &[(&str, &str)]) -> Inbound {
        Inbound::Users(
            entries
                .iter()
                .map(|(name, id)| Presence {
                    username: (*name).to_owned(),
                    id: ConnectionId::from(*id),
                })
                .collect(),
        )
    }

    #[test]
    fn new_session_is_pristine() {
        let session = Session::new();
        assert_eq!(session.phase(), SessionPhase::PreJoin);
        assert_eq!(session.username(), None);
        assert!(session.public_messages().is_empty());
        assert!(!session.is_admin());
        assert_eq!(session.active_conversation(), &Conversation::Public);
    }

    #[test]
    fn submit_username_trims_and_joins() {
        let mut session = Session::new();
        let actions =
            session.handle(SessionEvent::SubmitUsername { username: "  alice  ".to_owned() });

        assert_eq!(session.phase(), SessionPhase::Joined);
        assert_eq!(session.username(), Some("alice"));
        assert_eq!(
            actions,
            vec![SessionAction::Emit(Outbound::SetUsername { username: "alice".to_owned() })]
        );
    }

    #[test]
    fn whitespace_username_is_ignored() {
        let mut session = Session::new();
        let actions = session.handle(SessionEvent::SubmitUsername { username: "   ".to_owned() });

        assert!(actions.is_empty());
        assert_eq!(session.phase(), SessionPhase::PreJoin);
    }

    #[test]
    fn username_is_immutable_once_joined() {
        let mut session = joined("alice");
        let actions =
            session.handle(SessionEvent::SubmitUsername { username: "mallory".to_owned() });

        assert!(actions.is_empty());
        assert_eq!(session.username(), Some("alice"));
    }

    #[test]
    fn admin_name_requests_but_does_not_grant_privilege() {
        let mut session = Session::new();
        let actions =
            session.handle(SessionEvent::SubmitUsername { username: "Admin".to_owned() });

        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[1],
            SessionAction::Emit(Outbound::RequestAdminStatus { username: "Admin".to_owned() })
        );
        // Privilege only arrives with adminStatus(true).
        assert!(!session.is_admin());

        session.handle(SessionEvent::Channel(Inbound::AdminStatus(true)));
        assert!(session.is_admin());
    }

    #[test]
    fn public_send_targets_public_conversation() {
        let mut session = joined("alice");
        let actions = session.handle(SessionEvent::SendMessage { body: "hi".to_owned() });

        assert_eq!(
            actions,
            vec![SessionAction::Emit(Outbound::SendMessage {
                username: "alice".to_owned(),
                message: "hi".to_owned(),
            })]
        );
        // Fire-and-forget: nothing lands locally until the echo arrives.
        assert!(session.public_messages().is_empty());
    }

    #[test]
    fn private_send_targets_active_counterparty() {
        let mut session = joined("alice");
        session.handle(SessionEvent::OpenPrivateChat { username: "bob".to_owned() });
        let actions = session.handle(SessionEvent::SendMessage { body: "hey".to_owned() });

        assert_eq!(
            actions,
            vec![SessionAction::Emit(Outbound::SendPrivateMessage {
                username: "alice".to_owned(),
                to: "bob".to_owned(),
                message: "hey".to_owned(),
            })]
        );
    }

    #[test]
    fn empty_or_identityless_sends_are_ignored() {
        let mut session = Session::new();
        assert!(session.handle(SessionEvent::SendMessage { body: "hi".to_owned() }).is_empty());

        let mut session = joined("alice");
        assert!(session.handle(SessionEvent::SendMessage { body: " \t ".to_owned() }).is_empty());
    }

    #[test]
    fn inbound_private_message_files_under_partner_and_counts_unread() {
        let mut session = joined("alice");
        session.handle(SessionEvent::Channel(Inbound::PrivateMessage {
            from: "bob".to_owned(),
            to: "alice".to_owned(),
            message: "hey".to_owned(),
            from_self: false,
        }));

        assert_eq!(
            session.private_messages("bob"),
            Some(&[PrivateEntry { body: "hey".to_owned(), from_self: false }][..])
        );
        assert_eq!(session.unread("bob"), 1);
    }

    #[test]
    fn self_echo_files_under_recipient() {
        let mut session = joined("alice");
        session.handle(SessionEvent::OpenPrivateChat { username: "bob".to_owned() });
        session.handle(SessionEvent::Channel(Inbound::PrivateMessage {
            from: "alice".to_owned(),
            to: "bob".to_owned(),
            message: "hey".to_owned(),
            from_self: true,
        }));

        let entries = session.private_messages("bob").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].from_self);
        // Echo landed in the active conversation - no unread.
        assert_eq!(session.unread("bob"), 0);
    }

    #[test]
    fn opening_a_chat_resets_unread_and_materializes_it() {
        let mut session = joined("alice");
        session.handle(SessionEvent::Channel(Inbound::PrivateMessage {
            from: "bob".to_owned(),
            to: "alice".to_owned(),
            message: "hey".to_owned(),
            from_self: false,
        }));
        assert_eq!(session.unread("bob"), 1);

        session.handle(SessionEvent::OpenPrivateChat { username: "bob".to_owned() });
        assert_eq!(session.active_conversation(), &Conversation::Private("bob".to_owned()));
        assert_eq!(session.unread("bob"), 0);

        // Opening a never-messaged chat creates an empty conversation.
        session.handle(SessionEvent::OpenPrivateChat { username: "carol".to_owned() });
        assert_eq!(session.private_messages("carol"), Some(&[][..]));
    }

    #[test]
    fn opening_a_chat_with_self_is_ignored() {
        let mut session = joined("alice");
        let actions =
            session.handle(SessionEvent::OpenPrivateChat { username: "alice".to_owned() });

        assert!(actions.is_empty());
        assert_eq!(session.active_conversation(), &Conversation::Public);
    }

    #[test]
    fn presence_snapshot_replaces_roster_wholesale() {
        let mut session = joined("alice");
        session.handle(SessionEvent::Channel(presence(&[("alice", "id1"), ("bob", "id2")])));
        assert_eq!(session.roster().len(), 2);

        session.handle(SessionEvent::Channel(presence(&[("carol", "id3")])));
        let names: Vec<_> = session.roster().iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["carol"]);
        assert!(session.connection_id("bob").is_none());
        assert_eq!(session.connection_id("carol"), Some(&ConnectionId::from("id3")));
    }

    #[test]
    fn kick_requires_admin_and_roster_membership() {
        let mut session = joined("alice");
        session.handle(SessionEvent::Channel(presence(&[("alice", "id1"), ("eve", "id7")])));

        // Not admin yet.
        assert!(session.handle(SessionEvent::KickUser { username: "eve".to_owned() }).is_empty());

        session.handle(SessionEvent::Channel(Inbound::AdminStatus(true)));

        // Admin, but target not in the roster.
        assert!(
            session.handle(SessionEvent::KickUser { username: "mallory".to_owned() }).is_empty()
        );

        let actions = session.handle(SessionEvent::KickUser { username: "eve".to_owned() });
        assert_eq!(
            actions,
            vec![
                SessionAction::Emit(Outbound::KickUser {
                    target_connection_id: ConnectionId::from("id7"),
                }),
                SessionAction::Emit(Outbound::SendMessage {
                    username: SYSTEM_SENDER.to_owned(),
                    message: "eve has been kicked from the chat".to_owned(),
                }),
            ]
        );
    }

    #[test]
    fn kicked_resets_everything_but_the_theme() {
        let mut session = joined("alice");
        session.handle(SessionEvent::ToggleTheme);
        session.handle(SessionEvent::Channel(presence(&[("alice", "id1"), ("bob", "id2")])));
        session.handle(SessionEvent::Channel(Inbound::AdminStatus(true)));
        session.handle(SessionEvent::Channel(Inbound::Message {
            username: "bob".to_owned(),
            message: "hi".to_owned(),
        }));
        session.handle(SessionEvent::Channel(Inbound::PrivateMessage {
            from: "bob".to_owned(),
            to: "alice".to_owned(),
            message: "psst".to_owned(),
            from_self: false,
        }));

        let actions = session.handle(SessionEvent::Channel(Inbound::Kicked));
        assert_eq!(actions, vec![SessionAction::Kicked]);

        assert_eq!(session.phase(), SessionPhase::PreJoin);
        assert_eq!(session.username(), None);
        assert!(session.public_messages().is_empty());
        assert!(session.private_messages("bob").is_none());
        assert_eq!(session.unread("bob"), 0);
        assert!(session.roster().is_empty());
        assert!(!session.is_admin());
        assert_eq!(session.active_conversation(), &Conversation::Public);
        // UI affinity survives.
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn reconnect_replays_identity_when_joined() {
        let mut session = joined("alice");
        let actions = session.handle(SessionEvent::Reconnected);
        assert_eq!(
            actions,
            vec![SessionAction::Emit(Outbound::SetUsername { username: "alice".to_owned() })]
        );

        // Pre-join there is nothing to replay.
        let mut session = Session::new();
        assert!(session.handle(SessionEvent::Reconnected).is_empty());
    }

    #[test]
    fn reconnect_replays_admin_request_for_admin_name() {
        let mut session = joined("admin");
        let actions = session.handle(SessionEvent::Reconnected);
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[1],
            SessionAction::Emit(Outbound::RequestAdminStatus { username: "admin".to_owned() })
        );
    }

    #[test]
    fn system_sender_is_flagged() {
        let mut session = joined("alice");
        session.handle(SessionEvent::Channel(Inbound::Message {
            username: SYSTEM_SENDER.to_owned(),
            message: "eve has been kicked from the chat".to_owned(),
        }));

        assert!(session.public_messages()[0].is_system);
    }
}
