//! Fuzz target for the [`Session`] state machine
//!
//! Prevent invariant violations under arbitrary event interleaving
//!
//! # Strategy
//!
//! - Event sequences: arbitrary interleavings of channel events and user
//!   commands, including events the UI would normally prevent
//! - Hostile channel input: snapshots with duplicate names, private
//!   messages about users that never joined, kicks at any moment
//!
//! # Invariants
//!
//! - `Joined` ONLY reachable via a non-empty username submission
//! - Identity never changes while `Joined`
//! - Unread count for the active conversation is always 0
//! - Unread keys are a subset of conversation keys
//! - `kicked` always lands back in pristine `PreJoin`
//! - NEVER panic on any event sequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use chatbox_client::{Conversation, Inbound, Session, SessionEvent, SessionPhase};
use chatbox_proto::{ConnectionId, Presence};

/// Small name pool so sequences actually collide on usernames.
#[derive(Debug, Clone, Copy, Arbitrary)]
enum Name {
    Admin,
    Alice,
    Bob,
    System,
    Blank,
}

impl Name {
    fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Alice => "alice",
            Self::Bob => "bob",
            Self::System => "System",
            Self::Blank => "   ",
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzedEvent {
    Submit { name: Name },
    Send { body_seed: u8 },
    OpenChat { target: Name },
    SwitchToPublic,
    Kick { target: Name },
    ToggleTheme,
    PublicMessage { sender: Name, body_seed: u8 },
    PrivateMessage { from: Name, to: Name, body_seed: u8, from_self: bool },
    Snapshot { members: Vec<(Name, u8)> },
    AdminStatus { granted: bool },
    Kicked,
    Reconnected,
}

fn to_session_event(event: &FuzzedEvent) -> SessionEvent {
    match event {
        FuzzedEvent::Submit { name } => {
            SessionEvent::SubmitUsername { username: name.as_str().to_owned() }
        }
        FuzzedEvent::Send { body_seed } => {
            let body = if body_seed % 5 == 0 { String::new() } else { format!("m{body_seed}") };
            SessionEvent::SendMessage { body }
        }
        FuzzedEvent::OpenChat { target } => {
            SessionEvent::OpenPrivateChat { username: target.as_str().to_owned() }
        }
        FuzzedEvent::SwitchToPublic => SessionEvent::SwitchToPublic,
        FuzzedEvent::Kick { target } => {
            SessionEvent::KickUser { username: target.as_str().to_owned() }
        }
        FuzzedEvent::ToggleTheme => SessionEvent::ToggleTheme,
        FuzzedEvent::PublicMessage { sender, body_seed } => {
            SessionEvent::Channel(Inbound::Message {
                username: sender.as_str().to_owned(),
                message: format!("p{body_seed}"),
            })
        }
        FuzzedEvent::PrivateMessage { from, to, body_seed, from_self } => {
            SessionEvent::Channel(Inbound::PrivateMessage {
                from: from.as_str().to_owned(),
                to: to.as_str().to_owned(),
                message: format!("d{body_seed}"),
                from_self: *from_self,
            })
        }
        FuzzedEvent::Snapshot { members } => SessionEvent::Channel(Inbound::Users(
            members
                .iter()
                .map(|(name, id)| Presence {
                    username: name.as_str().to_owned(),
                    id: ConnectionId::new(format!("id{id}")),
                })
                .collect(),
        )),
        FuzzedEvent::AdminStatus { granted } => {
            SessionEvent::Channel(Inbound::AdminStatus(*granted))
        }
        FuzzedEvent::Kicked => SessionEvent::Channel(Inbound::Kicked),
        FuzzedEvent::Reconnected => SessionEvent::Reconnected,
    }
}

fuzz_target!(|events: Vec<FuzzedEvent>| {
    let mut session = Session::new();
    let mut identity: Option<String> = None;

    for event in &events {
        let was_kicked = matches!(event, FuzzedEvent::Kicked);
        let _ = session.handle(to_session_event(event));

        match session.phase() {
            SessionPhase::PreJoin => {
                assert_eq!(session.username(), None);
                identity = None;
                if was_kicked {
                    assert!(session.public_messages().is_empty());
                    assert!(session.roster().is_empty());
                    assert!(!session.is_admin());
                    assert_eq!(session.active_conversation(), &Conversation::Public);
                }
            }
            SessionPhase::Joined => {
                let current = session.username().map(str::to_owned);
                assert!(current.is_some(), "joined without identity");
                if let Some(previous) = &identity {
                    assert_eq!(Some(previous.clone()), current, "identity changed while joined");
                }
                identity = current;
            }
        }

        // The active conversation never shows as unread.
        if let Conversation::Private(active) = session.active_conversation() {
            assert_eq!(session.unread(active), 0);
        }

        // Unread keys never escape the conversation index.
        let conversations: Vec<&str> = session.conversations().collect();
        for name in ["admin", "alice", "bob", "System"] {
            if session.unread(name) > 0 {
                assert!(conversations.contains(&name), "unread without conversation: {name}");
            }
        }
    }
});
