//! Model world - a fleet of sessions behind one server authority.
//!
//! The world applies [`Operation`]s to model sessions, routes the resulting
//! channel traffic through the [`ModelServer`], and exposes an observable
//! state for oracle comparison against the real implementation.

use chatbox_client::{Conversation, Session};
use chatbox_proto::{Inbound, Outbound};

use super::{
    operation::{ClientId, Operation, client_name},
    server::ModelServer,
    session::ModelSession,
};

/// Observable view of one session, comparable between model and real.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableSession {
    /// Identity, if joined.
    pub username: Option<String>,
    /// Public history as `(sender, body, is_system)`.
    pub public: Vec<(String, String, bool)>,
    /// Private histories as `(counterparty, [(body, from_self)])`, sorted
    /// by counterparty.
    pub private: Vec<(String, Vec<(String, bool)>)>,
    /// Unread counts for every known conversation, sorted by counterparty.
    pub unread: Vec<(String, u32)>,
    /// Roster as `(username, connection id)`, in snapshot order.
    pub roster: Vec<(String, String)>,
    /// Active private counterparty; `None` means public.
    pub active_private: Option<String>,
    /// Confirmed admin privilege.
    pub is_admin: bool,
}

impl ObservableSession {
    /// Project a model session.
    pub fn from_model(session: &ModelSession) -> Self {
        let private: Vec<_> =
            session.private.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let unread = session
            .private
            .keys()
            .map(|k| (k.clone(), session.unread.get(k).copied().unwrap_or(0)))
            .collect();

        Self {
            username: session.username.clone(),
            public: session.public.clone(),
            private,
            unread,
            roster: session
                .roster
                .iter()
                .map(|p| (p.username.clone(), p.id.as_str().to_owned()))
                .collect(),
            active_private: session.active.clone(),
            is_admin: session.is_admin,
        }
    }

    /// Project a real session through its read-only surface.
    pub fn from_real(session: &Session) -> Self {
        let mut keys: Vec<String> = session.conversations().map(str::to_owned).collect();
        keys.sort();

        let private = keys
            .iter()
            .map(|key| {
                let entries = session
                    .private_messages(key)
                    .unwrap_or_default()
                    .iter()
                    .map(|e| (e.body.clone(), e.from_self))
                    .collect();
                (key.clone(), entries)
            })
            .collect();
        let unread = keys.iter().map(|key| (key.clone(), session.unread(key))).collect();

        Self {
            username: session.username().map(str::to_owned),
            public: session
                .public_messages()
                .iter()
                .map(|e| (e.sender.clone(), e.body.clone(), e.is_system))
                .collect(),
            private,
            unread,
            roster: session
                .roster()
                .iter()
                .map(|p| (p.username.clone(), p.connection_id.as_str().to_owned()))
                .collect(),
            active_private: match session.active_conversation() {
                Conversation::Public => None,
                Conversation::Private(name) => Some(name.clone()),
            },
            is_admin: session.is_admin(),
        }
    }
}

/// Observable state of the whole world, for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// One entry per client, in client-id order.
    pub sessions: Vec<ObservableSession>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    sessions: Vec<ModelSession>,
    server: ModelServer,
}

impl ModelWorld {
    /// Create a world with the given number of pre-join sessions.
    pub fn new(num_clients: usize) -> Self {
        Self { sessions: (0..num_clients).map(|_| ModelSession::new()).collect(), server: ModelServer::new() }
    }

    /// Number of sessions in the world.
    pub fn num_clients(&self) -> usize {
        self.sessions.len()
    }

    /// A session by client id.
    pub fn session(&self, id: ClientId) -> Option<&ModelSession> {
        self.sessions.get(id as usize)
    }

    /// The server authority.
    pub fn server(&self) -> &ModelServer {
        &self.server
    }

    /// Apply one operation. Invalid client ids are silent no-ops, matching
    /// the session's silent-by-design policy.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Join { client_id } => self.apply_join(*client_id),
            Operation::SendMessage { client_id, content } => {
                self.apply_send(*client_id, &content.to_text());
            },
            Operation::OpenChat { client_id, target_id } => {
                if let Some(session) = self.sessions.get_mut(*client_id as usize) {
                    session.open_chat(&client_name(*target_id));
                }
            },
            Operation::SwitchToPublic { client_id } => {
                if let Some(session) = self.sessions.get_mut(*client_id as usize) {
                    session.switch_to_public();
                }
            },
            Operation::Kick { client_id, target_id } => {
                self.apply_kick(*client_id, *target_id);
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            sessions: self.sessions.iter().map(ObservableSession::from_model).collect(),
        }
    }

    fn apply_join(&mut self, client_id: ClientId) {
        let Some(session) = self.sessions.get_mut(client_id as usize) else { return };
        let Some(username) = session.submit_username(&client_name(client_id)) else { return };

        let deliveries =
            self.server.handle(client_id, Outbound::SetUsername { username: username.clone() });
        self.deliver(deliveries);

        if username.eq_ignore_ascii_case("admin") {
            let deliveries =
                self.server.handle(client_id, Outbound::RequestAdminStatus { username });
            self.deliver(deliveries);
        }
    }

    fn apply_send(&mut self, client_id: ClientId, text: &str) {
        let Some(session) = self.sessions.get(client_id as usize) else { return };
        let Some(username) = session.username.clone() else { return };
        if text.trim().is_empty() {
            return;
        }

        let outbound = match session.active.clone() {
            None => Outbound::SendMessage { username, message: text.to_owned() },
            Some(to) => Outbound::SendPrivateMessage { username, to, message: text.to_owned() },
        };

        let deliveries = self.server.handle(client_id, outbound);
        self.deliver(deliveries);
    }

    fn apply_kick(&mut self, client_id: ClientId, target_id: ClientId) {
        let Some(session) = self.sessions.get(client_id as usize) else { return };
        if !session.is_admin {
            return;
        }

        // The kicker addresses the connection id from its OWN last
        // snapshot, exactly like the real dispatcher.
        let target_name = client_name(target_id);
        let Some(target) =
            session.roster.iter().find(|p| p.username == target_name).map(|p| p.id.clone())
        else {
            return;
        };

        let deliveries =
            self.server.handle(client_id, Outbound::KickUser { target_connection_id: target });
        self.deliver(deliveries);

        let deliveries = self.server.handle(client_id, Outbound::SendMessage {
            username: "System".to_owned(),
            message: format!("{target_name} has been kicked from the chat"),
        });
        self.deliver(deliveries);
    }

    fn deliver(&mut self, deliveries: Vec<(ClientId, Inbound)>) {
        for (client_id, inbound) in deliveries {
            if let Some(session) = self.sessions.get_mut(client_id as usize) {
                session.apply_inbound(inbound);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_then_broadcast_reaches_everyone() {
        let mut world = ModelWorld::new(2);
        world.apply(&Operation::Join { client_id: 0 });
        world.apply(&Operation::Join { client_id: 1 });
        world.apply(&Operation::SendMessage {
            client_id: 1,
            content: super::super::operation::SmallMessage { seed: 1, shape: 1 },
        });

        let state = world.observable_state();
        assert_eq!(state.sessions[0].public.len(), 1);
        assert_eq!(state.sessions[1].public.len(), 1);
        // Client 0 carries the reserved name and got privilege confirmed.
        assert!(state.sessions[0].is_admin);
        assert!(!state.sessions[1].is_admin);
    }

    #[test]
    fn kick_resets_the_target_session() {
        let mut world = ModelWorld::new(2);
        world.apply(&Operation::Join { client_id: 0 });
        world.apply(&Operation::Join { client_id: 1 });
        world.apply(&Operation::Kick { client_id: 0, target_id: 1 });

        let state = world.observable_state();
        assert_eq!(state.sessions[1].username, None);
        assert!(state.sessions[1].public.is_empty());
        // The admin saw the system notice and the shrunken roster.
        assert_eq!(state.sessions[0].roster.len(), 1);
        assert!(state.sessions[0].public.last().is_some_and(|(_, _, system)| *system));
    }
}
