//! Scripted stand-in for the black-box server authority.
//!
//! The real server assigns connection ids, maintains canonical presence,
//! routes messages, and enforces moderation; the client trusts it blindly.
//! This model reproduces exactly the behavior the client depends on, so
//! both the reference model and the real sessions can be driven through the
//! same authority in tests.

use chatbox_proto::{ConnectionId, Inbound, Outbound, Presence};

use super::operation::ClientId;

/// One registered connection.
#[derive(Debug, Clone)]
struct Registration {
    client_id: ClientId,
    username: String,
    connection_id: ConnectionId,
}

/// Deterministic model of the server authority.
///
/// Routes outbound client events into the inbound deliveries they cause.
/// Registration order is stable, so presence snapshots and broadcast
/// fan-out are deterministic.
#[derive(Debug, Clone, Default)]
pub struct ModelServer {
    connected: Vec<Registration>,
    next_connection: u32,
}

impl ModelServer {
    /// Create an empty server with no registered connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a client currently has a registered connection.
    pub fn is_connected(&self, client_id: ClientId) -> bool {
        self.connected.iter().any(|r| r.client_id == client_id)
    }

    /// Connection id assigned to a username, if registered.
    pub fn connection_id(&self, username: &str) -> Option<&ConnectionId> {
        self.connected.iter().find(|r| r.username == username).map(|r| &r.connection_id)
    }

    /// Process one outbound client event into its inbound deliveries.
    ///
    /// Deliveries are returned in a deterministic order (registration order
    /// for broadcasts) and must be applied in that order.
    pub fn handle(&mut self, from: ClientId, event: Outbound) -> Vec<(ClientId, Inbound)> {
        match event {
            Outbound::SetUsername { username } => self.register(from, username),
            Outbound::RequestAdminStatus { username } => {
                // Demo authority: the reserved name is the whole policy.
                let granted = username.eq_ignore_ascii_case("admin");
                vec![(from, Inbound::AdminStatus(granted))]
            },
            Outbound::SendMessage { username, message } => self
                .connected
                .iter()
                .map(|r| {
                    (r.client_id, Inbound::Message {
                        username: username.clone(),
                        message: message.clone(),
                    })
                })
                .collect(),
            Outbound::SendPrivateMessage { username, to, message } => {
                self.route_private(from, username, to, message)
            },
            Outbound::KickUser { target_connection_id } => self.kick(&target_connection_id),
        }
    }

    /// Register (or re-register after reconnect) a connection, then
    /// broadcast the updated presence snapshot.
    fn register(&mut self, from: ClientId, username: String) -> Vec<(ClientId, Inbound)> {
        if let Some(existing) = self.connected.iter_mut().find(|r| r.client_id == from) {
            existing.username = username;
        } else {
            let connection_id = ConnectionId::new(format!("conn-{}", self.next_connection));
            self.next_connection += 1;
            self.connected.push(Registration { client_id: from, username, connection_id });
        }

        self.snapshot_deliveries()
    }

    /// Echo to the sender with the self-flag set, deliver to the recipient
    /// if they are connected.
    fn route_private(
        &self,
        from: ClientId,
        username: String,
        to: String,
        message: String,
    ) -> Vec<(ClientId, Inbound)> {
        let mut deliveries = vec![(from, Inbound::PrivateMessage {
            from: username.clone(),
            to: to.clone(),
            message: message.clone(),
            from_self: true,
        })];

        if let Some(recipient) = self.connected.iter().find(|r| r.username == to) {
            deliveries.push((recipient.client_id, Inbound::PrivateMessage {
                from: username,
                to,
                message,
                from_self: false,
            }));
        }

        deliveries
    }

    /// Disconnect the target and broadcast the shrunken roster.
    fn kick(&mut self, target: &ConnectionId) -> Vec<(ClientId, Inbound)> {
        let Some(position) = self.connected.iter().position(|r| r.connection_id == *target)
        else {
            return vec![];
        };

        let removed = self.connected.remove(position);
        let mut deliveries = vec![(removed.client_id, Inbound::Kicked)];
        deliveries.extend(self.snapshot_deliveries());
        deliveries
    }

    /// The current presence snapshot, delivered to every connection.
    fn snapshot_deliveries(&self) -> Vec<(ClientId, Inbound)> {
        let snapshot: Vec<Presence> = self
            .connected
            .iter()
            .map(|r| Presence { username: r.username.clone(), id: r.connection_id.clone() })
            .collect();

        self.connected.iter().map(|r| (r.client_id, Inbound::Users(snapshot.clone()))).collect()
    }
}
