//! Async session driver.
//!
//! Ties one [`Session`] to one injected [`ChannelAdapter`]. Inbound channel
//! events and user commands are merged into a single ordered stream, so no
//! two reducer applications ever run concurrently. The adapter owns
//! reconnect timing and backoff; the driver only reacts to the
//! [`ChannelInput::Reconnected`] signal by replaying the session identity.

use async_trait::async_trait;
use chatbox_proto::{Inbound, Outbound};
use tokio::sync::mpsc;

use crate::{
    error::DriverError,
    event::{SessionAction, SessionEvent},
    session::Session,
};

/// What the channel adapter can hand to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelInput {
    /// A decoded inbound event, in delivery order.
    Event(Inbound),
    /// The adapter re-established its connection; prior roster state is no
    /// longer valid and the server must re-learn our identity.
    Reconnected,
    /// The adapter shut down for good.
    Closed,
}

/// Opaque duplex event channel.
///
/// The session owns exactly one adapter instance, injected at construction -
/// never a process-wide singleton, so multiple sessions and tests run
/// independently.
#[async_trait]
pub trait ChannelAdapter: Send {
    /// Emit an outbound event. Fire-and-forget from the session's view.
    async fn send(&mut self, event: Outbound) -> Result<(), DriverError>;

    /// Wait for the next channel input.
    async fn recv(&mut self) -> Result<ChannelInput, DriverError>;
}

/// Handle for feeding user commands into a running driver.
pub type CommandSender = mpsc::UnboundedSender<SessionEvent>;

/// Event loop serializing channel input and user commands into a session.
pub struct SessionDriver<C> {
    session: Session,
    channel: C,
    commands: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<C: ChannelAdapter> SessionDriver<C> {
    /// Create a driver over a fresh session and the given adapter.
    ///
    /// Returns the driver and the command handle the presentation layer
    /// uses to dispatch user intents.
    pub fn new(channel: C) -> (Self, CommandSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { session: Session::new(), channel, commands: rx }, tx)
    }

    /// Read-only view of the session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until the channel closes or every command handle is dropped.
    ///
    /// Returns the final session state so callers can inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the adapter fails to send or receive.
    pub async fn run(mut self) -> Result<Session, DriverError> {
        loop {
            let event = tokio::select! {
                // User intents ahead of channel input keeps the interleaving
                // deterministic; both paths land in the same ordered stream.
                biased;

                command = self.commands.recv() => match command {
                    Some(event) => event,
                    None => return Ok(self.session),
                },
                input = self.channel.recv() => match input? {
                    ChannelInput::Event(inbound) => SessionEvent::Channel(inbound),
                    ChannelInput::Reconnected => SessionEvent::Reconnected,
                    ChannelInput::Closed => return Ok(self.session),
                },
            };

            self.apply(event).await?;
        }
    }

    /// Apply one event and execute the resulting actions.
    async fn apply(&mut self, event: SessionEvent) -> Result<(), DriverError> {
        for action in self.session.handle(event) {
            match action {
                SessionAction::Emit(outbound) => {
                    tracing::trace!(?outbound, "emitting");
                    self.channel.send(outbound).await?;
                },
                SessionAction::Kicked => {
                    tracing::warn!("session terminated by the server");
                },
            }
        }

        Ok(())
    }
}
