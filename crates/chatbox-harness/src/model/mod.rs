//! Reference model for model-based testing.
//!
//! The model is a simplified implementation that captures the SPECIFICATION
//! of the chat session without the action plumbing of the real state
//! machine. It is the oracle against which the real implementation is
//! verified.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Specification not implementation: captures WHAT, not HOW
//! - Deterministic: same inputs produce same outputs

mod operation;
mod server;
mod session;
mod world;

pub use operation::{ClientId, Operation, SmallMessage, client_name};
pub use server::ModelServer;
pub use session::ModelSession;
pub use world::{ModelWorld, ObservableSession, ObservableState};
