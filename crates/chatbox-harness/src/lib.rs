//! Test harness for the chatbox session state machine.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing: an obviously-correct session, a scripted server standing in for
//! the black-box authority, and a world that applies operations to a fleet
//! of sessions. Operations are applied to both the model and the real
//! implementation, and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;

pub use model::{
    ClientId, ModelServer, ModelSession, ModelWorld, ObservableSession, ObservableState,
    Operation, SmallMessage, client_name,
};
