//! Domain layer for mesh-barrier
//!
//! This crate contains the protocol's entities and pure logic.
//! It has no dependencies on channels, runtimes or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Barrier
//!
//! One controller and `W` workers are connected by a full mesh of directed
//! channels. The controller polls the workers one after another; a polled
//! worker asks every other worker for a confirmation and answers the
//! controller once all of them replied (quorum). After every worker passed,
//! the controller tells all of them to stop.
//!
//! ## Wire tokens
//!
//! Messages carry no payload. Each [`Message`] travels as a fixed textual
//! token in a NUL-terminated [`Frame`] of at most [`MAX_FRAME_LEN`] bytes.

pub mod core;
pub mod message;
pub mod queue;
pub mod quorum;
pub mod worker;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    participant::{Membership, ParticipantId, Role},
};
pub use message::{Frame, MAX_FRAME_LEN, Message, WireError};
pub use queue::OutboundQueues;
pub use quorum::ConfirmationCounter;
pub use worker::{WorkerMachine, WorkerState};
