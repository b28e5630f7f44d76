//! Domain error types

use super::participant::ParticipantId;
use crate::message::WireError;
use crate::worker::WorkerState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Empty queue access for peer {peer}")]
    EmptyQueueAccess { peer: ParticipantId },

    #[error("Participant {owner} has no queue towards {peer}")]
    UnknownPeer {
        owner: ParticipantId,
        peer: ParticipantId,
    },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("Worker is no longer running (state: {0})")]
    NotRunning(WorkerState),
}

impl DomainError {
    /// Check if this error was caused by a token the protocol does not allow
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, DomainError::Wire(_) | DomainError::NotRunning(_))
    }
}
