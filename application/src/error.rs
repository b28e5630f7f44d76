//! Participant failure taxonomy

use crate::transport::ChannelError;
use barrier_domain::DomainError;
use std::time::Duration;
use thiserror::Error;

/// Fatal conditions that end a participant's run
///
/// None of them is retried. The display text is the underlying cause;
/// [`operation`](Self::operation) names what the participant was doing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarrierError {
    /// Channel creation, release, read, write or wait failed
    #[error("{source}")]
    SystemCallFailure {
        operation: &'static str,
        #[source]
        source: ChannelError,
    },

    /// Nothing became ready before the deadline
    #[error("Worker timeout expired after {} ms", after.as_millis())]
    OperationTimeout { after: Duration },

    /// A token arrived that the protocol does not allow at this point
    #[error("{reason}")]
    ProtocolViolation {
        operation: &'static str,
        reason: String,
    },
}

impl BarrierError {
    pub fn system(operation: &'static str, source: ChannelError) -> Self {
        BarrierError::SystemCallFailure { operation, source }
    }

    pub fn protocol(operation: &'static str, reason: impl Into<String>) -> Self {
        BarrierError::ProtocolViolation {
            operation,
            reason: reason.into(),
        }
    }

    pub fn from_domain(operation: &'static str, error: DomainError) -> Self {
        Self::protocol(operation, error.to_string())
    }

    /// Label of the operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            BarrierError::SystemCallFailure { operation, .. }
            | BarrierError::ProtocolViolation { operation, .. } => operation,
            BarrierError::OperationTimeout { .. } => "waiting for channels",
        }
    }

    pub fn is_system_failure(&self) -> bool {
        matches!(self, BarrierError::SystemCallFailure { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BarrierError::OperationTimeout { .. })
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, BarrierError::ProtocolViolation { .. })
    }
}
