//! Event reporting port
//!
//! Defines the interface through which participants announce what they do.
//! Implementations live in the presentation layer (console) and the
//! infrastructure layer (JSONL transcript).

use crate::error::BarrierError;
use barrier_domain::ParticipantId;

/// Whether a participant sent or received a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for protocol events
///
/// Every participant runs on its own task, so implementations must be
/// shareable across them. The identity of the acting participant is always
/// passed in explicitly.
pub trait BarrierReporter: Send + Sync {
    /// A token was written to or read from a channel
    fn on_message(&self, actor: ParticipantId, direction: Direction, token: &str);

    /// The controller received the quorum confirmation of `worker`
    fn on_poll_success(&self, worker: ParticipantId);

    /// `actor` stopped because of a fatal condition
    fn on_failure(&self, actor: ParticipantId, error: &BarrierError);

    /// Every participant has terminated
    fn on_complete(&self) {}
}

/// No-op reporter for when event reporting is not needed
pub struct NoReporter;

impl BarrierReporter for NoReporter {
    fn on_message(&self, _actor: ParticipantId, _direction: Direction, _token: &str) {}
    fn on_poll_success(&self, _worker: ParticipantId) {}
    fn on_failure(&self, _actor: ParticipantId, _error: &BarrierError) {}
}
