//! Directed channels between participants.
//!
//! ```text
//!                 ChannelTopology::new(N, capacity)
//!                 N·(N−1) bounded mpsc channels keyed by (from, to)
//!                              │
//!              prune(owner) for every participant
//!                              │
//!     ┌────────────────────────┼────────────────────────┐
//!     ▼                        ▼                        ▼
//! Endpoints(0)            Endpoints(1)      ...     Endpoints(W)
//! write ends (0,*)        write ends (1,*)          write ends (W,*)
//! read ends  (*,0)        read ends  (*,1)          read ends  (*,W)
//!     │                        │
//! controller driver       Multiplexer::wait → WorkerMachine
//! ```
//!
//! Every channel has exactly one writer and one reader, so no locking is
//! involved: ends are moved into the participant that owns them.

pub mod endpoints;
pub mod multiplexer;
pub mod topology;

pub use endpoints::{Endpoints, Inbound, Outbound};
pub use multiplexer::{Multiplexer, Readiness};
pub use topology::ChannelTopology;

use barrier_domain::ParticipantId;
use thiserror::Error;

/// Which end of a directed channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEnd {
    Read,
    Write,
}

impl std::fmt::Display for ChannelEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelEnd::Read => write!(f, "read"),
            ChannelEnd::Write => write!(f, "write"),
        }
    }
}

/// Failures of channel creation, release and I/O
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("A topology needs at least two participants, got {0}")]
    TooFewParticipants(usize),

    #[error("Channel capacity must be at least 1")]
    ZeroCapacity,

    #[error("Participant {0} is not part of the topology")]
    UnknownParticipant(ParticipantId),

    #[error("The {end} end of channel {from}->{to} was already released")]
    AlreadyReleased {
        from: ParticipantId,
        to: ParticipantId,
        end: ChannelEnd,
    },

    #[error("Participant {owner} holds no {end} end for peer {peer}")]
    NoEndpoint {
        owner: ParticipantId,
        peer: ParticipantId,
        end: ChannelEnd,
    },

    #[error("Peer {peer} hung up")]
    HungUp { peer: ParticipantId },

    #[error("No write slot was reserved towards peer {peer}")]
    NotReserved { peer: ParticipantId },
}
