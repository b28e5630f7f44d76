//! Per-peer outbound message queues
//!
//! Every participant keeps one FIFO per peer holding messages that are
//! waiting for the peer's channel to become writable. A peer with an empty
//! queue is not eligible for writing.

use crate::core::error::DomainError;
use crate::core::participant::ParticipantId;
use crate::message::Message;
use std::collections::{BTreeMap, VecDeque};

/// Outbound queues owned by a single participant
#[derive(Debug, Clone)]
pub struct OutboundQueues {
    owner: ParticipantId,
    queues: BTreeMap<ParticipantId, VecDeque<Message>>,
}

impl OutboundQueues {
    /// Create one empty queue per peer; `owner` itself never gets one
    pub fn new(owner: ParticipantId, peers: impl IntoIterator<Item = ParticipantId>) -> Self {
        let queues = peers
            .into_iter()
            .filter(|peer| *peer != owner)
            .map(|peer| (peer, VecDeque::new()))
            .collect();
        Self { owner, queues }
    }

    pub fn owner(&self) -> ParticipantId {
        self.owner
    }

    pub fn enqueue(&mut self, peer: ParticipantId, message: Message) -> Result<(), DomainError> {
        let owner = self.owner;
        self.queues
            .get_mut(&peer)
            .ok_or(DomainError::UnknownPeer { owner, peer })?
            .push_back(message);
        Ok(())
    }

    pub fn has_pending(&self, peer: ParticipantId) -> bool {
        self.queues.get(&peer).is_some_and(|q| !q.is_empty())
    }

    /// Remove the head of `peer`'s queue. Callers gate on [`has_pending`](Self::has_pending).
    pub fn dequeue(&mut self, peer: ParticipantId) -> Result<Message, DomainError> {
        self.queues
            .get_mut(&peer)
            .and_then(VecDeque::pop_front)
            .ok_or(DomainError::EmptyQueueAccess { peer })
    }

    /// Peers with at least one queued message, in ascending order
    pub fn pending_peers(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(peer, _)| *peer)
    }

    pub fn total_pending(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}
