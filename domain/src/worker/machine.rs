//! Worker state machine
//!
//! Pure message handling for a worker: no channels, no clocks. The
//! application layer feeds it frames read from ready channels and drains
//! its queues into writable ones.
//!
//! ```text
//!            Poll (from controller)
//!   ┌──────────────────────────────────────────┐
//!   │  enqueue Request → every other worker     │
//!   └──────────────────────────────────────────┘
//!            Request (from peer p)   → enqueue Confirm → p
//!            Confirm                 → count; at W-1 enqueue Confirm → controller
//!            Die                     → Done
//!            anything else           → Failed
//! ```

use super::state::WorkerState;
use crate::core::error::DomainError;
use crate::core::participant::{Membership, ParticipantId};
use crate::message::{Frame, Message};
use crate::queue::OutboundQueues;
use crate::quorum::ConfirmationCounter;

/// Message-driven state of one worker
#[derive(Debug, Clone)]
pub struct WorkerMachine {
    id: ParticipantId,
    membership: Membership,
    queues: OutboundQueues,
    counter: ConfirmationCounter,
    state: WorkerState,
    quorums_reached: usize,
}

impl WorkerMachine {
    pub fn new(id: ParticipantId, membership: Membership) -> Self {
        Self {
            id,
            membership,
            queues: OutboundQueues::new(id, membership.participants()),
            counter: ConfirmationCounter::new(membership.quorum_size()),
            state: WorkerState::Running,
            quorums_reached: 0,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn queues(&self) -> &OutboundQueues {
        &self.queues
    }

    /// Confirmations counted towards the current round
    pub fn confirmations(&self) -> usize {
        self.counter.received()
    }

    /// Number of times this worker reported quorum to the controller
    pub fn quorums_reached(&self) -> usize {
        self.quorums_reached
    }

    pub fn has_pending(&self, peer: ParticipantId) -> bool {
        self.queues.has_pending(peer)
    }

    /// Peers that currently have something to send, ascending
    pub fn pending_peers(&self) -> Vec<ParticipantId> {
        self.queues.pending_peers().collect()
    }

    /// Decode a frame read from `from` and apply it
    pub fn receive(&mut self, from: ParticipantId, frame: &Frame) -> Result<Message, DomainError> {
        self.ensure_running()?;
        let message = match Message::decode(frame) {
            Ok(message) => message,
            Err(e) => {
                self.state = WorkerState::Failed;
                return Err(e.into());
            }
        };
        self.handle(from, message)?;
        Ok(message)
    }

    /// Apply an already decoded message from `from`
    pub fn handle(&mut self, from: ParticipantId, message: Message) -> Result<(), DomainError> {
        self.ensure_running()?;

        let result = match message {
            Message::Confirm => self.on_confirm(),
            Message::Request => self.queues.enqueue(from, Message::Confirm),
            Message::Poll => self.on_poll(),
            Message::Die => {
                self.state = WorkerState::Done;
                Ok(())
            }
        };

        if result.is_err() {
            self.state = WorkerState::Failed;
        }
        result
    }

    /// Take the next message to write to `peer`
    pub fn next_outbound(&mut self, peer: ParticipantId) -> Result<Message, DomainError> {
        self.ensure_running()?;
        self.queues.dequeue(peer)
    }

    /// Mark the worker failed after a fatal condition outside the machine
    pub fn fail(&mut self) {
        if self.state == WorkerState::Running {
            self.state = WorkerState::Failed;
        }
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        match self.state {
            WorkerState::Running => Ok(()),
            other => Err(DomainError::NotRunning(other)),
        }
    }

    fn on_confirm(&mut self) -> Result<(), DomainError> {
        if self.counter.record() {
            self.report_quorum()?;
        }
        Ok(())
    }

    fn on_poll(&mut self) -> Result<(), DomainError> {
        for peer in self.membership.peer_workers(self.id) {
            self.queues.enqueue(peer, Message::Request)?;
        }
        // no peers to ask
        if self.counter.is_trivial() {
            self.report_quorum()?;
        }
        Ok(())
    }

    fn report_quorum(&mut self) -> Result<(), DomainError> {
        self.queues
            .enqueue(ParticipantId::CONTROLLER, Message::Confirm)?;
        self.quorums_reached += 1;
        Ok(())
    }
}
