//! Test doubles shared by the use case tests

use crate::error::BarrierError;
use crate::ports::reporter::{BarrierReporter, Direction};
use barrier_domain::ParticipantId;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReportedEvent {
    Message(ParticipantId, Direction, String),
    PollSuccess(ParticipantId),
    Failure(ParticipantId, BarrierError),
    Complete,
}

/// Reporter that keeps every event in memory
#[derive(Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ReportedEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ReportedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn poll_successes(&self) -> Vec<ParticipantId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportedEvent::PollSuccess(worker) => Some(worker),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn failures(&self) -> Vec<(ParticipantId, BarrierError)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportedEvent::Failure(actor, error) => Some((actor, error)),
                _ => None,
            })
            .collect()
    }

    /// Tokens `actor` reported in `direction`, in order
    pub(crate) fn tokens(&self, actor: ParticipantId, direction: Direction) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportedEvent::Message(a, d, token) if a == actor && d == direction => Some(token),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl BarrierReporter for RecordingReporter {
    fn on_message(&self, actor: ParticipantId, direction: Direction, token: &str) {
        self.push(ReportedEvent::Message(actor, direction, token.to_string()));
    }

    fn on_poll_success(&self, worker: ParticipantId) {
        self.push(ReportedEvent::PollSuccess(worker));
    }

    fn on_failure(&self, actor: ParticipantId, error: &BarrierError) {
        self.push(ReportedEvent::Failure(actor, error.clone()));
    }

    fn on_complete(&self) {
        self.push(ReportedEvent::Complete);
    }
}
