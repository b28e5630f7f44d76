//! Composite reporter: delegates to multiple reporters.
//!
//! Used to fan protocol events out to the console and the JSONL
//! transcript simultaneously.

use super::reporter::{BarrierReporter, Direction};
use crate::error::BarrierError;
use barrier_domain::ParticipantId;
use std::sync::Arc;

/// A reporter that forwards every event to each delegate in order.
///
/// Delegates are shared (`Arc`) because participants run on spawned tasks.
///
/// ```text
/// worker / controller task
///            |
///   CompositeReporter
///            |
///     +------+----------------+
///     |                       |
/// ConsoleReporter     JsonlTranscriptReporter
/// ```
pub struct CompositeReporter {
    delegates: Vec<Arc<dyn BarrierReporter>>,
}

impl CompositeReporter {
    pub fn new(delegates: Vec<Arc<dyn BarrierReporter>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, delegate: Arc<dyn BarrierReporter>) {
        self.delegates.push(delegate);
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

/// Macro to delegate a method call to all inner reporters.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl BarrierReporter for CompositeReporter {
    fn on_message(&self, actor: ParticipantId, direction: Direction, token: &str) {
        delegate!(self, on_message, actor, direction, token);
    }

    fn on_poll_success(&self, worker: ParticipantId) {
        delegate!(self, on_poll_success, worker);
    }

    fn on_failure(&self, actor: ParticipantId, error: &BarrierError) {
        delegate!(self, on_failure, actor, error);
    }

    fn on_complete(&self) {
        delegate!(self, on_complete);
    }
}
