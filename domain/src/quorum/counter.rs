//! Confirmation counter

use serde::{Deserialize, Serialize};

/// Counts confirmations received since the last quorum
///
/// # Example
///
/// ```
/// use barrier_domain::ConfirmationCounter;
///
/// let mut counter = ConfirmationCounter::new(2);
/// assert!(!counter.record());
/// assert!(counter.record()); // quorum reached, counter resets
/// assert_eq!(counter.received(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationCounter {
    received: usize,
    quorum: usize,
}

impl ConfirmationCounter {
    pub const fn new(quorum: usize) -> Self {
        Self { received: 0, quorum }
    }

    /// Record one confirmation. Returns `true` when this one completes the
    /// quorum; the counter is then back at zero.
    pub fn record(&mut self) -> bool {
        self.received += 1;
        if self.received >= self.quorum {
            self.received = 0;
            true
        } else {
            false
        }
    }

    pub const fn received(&self) -> usize {
        self.received
    }

    pub const fn quorum(&self) -> usize {
        self.quorum
    }

    /// A quorum of zero peers is met without any confirmation
    pub const fn is_trivial(&self) -> bool {
        self.quorum == 0
    }
}
