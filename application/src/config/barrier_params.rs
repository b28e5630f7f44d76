//! Barrier parameters: process group sizing and loop control.
//!
//! [`BarrierParams`] groups the static parameters that shape one run of
//! [`RunBarrierUseCase`](crate::use_cases::run_barrier::RunBarrierUseCase).

use super::ConfigError;
use barrier_domain::Membership;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run parameters.
///
/// | Field | Default | Used by |
/// |-------|---------|---------|
/// | `workers` | 3 | topology, workers, controller |
/// | `timeout` | 5 s | worker multiplexer wait |
/// | `channel_capacity` | 16 | every directed channel |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierParams {
    /// Number of workers (`W`).
    pub workers: usize,
    /// How long a worker waits for any channel to become ready.
    pub timeout: Duration,
    /// Frames a channel buffers before writes block.
    pub channel_capacity: usize,
}

impl Default for BarrierParams {
    fn default() -> Self {
        Self {
            workers: 3,
            timeout: Duration::from_secs(5),
            channel_capacity: 16,
        }
    }
}

impl BarrierParams {
    // ==================== Builder Methods ====================

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn membership(&self) -> Membership {
        Membership::new(self.workers)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = BarrierParams::default();
        assert_eq!(params.workers, 3);
        assert_eq!(params.timeout, Duration::from_secs(5));
        assert_eq!(params.channel_capacity, 16);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = BarrierParams::default()
            .with_workers(7)
            .with_timeout(Duration::from_millis(250))
            .with_channel_capacity(2);

        assert_eq!(params.workers, 7);
        assert_eq!(params.membership().participant_count(), 8);
        assert_eq!(params.timeout, Duration::from_millis(250));
        assert_eq!(params.channel_capacity, 2);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        assert_eq!(
            BarrierParams::default().with_workers(0).validate(),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(
            BarrierParams::default()
                .with_timeout(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroTimeout)
        );
        assert_eq!(
            BarrierParams::default().with_channel_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }
}
