//! Application configuration

mod barrier_params;

pub use barrier_params::BarrierParams;

use thiserror::Error;

/// Invalid run parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one worker is required")]
    NoWorkers,

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Channel capacity must be at least 1")]
    ZeroCapacity,
}
