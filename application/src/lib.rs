//! Application layer for mesh-barrier
//!
//! This crate contains the channel transport, the participant use cases,
//! port definitions, and run parameters. It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod transport;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{BarrierParams, ConfigError};
pub use error::BarrierError;
pub use ports::{
    composite_reporter::CompositeReporter,
    reporter::{BarrierReporter, Direction, NoReporter},
};
pub use transport::{ChannelEnd, ChannelError, ChannelTopology, Endpoints, Multiplexer};
pub use use_cases::run_barrier::{BarrierOutcome, RunBarrierError, RunBarrierUseCase};
pub use use_cases::run_controller::RunControllerUseCase;
pub use use_cases::run_worker::{RunWorkerUseCase, WorkerReport};
