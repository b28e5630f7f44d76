//! Infrastructure layer for mesh-barrier
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ENV_PREFIX, FileBarrierConfig, FileConfig, FileLogConfig, FileOutputConfig,
};
pub use logging::JsonlTranscriptReporter;
