//! Presentation layer for mesh-barrier
//!
//! This crate contains CLI definitions and the console reporter.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleReporter;
