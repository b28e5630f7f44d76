//! Use cases
//!
//! Application-level operations that drive the domain state machines over
//! the channel transport.

pub mod run_barrier;
pub mod run_controller;
pub mod run_worker;
