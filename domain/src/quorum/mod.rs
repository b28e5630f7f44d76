//! Quorum tracking
//!
//! A polled worker asks every other worker to confirm reachability. Once a
//! confirmation has arrived from each of them the round has reached quorum
//! and the worker reports back to the controller.

pub mod counter;

pub use counter::ConfirmationCounter;
