//! Worker behaviour: lifecycle states and the message-driven state machine

pub mod machine;
pub mod state;

pub use machine::WorkerMachine;
pub use state::WorkerState;
