//! Protocol messages and their wire representation

pub mod frame;
pub mod token;

pub use frame::{Frame, MAX_FRAME_LEN, WireError};
pub use token::Message;
