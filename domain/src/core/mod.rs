//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::ParticipantId`]: controller/worker identity
//! - [`participant::Membership`]: the participant set of one run
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod participant;
