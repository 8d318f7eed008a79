//! Domain layer types and invariants.

pub mod booking;
pub mod entities;
pub mod error;
pub mod types;
