//! Application services coordinating domain rules with persistence adapters.

pub mod catalog;
pub mod directory;
pub mod error;
pub mod images;
pub mod repos;
pub mod reservations;
