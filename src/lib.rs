//! Rental-backend services: reservation admission, image storage, catalog reads.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
