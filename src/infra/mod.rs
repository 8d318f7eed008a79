//! Infrastructure adapters: Postgres repositories, the directory HTTP client,
//! telemetry, and the HTTP surface.

pub mod db;
pub mod directory;
pub mod error;
pub mod http;
pub mod telemetry;
