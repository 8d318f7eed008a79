use thiserror::Error;

/// Failures at the process edges: sockets, Postgres, telemetry setup, and
/// resolved configuration that turns out to be unusable.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("postgres failure: {message}")]
    Database { message: String },
    #[error("telemetry setup failed: {0}")]
    Telemetry(String),
    #[error("invalid runtime configuration: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
