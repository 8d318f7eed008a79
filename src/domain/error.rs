use thiserror::Error;

/// Violation of an invariant the domain layer enforces on its own types,
/// such as an inverted reservation range reaching construction.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain invariant violated: {message}")]
    Invariant { message: String },
}

impl DomainError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }
}
