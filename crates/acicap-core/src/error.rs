use thiserror::Error;

/// Core error type shared across acicap crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The fabric descriptor violates internal invariants.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Convenience alias for results returned by acicap crates.
pub type Result<T> = std::result::Result<T, Error>;
