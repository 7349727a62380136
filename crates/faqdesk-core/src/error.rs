//! Error taxonomy for resolver and admin operations.
//!
//! Transports map each variant to a caller-visible signal: validation
//! failures to a rejection with a reason, unknown ids to "not found", bad
//! credentials to "forbidden", and store failures to a generic error.

use thiserror::Error;

/// Result alias used by the resolver.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Input rejected before reaching the matcher or the store.
    #[error("{0}")]
    Validation(String),

    /// A referenced pending query (or other record) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Admin credential missing or wrong; the action was not attempted.
    #[error("invalid admin credential")]
    Forbidden,

    /// The underlying store failed. Propagated as-is, never retried.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn validation(message: impl Into<String>) -> Self {
        ResolveError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ResolveError::NotFound(message.into())
    }
}
