//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Raised by aggregates when a command falls outside their domain (bad input,
/// a state that does not allow the transition). Callers at the store boundary
/// decide whether to surface it or treat it as a no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced entity does not exist.
    #[error("not found")]
    NotFound,

    /// The command conflicts with the current state (e.g. a checkout already in flight).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
