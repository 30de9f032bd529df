//! Error types for model-level validation
//!
//! Covers the two validations that must happen before any remote call:
//! - Due-date input that cannot be parsed into calendar fields
//! - Entity identifiers supplied via navigation that are not positive integers

/// A user-supplied date/time value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Input did not match any accepted calendar shape
    #[error("invalid date input: {0:?}")]
    InvalidDate(String),

    /// A wire-format date from the remote store was malformed
    #[error("malformed wire date: {0:?}")]
    MalformedWire(String),
}

/// An entity identifier failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Identifier was not a positive integer
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}
