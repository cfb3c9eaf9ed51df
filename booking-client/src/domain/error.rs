//! Domain error types.
//!
//! These errors represent validation failures when building domain values
//! from server data or user input. They are distinct from API/IO errors.

/// Domain-level errors for value validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Currency amount is negative or not finite
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    /// A required name was empty
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Booking reference failed validation
    #[error("invalid booking reference: {0}")]
    InvalidReference(&'static str),

    /// Date or timestamp could not be parsed
    #[error("invalid date {value:?}: expected {expected}")]
    InvalidDate {
        value: String,
        expected: &'static str,
    },

    /// Booking status string not recognised
    #[error("unknown booking status: {0}")]
    UnknownStatus(String),
}
