//! Booking reference type.

use std::fmt;

use super::DomainError;

/// A server-assigned booking reference (e.g. `BK7Q2M9XZ1`).
///
/// References are interpolated into request paths, so only non-empty
/// ASCII alphanumeric strings are accepted.
///
/// # Examples
///
/// ```
/// use booking_client::domain::BookingReference;
///
/// let reference = BookingReference::parse("BK12345").unwrap();
/// assert_eq!(reference.as_str(), "BK12345");
///
/// assert!(BookingReference::parse("").is_err());
/// assert!(BookingReference::parse("BK/123").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BookingReference(String);

impl BookingReference {
    /// Parse a booking reference, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(DomainError::InvalidReference("must not be empty"));
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidReference(
                "must contain only ASCII letters and digits",
            ));
        }

        Ok(BookingReference(s.to_string()))
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookingReference({})", self.0)
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
