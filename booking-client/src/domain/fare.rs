//! Currency amount type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Currency glyph prefixed to every displayed amount.
pub const CURRENCY_GLYPH: &str = "৳";

/// A non-negative, finite currency amount.
///
/// Fares and dropping-point prices come from the server as JSON numbers.
/// This type guarantees the value is usable for display and comparison.
///
/// # Examples
///
/// ```
/// use booking_client::domain::Fare;
///
/// let fare = Fare::new(500.0).unwrap();
/// assert_eq!(fare.to_string(), "৳500");
///
/// assert!(Fare::new(-1.0).is_err());
/// assert!(Fare::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fare(f64);

impl Fare {
    /// Zero fare.
    pub const ZERO: Fare = Fare(0.0);

    /// Create a fare, rejecting negative and non-finite amounts.
    pub fn new(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount(amount));
        }
        if amount < 0.0 {
            return Err(DomainError::InvalidAmount(amount));
        }
        // Normalise -0.0 so it never displays with a sign.
        Ok(Fare(amount + 0.0))
    }

    /// The raw amount.
    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Fare {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Fare::new(value)
    }
}

impl From<Fare> for f64 {
    fn from(fare: Fare) -> Self {
        fare.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_GLYPH}{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every non-negative finite amount is accepted unchanged
        #[test]
        fn non_negative_accepted(amount in 0.0f64..1_000_000.0) {
            let fare = Fare::new(amount).unwrap();
            prop_assert_eq!(fare.amount(), amount);
        }

        /// Every negative amount is rejected
        #[test]
        fn negative_rejected(amount in -1_000_000.0f64..-0.0001) {
            prop_assert!(Fare::new(amount).is_err());
        }

        /// Display always carries the currency glyph
        #[test]
        fn display_has_glyph(amount in 0.0f64..100_000.0) {
            let fare = Fare::new(amount).unwrap();
            prop_assert!(fare.to_string().starts_with(CURRENCY_GLYPH));
        }
    }
}
