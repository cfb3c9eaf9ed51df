//! Bus operating companies.

use std::fmt;

/// Rating assumed when the server omits one or sends an unusable value.
pub const DEFAULT_RATING: Rating = Rating(4.0);

/// Carrier rating on a 0.0–5.0 scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    /// Maximum rating.
    pub const MAX: f64 = 5.0;

    /// Accept a rating within 0.0–5.0, otherwise `None`.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=Self::MAX).contains(&value)).then_some(Rating(value))
    }

    /// Accept a rating or fall back to [`DEFAULT_RATING`].
    ///
    /// Returns the rating and whether the fallback was used.
    pub fn or_default(value: Option<f64>) -> (Self, bool) {
        match value.and_then(Rating::new) {
            Some(rating) => (rating, false),
            None => (DEFAULT_RATING, true),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A bus operating company.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    pub name: String,
    pub rating: Rating,
    /// Districts the carrier serves, when the server lists them.
    pub coverage_districts: Vec<String>,
    pub official_address: Option<String>,
    pub contact_info: Option<String>,
}

impl Carrier {
    /// Create a carrier with only a name and rating.
    pub fn new(name: impl Into<String>, rating: Rating) -> Self {
        Self {
            name: name.into(),
            rating,
            coverage_districts: Vec::new(),
            official_address: None,
            contact_info: None,
        }
    }

    /// Selector label, e.g. `Hanif (Rating: 4.5⭐)`.
    pub fn label(&self) -> String {
        format!("{} (Rating: {}⭐)", self.name, self.rating)
    }
}

/// Detailed profile of a carrier, merged from the provider database and
/// the question-answering corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderProfile {
    pub name: String,
    pub coverage_districts: Vec<String>,
    pub official_address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub privacy_policy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_range() {
        assert!(Rating::new(0.0).is_some());
        assert!(Rating::new(5.0).is_some());
        assert!(Rating::new(5.01).is_none());
        assert!(Rating::new(-0.5).is_none());
        assert!(Rating::new(f64::NAN).is_none());
    }

    #[test]
    fn rating_defaults() {
        assert_eq!(Rating::or_default(None), (DEFAULT_RATING, true));
        assert_eq!(Rating::or_default(Some(9.0)), (DEFAULT_RATING, true));

        let (rating, defaulted) = Rating::or_default(Some(4.6));
        assert_eq!(rating.value(), 4.6);
        assert!(!defaulted);
    }

    #[test]
    fn carrier_label() {
        let carrier = Carrier::new("Hanif", DEFAULT_RATING);
        assert_eq!(carrier.label(), "Hanif (Rating: 4.0⭐)");

        let carrier = Carrier::new("Green Line", Rating::new(4.56).unwrap());
        assert_eq!(carrier.label(), "Green Line (Rating: 4.6⭐)");
    }
}
