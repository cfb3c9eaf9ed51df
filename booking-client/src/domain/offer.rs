//! Bus offers returned by route search.

use super::Fare;
use super::carrier::Rating;

/// One bus offer between two districts.
///
/// Origin and destination are expected to differ but this is not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct BusOffer {
    pub provider: String,
    pub origin: String,
    pub destination: String,
    pub fare: Fare,
    pub available_seats: Option<u32>,
    pub total_seats: Option<u32>,
    pub rating: Option<Rating>,
    pub seat_class: Option<String>,
    pub departure_times: Vec<String>,
    pub duration_hours: Option<f64>,
    pub distance_km: Option<f64>,
    pub contact: Option<String>,
}

impl BusOffer {
    /// Create an offer with only the required fields set.
    pub fn new(
        provider: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        fare: Fare,
    ) -> Self {
        Self {
            provider: provider.into(),
            origin: origin.into(),
            destination: destination.into(),
            fare,
            available_seats: None,
            total_seats: None,
            rating: None,
            seat_class: None,
            departure_times: Vec::new(),
            duration_hours: None,
            distance_km: None,
            contact: None,
        }
    }

    /// The "book now" action for this offer.
    pub fn book_now(&self) -> Prefill {
        Prefill {
            provider: self.provider.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            fare: self.fare,
        }
    }

    /// Route label, e.g. `Dhaka → Chittagong`.
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    /// Seat availability for display; `N/A` when unknown.
    pub fn seats_label(&self) -> String {
        match self.available_seats {
            Some(n) => n.to_string(),
            None => "N/A".to_string(),
        }
    }

    /// Rating for display, falling back to the carrier default.
    pub fn rating_label(&self) -> String {
        let rating = self.rating.unwrap_or(super::carrier::DEFAULT_RATING);
        format!("{rating} / 5.0")
    }
}

/// Route and carrier carried from a search result into the booking form.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefill {
    pub provider: String,
    pub origin: String,
    pub destination: String,
    pub fare: Fare,
}
