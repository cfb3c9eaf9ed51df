//! Outgoing requests to the booking service.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::{BookingReference, Fare, ISO_DATE};

use super::types::BookingRequestDto;

/// Route search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    /// Upper bound on fare, applied by the server.
    pub max_fare: Option<Fare>,
}

impl RouteQuery {
    /// Query string pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("from_district", self.origin.clone()),
            ("to_district", self.destination.clone()),
        ];
        if let Some(max_fare) = self.max_fare {
            pairs.push(("max_fare", max_fare.amount().to_string()));
        }
        pairs
    }
}

/// A validated booking ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSubmission {
    pub customer_name: String,
    pub customer_phone: String,
    pub origin: String,
    pub destination: String,
    pub provider: String,
    pub travel_date: NaiveDate,
    /// Empty when no dropping point was chosen.
    pub dropping_point: String,
    /// Fare quoted by the search result this booking was prefilled from.
    /// Never sent; the server computes the charged fare.
    pub quoted_fare: Option<Fare>,
}

impl BookingSubmission {
    /// Wire body for `POST /api/bookings`.
    pub fn to_dto(&self) -> BookingRequestDto {
        BookingRequestDto {
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            from_district: self.origin.clone(),
            to_district: self.destination.clone(),
            bus_provider: self.provider.clone(),
            travel_date: self.travel_date.format(ISO_DATE).to_string(),
            dropping_point: self.dropping_point.clone(),
        }
    }
}

/// Backend endpoint, used for logging and for fault injection in the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Districts,
    Carriers,
    Search,
    CreateBooking,
    ListBookings,
    CancelBooking,
    Ask,
    ProviderDetails,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Districts => "districts",
            Endpoint::Carriers => "bus_providers",
            Endpoint::Search => "search_buses",
            Endpoint::CreateBooking => "create_booking",
            Endpoint::ListBookings => "list_bookings",
            Endpoint::CancelBooking => "cancel_booking",
            Endpoint::Ask => "rag_query",
            Endpoint::ProviderDetails => "provider_details",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call to the booking service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadDistricts,
    LoadCarriers,
    Search(RouteQuery),
    CreateBooking(BookingSubmission),
    /// `None` requests the unfiltered list.
    ListBookings(Option<String>),
    CancelBooking(BookingReference),
    Ask(String),
    ProviderDetails(String),
}

impl ApiRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiRequest::LoadDistricts => Endpoint::Districts,
            ApiRequest::LoadCarriers => Endpoint::Carriers,
            ApiRequest::Search(_) => Endpoint::Search,
            ApiRequest::CreateBooking(_) => Endpoint::CreateBooking,
            ApiRequest::ListBookings(_) => Endpoint::ListBookings,
            ApiRequest::CancelBooking(_) => Endpoint::CancelBooking,
            ApiRequest::Ask(_) => Endpoint::Ask,
            ApiRequest::ProviderDetails(_) => Endpoint::ProviderDetails,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_omit_missing_fare() {
        let query = RouteQuery {
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            max_fare: None,
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("from_district", "Dhaka".to_string()),
                ("to_district", "Sylhet".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_include_fare() {
        let query = RouteQuery {
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            max_fare: Some(Fare::new(800.0).unwrap()),
        };
        assert_eq!(query.query_pairs()[2], ("max_fare", "800".to_string()));
    }

    #[test]
    fn submission_wire_body() {
        let submission = BookingSubmission {
            customer_name: "Rahim".into(),
            customer_phone: "01700000000".into(),
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            provider: "Hanif".into(),
            travel_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            dropping_point: String::new(),
            quoted_fare: Some(Fare::new(600.0).unwrap()),
        };
        let dto = submission.to_dto();
        assert_eq!(dto.travel_date, "2024-03-20");
        assert_eq!(dto.from_district, "Dhaka");
        assert_eq!(dto.bus_provider, "Hanif");
        assert_eq!(dto.dropping_point, "");
    }
}
