//! Booking service wire types.
//!
//! These mirror the JSON shapes of the booking service. They are kept
//! permissive (optional fields default) and converted to validated domain
//! types in `convert`.

use serde::{Deserialize, Serialize};

/// Entry in `GET /api/districts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictDto {
    pub name: String,
    #[serde(default)]
    pub dropping_points: Vec<DroppingPointDto>,
}

/// Dropping point nested in a district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppingPointDto {
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Entry in `GET /api/bus-providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub coverage_districts: Option<Vec<String>>,
    #[serde(default)]
    pub official_address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}

/// Entry in `GET /api/search-buses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusOfferDto {
    pub provider: String,
    pub from_district: String,
    pub to_district: String,
    pub fare: f64,
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(default)]
    pub total_seats: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub seat_class: Option<String>,
    #[serde(default)]
    pub departure_times: Option<Vec<String>>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequestDto {
    pub customer_name: String,
    pub customer_phone: String,
    pub from_district: String,
    pub to_district: String,
    pub bus_provider: String,
    pub travel_date: String,
    pub dropping_point: String,
}

/// Booking as returned by `POST /api/bookings` and `GET /api/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDto {
    pub booking_reference: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub from_district: String,
    pub to_district: String,
    pub bus_provider: String,
    #[serde(default)]
    pub dropping_point: Option<String>,
    pub travel_date: String,
    pub fare: f64,
    pub status: String,
    pub booking_date: String,
}

/// Body of `POST /api/rag-query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagQueryDto {
    pub query: String,
}

/// Response of `POST /api/rag-query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponseDto {
    #[serde(default)]
    pub results: Vec<RagResultDto>,
}

/// One ranked answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResultDto {
    pub provider: String,
    #[serde(default)]
    pub contact_info: Option<ContactInfoDto>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub relevance_score: f64,
}

/// Contact details extracted from a provider document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfoDto {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Response of `GET /api/provider-details/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDetailsDto {
    pub name: String,
    #[serde(default)]
    pub coverage_districts: Option<Vec<String>>,
    #[serde(default)]
    pub official_address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub privacy_policy: Option<String>,
}
