//! Booking service client.
//!
//! This module is the boundary to the bus booking backend: the
//! [`BookingApi`] trait the workflow is written against, an HTTP
//! implementation ([`ApiClient`]), and an in-memory implementation
//! ([`MockBookingApi`]) for tests and offline development.
//!
//! Key characteristics of the backend:
//! - District and carrier names are the identity keys; there are no ids
//! - Search filtering (including the fare ceiling) is done server-side
//! - Error bodies carry an optional `detail` string meant for users

mod client;
mod convert;
mod error;
mod mock;
mod request;
mod types;


pub use client::{ApiClient, ClientConfig};
pub use convert::{
    convert_answer, convert_booking, convert_carrier, convert_district, convert_offer,
    convert_profile,
};
pub use error::ApiError;
pub use mock::MockBookingApi;
pub use request::{ApiRequest, BookingSubmission, Endpoint, RouteQuery};
pub use types::{
    BookingDto, BookingRequestDto, BusOfferDto, CarrierDto, ContactInfoDto, DistrictDto,
    DroppingPointDto, ProviderDetailsDto, RagQueryDto, RagResponseDto, RagResultDto,
};

use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BusOffer, Carrier, District, ProviderProfile,
};

/// Operations offered by the booking service.
///
/// The workflow driver runs on a single task, so implementations are not
/// required to return `Send` futures.
#[allow(async_fn_in_trait)]
pub trait BookingApi {
    /// `GET /api/districts`
    async fn districts(&self) -> Result<Vec<District>, ApiError>;

    /// `GET /api/bus-providers`
    async fn carriers(&self) -> Result<Vec<Carrier>, ApiError>;

    /// `GET /api/search-buses`
    async fn search(&self, query: &RouteQuery) -> Result<Vec<BusOffer>, ApiError>;

    /// `POST /api/bookings`
    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError>;

    /// `GET /api/bookings`, optionally filtered by phone or reference.
    async fn bookings(&self, search: Option<&str>) -> Result<Vec<Booking>, ApiError>;

    /// `POST /api/bookings/{reference}/cancel`
    async fn cancel_booking(&self, reference: &BookingReference) -> Result<(), ApiError>;

    /// `POST /api/rag-query`
    async fn ask(&self, query: &str) -> Result<Vec<AnsweredExcerpt>, ApiError>;

    /// `GET /api/provider-details/{name}`
    async fn provider_details(&self, name: &str) -> Result<ProviderProfile, ApiError>;
}
