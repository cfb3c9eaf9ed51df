//! In-memory booking service for tests and offline development.
//!
//! Serves reference data, routes and answers from memory (optionally
//! loaded from JSON fixture files), applies the same server-side rules as
//! the real service, and records every call it receives.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;

use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BookingStatus, BusOffer, Carrier, District, Fare,
    ProviderProfile,
};

use super::BookingApi;
use super::convert::{
    convert_all, convert_answer, convert_booking, convert_carrier, convert_district, convert_offer,
};
use super::error::ApiError;
use super::request::{ApiRequest, BookingSubmission, Endpoint, RouteQuery};
use super::types::{BookingDto, BusOfferDto, CarrierDto, DistrictDto, RagResultDto};

/// Fare charged when no route matches a booking (mirrors the live service).
const FALLBACK_FARE: f64 = 400.0;

/// Maximum number of answers returned per question.
const MAX_ANSWERS: usize = 3;

#[derive(Default)]
struct MockState {
    districts: Vec<District>,
    carriers: Vec<Carrier>,
    offers: Vec<BusOffer>,
    bookings: Vec<Booking>,
    answers: Vec<AnsweredExcerpt>,
    profiles: Vec<ProviderProfile>,
    failures: HashMap<Endpoint, VecDeque<ApiError>>,
    latency: HashMap<Endpoint, Duration>,
    calls: Vec<ApiRequest>,
    next_reference: u32,
    clock: Option<NaiveDateTime>,
}

/// Mock booking service.
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions after handing a clone to the driver.
#[derive(Clone, Default)]
pub struct MockBookingApi {
    state: Arc<Mutex<MockState>>,
}

impl MockBookingApi {
    /// Create an empty mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Expects `districts.json`; `bus-providers.json`, `routes.json`,
    /// `bookings.json` and `answers.json` are optional. Files use the
    /// service's wire format.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let dir = dir.as_ref();

        let districts: Vec<DistrictDto> = read_fixture(dir, "districts.json")?.ok_or_else(|| {
            ApiError::Status {
                status: 0,
                body: format!("no districts.json in {}", dir.display()),
            }
        })?;
        let carriers: Vec<CarrierDto> = read_fixture(dir, "bus-providers.json")?.unwrap_or_default();
        let offers: Vec<BusOfferDto> = read_fixture(dir, "routes.json")?.unwrap_or_default();
        let bookings: Vec<BookingDto> = read_fixture(dir, "bookings.json")?.unwrap_or_default();
        let answers: Vec<RagResultDto> = read_fixture(dir, "answers.json")?.unwrap_or_default();

        Ok(Self::new()
            .with_districts(convert_all(districts, convert_district)?)
            .with_carriers(convert_all(carriers, convert_carrier)?)
            .with_offers(convert_all(offers, convert_offer)?)
            .with_bookings(convert_all(bookings, convert_booking)?)
            .with_answers(answers.into_iter().map(convert_answer).collect()))
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_districts(self, districts: Vec<District>) -> Self {
        self.lock().districts = districts;
        self
    }

    pub fn with_carriers(self, carriers: Vec<Carrier>) -> Self {
        self.lock().carriers = carriers;
        self
    }

    pub fn with_offers(self, offers: Vec<BusOffer>) -> Self {
        self.lock().offers = offers;
        self
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        self.lock().bookings = bookings;
        self
    }

    pub fn with_answers(self, answers: Vec<AnsweredExcerpt>) -> Self {
        self.lock().answers = answers;
        self
    }

    pub fn with_profiles(self, profiles: Vec<ProviderProfile>) -> Self {
        self.lock().profiles = profiles;
        self
    }

    /// Fix the creation timestamp assigned to new bookings.
    pub fn with_clock(self, now: NaiveDateTime) -> Self {
        self.lock().clock = Some(now);
        self
    }

    /// Make the next call to `endpoint` fail with `error`.
    ///
    /// Failures queue up: each call consumes one.
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Delay every response from `endpoint`.
    pub fn set_latency(&self, endpoint: Endpoint, latency: Duration) {
        self.lock().latency.insert(endpoint, latency);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    /// Number of calls received by `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    /// The server-side booking list.
    pub fn stored_bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Record the call, then apply configured latency and failures.
    async fn begin(&self, request: ApiRequest) -> Result<(), ApiError> {
        let endpoint = request.endpoint();
        let (latency, failure) = {
            let mut state = self.lock();
            state.calls.push(request);
            let latency = state.latency.get(&endpoint).copied();
            let failure = state
                .failures
                .get_mut(&endpoint)
                .and_then(VecDeque::pop_front);
            (latency, failure)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn read_fixture<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, ApiError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path).map_err(|e| ApiError::Status {
        status: 0,
        body: format!("Failed to read {}: {}", path.display(), e),
    })?;

    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| ApiError::Json {
            message: format!("Failed to parse {}: {}", path.display(), e),
            body: None,
        })
}

fn not_found(detail: &str) -> ApiError {
    ApiError::NotFound {
        detail: detail.to_string(),
    }
}

impl BookingApi for MockBookingApi {
    async fn districts(&self) -> Result<Vec<District>, ApiError> {
        self.begin(ApiRequest::LoadDistricts).await?;
        Ok(self.lock().districts.clone())
    }

    async fn carriers(&self) -> Result<Vec<Carrier>, ApiError> {
        self.begin(ApiRequest::LoadCarriers).await?;
        Ok(self.lock().carriers.clone())
    }

    async fn search(&self, query: &RouteQuery) -> Result<Vec<BusOffer>, ApiError> {
        self.begin(ApiRequest::Search(query.clone())).await?;
        let state = self.lock();

        let known = |name: &str| state.districts.iter().any(|d| d.name() == name);
        if !known(&query.origin) || !known(&query.destination) {
            return Err(not_found("District not found"));
        }

        Ok(state
            .offers
            .iter()
            .filter(|o| o.origin == query.origin && o.destination == query.destination)
            .filter(|o| query.max_fare.is_none_or(|max| o.fare <= max))
            .cloned()
            .collect())
    }

    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError> {
        self.begin(ApiRequest::CreateBooking(submission.clone()))
            .await?;
        let mut state = self.lock();

        let known = |name: &str| state.districts.iter().any(|d| d.name() == name);
        let carrier_known = state.carriers.iter().any(|c| c.name == submission.provider);
        if !known(&submission.origin) || !known(&submission.destination) || !carrier_known {
            return Err(not_found("District or provider not found"));
        }

        let fare = state
            .offers
            .iter()
            .find(|o| {
                o.origin == submission.origin
                    && o.destination == submission.destination
                    && o.provider == submission.provider
            })
            .map(|o| o.fare)
            .map_or_else(|| Fare::new(FALLBACK_FARE), Ok)?;

        state.next_reference += 1;
        let reference = BookingReference::parse(&format!("BK{:08}", state.next_reference))?;
        let booked_at = state
            .clock
            .unwrap_or_else(|| chrono::Local::now().naive_local());

        let booking = Booking {
            reference,
            customer_name: submission.customer_name.clone(),
            customer_phone: submission.customer_phone.clone(),
            origin: submission.origin.clone(),
            destination: submission.destination.clone(),
            provider: submission.provider.clone(),
            travel_date: submission.travel_date,
            dropping_point: Some(submission.dropping_point.clone()).filter(|p| !p.is_empty()),
            fare,
            status: BookingStatus::Active,
            booked_at,
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn bookings(&self, search: Option<&str>) -> Result<Vec<Booking>, ApiError> {
        self.begin(ApiRequest::ListBookings(search.map(str::to_string)))
            .await?;
        let state = self.lock();

        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| match search {
                Some(term) => {
                    b.customer_phone == term || b.reference.as_str().eq_ignore_ascii_case(term)
                }
                None => true,
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(bookings)
    }

    async fn cancel_booking(&self, reference: &BookingReference) -> Result<(), ApiError> {
        self.begin(ApiRequest::CancelBooking(reference.clone()))
            .await?;
        let mut state = self.lock();

        let booking = state
            .bookings
            .iter_mut()
            .find(|b| &b.reference == reference)
            .ok_or_else(|| not_found("Booking not found"))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(ApiError::Server {
                status: 400,
                detail: "Booking already cancelled".to_string(),
            });
        }

        booking.status = BookingStatus::Cancelled;
        Ok(())
    }

    async fn ask(&self, query: &str) -> Result<Vec<AnsweredExcerpt>, ApiError> {
        self.begin(ApiRequest::Ask(query.to_string())).await?;
        let state = self.lock();

        let words: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let mut matches: Vec<AnsweredExcerpt> = state
            .answers
            .iter()
            .filter(|a| {
                let provider = a.provider.to_lowercase();
                let excerpt = a.excerpt.to_lowercase();
                words
                    .iter()
                    .any(|w| provider.contains(w.as_str()) || excerpt.contains(w.as_str()))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.relevance.score().total_cmp(&a.relevance.score()));
        matches.truncate(MAX_ANSWERS);
        Ok(matches)
    }

    async fn provider_details(&self, name: &str) -> Result<ProviderProfile, ApiError> {
        self.begin(ApiRequest::ProviderDetails(name.to_string()))
            .await?;
        let needle = name.to_lowercase();
        self.lock()
            .profiles
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .ok_or_else(|| not_found("Provider not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DroppingPoint, Rating, Relevance};
    use chrono::NaiveDate;

    fn fare(n: f64) -> Fare {
        Fare::new(n).unwrap()
    }

    fn mock() -> MockBookingApi {
        MockBookingApi::new()
            .with_districts(vec![
                District::new(
                    "Dhaka",
                    vec![DroppingPoint::new("Gabtoli", fare(50.0)).unwrap()],
                )
                .unwrap(),
                District::new("Sylhet", vec![]).unwrap(),
            ])
            .with_carriers(vec![Carrier::new("Hanif", Rating::new(4.5).unwrap())])
            .with_offers(vec![
                BusOffer::new("Hanif", "Dhaka", "Sylhet", fare(650.0)),
                BusOffer::new("Shyamoli", "Dhaka", "Sylhet", fare(900.0)),
            ])
    }

    fn submission() -> BookingSubmission {
        BookingSubmission {
            customer_name: "Rahim".into(),
            customer_phone: "01700000000".into(),
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            provider: "Hanif".into(),
            travel_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            dropping_point: String::new(),
            quoted_fare: None,
        }
    }

    #[tokio::test]
    async fn search_applies_fare_ceiling() {
        let api = mock();
        let query = RouteQuery {
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            max_fare: Some(fare(700.0)),
        };
        let offers = api.search(&query).await.unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].provider, "Hanif");
    }

    #[tokio::test]
    async fn search_unknown_district_is_not_found() {
        let api = mock();
        let query = RouteQuery {
            origin: "Dhaka".into(),
            destination: "Atlantis".into(),
            max_fare: None,
        };
        let err = api.search(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_booking_uses_route_fare() {
        let api = mock();
        let booking = api.create_booking(&submission()).await.unwrap();
        assert_eq!(booking.fare, fare(650.0));
        assert_eq!(booking.reference.as_str(), "BK00000001");
        assert_eq!(booking.status, BookingStatus::Active);
        assert_eq!(api.stored_bookings().len(), 1);
    }

    #[tokio::test]
    async fn cancel_twice_is_rejected() {
        let api = mock();
        let booking = api.create_booking(&submission()).await.unwrap();

        api.cancel_booking(&booking.reference).await.unwrap();
        let err = api.cancel_booking(&booking.reference).await.unwrap_err();
        assert_eq!(err.detail(), Some("Booking already cancelled"));
    }

    #[tokio::test]
    async fn list_filters_by_phone_or_reference() {
        let api = mock();
        let booking = api.create_booking(&submission()).await.unwrap();

        assert_eq!(api.bookings(Some("01700000000")).await.unwrap().len(), 1);
        assert_eq!(
            api.bookings(Some(&booking.reference.as_str().to_lowercase()))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(api.bookings(Some("01900000000")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let api = mock();
        api.fail_next(Endpoint::Districts, ApiError::Timeout);

        assert!(api.districts().await.is_err());
        assert_eq!(api.districts().await.unwrap().len(), 2);
        assert_eq!(api.call_count(Endpoint::Districts), 2);
    }

    #[tokio::test]
    async fn ask_matches_provider_names() {
        let api = mock().with_answers(vec![
            AnsweredExcerpt {
                provider: "Hanif".into(),
                contact: None,
                excerpt: "Hanif Enterprise runs daily coaches.".into(),
                relevance: Relevance::new(0.8),
            },
            AnsweredExcerpt {
                provider: "Green Line".into(),
                contact: None,
                excerpt: "Green Line operates AC coaches.".into(),
                relevance: Relevance::new(0.6),
            },
        ]);

        let answers = api.ask("hanif").await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].provider, "Hanif");
        assert_eq!(api.calls(), vec![ApiRequest::Ask("hanif".into())]);
    }

    #[tokio::test]
    async fn load_fixture_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("districts.json"),
            r#"[{"name": "Dhaka", "dropping_points": [{"name": "Gabtoli", "price": 50}]}, {"name": "Chittagong", "dropping_points": []}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("bus-providers.json"),
            r#"[{"name": "Hanif"}]"#,
        )
        .unwrap();

        let api = MockBookingApi::from_dir(dir.path()).unwrap();
        let districts = api.districts().await.unwrap();
        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].dropping_points()[0].name, "Gabtoli");
        assert_eq!(api.carriers().await.unwrap()[0].rating.value(), 4.0);
    }

    #[test]
    fn missing_districts_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockBookingApi::from_dir(dir.path()).is_err());
    }
}
