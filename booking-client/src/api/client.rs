//! Booking service HTTP client.
//!
//! Provides async methods for every endpoint the booking workflow uses.
//! Handles timeouts, concurrency limiting, error classification and
//! conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BusOffer, Carrier, District, ProviderProfile,
};

use super::BookingApi;
use super::convert::{
    convert_all, convert_answer, convert_booking, convert_carrier, convert_district,
    convert_offer, convert_profile,
};
use super::error::ApiError;
use super::request::{BookingSubmission, RouteQuery};
use super::types::{
    BookingDto, BusOfferDto, CarrierDto, DistrictDto, ProviderDetailsDto, RagQueryDto,
    RagResponseDto,
};

/// Default base URL for a locally running booking service.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 6;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the booking service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking service, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl ClientConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Read `BOOKING_API_URL` and `BOOKING_API_TIMEOUT_SECS`, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BOOKING_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);
        if let Some(secs) = std::env::var("BOOKING_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// The timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Booking service API client.
///
/// Uses a semaphore to cap concurrent requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Status {
                status: 0,
                body: "Semaphore closed".to_string(),
            })?;

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), body));
        }

        response.text().await.map_err(classify_transport)
    }

    /// Send a request and decode the JSON body of a 2xx response.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

fn classify_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Http(err)
    }
}

impl BookingApi for ApiClient {
    async fn districts(&self) -> Result<Vec<District>, ApiError> {
        let dtos: Vec<DistrictDto> = self
            .send_json(self.http.get(self.url("/api/districts")))
            .await?;
        Ok(convert_all(dtos, convert_district)?)
    }

    async fn carriers(&self) -> Result<Vec<Carrier>, ApiError> {
        let dtos: Vec<CarrierDto> = self
            .send_json(self.http.get(self.url("/api/bus-providers")))
            .await?;
        Ok(convert_all(dtos, convert_carrier)?)
    }

    async fn search(&self, query: &RouteQuery) -> Result<Vec<BusOffer>, ApiError> {
        let request = self
            .http
            .get(self.url("/api/search-buses"))
            .query(&query.query_pairs());
        let dtos: Vec<BusOfferDto> = self.send_json(request).await?;
        Ok(convert_all(dtos, convert_offer)?)
    }

    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError> {
        let request = self
            .http
            .post(self.url("/api/bookings"))
            .json(&submission.to_dto());
        let dto: BookingDto = self.send_json(request).await?;
        Ok(convert_booking(dto)?)
    }

    async fn bookings(&self, search: Option<&str>) -> Result<Vec<Booking>, ApiError> {
        let mut request = self.http.get(self.url("/api/bookings"));
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }
        let dtos: Vec<BookingDto> = self.send_json(request).await?;
        Ok(convert_all(dtos, convert_booking)?)
    }

    async fn cancel_booking(&self, reference: &BookingReference) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/bookings/{}/cancel", reference.as_str()));
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    async fn ask(&self, query: &str) -> Result<Vec<AnsweredExcerpt>, ApiError> {
        let body = RagQueryDto {
            query: query.to_string(),
        };
        let request = self.http.post(self.url("/api/rag-query")).json(&body);
        let response: RagResponseDto = self.send_json(request).await?;
        Ok(response.results.into_iter().map(convert_answer).collect())
    }

    async fn provider_details(&self, name: &str) -> Result<ProviderProfile, ApiError> {
        let mut url = reqwest::Url::parse(&self.url("/api/provider-details/")).map_err(|e| {
            ApiError::Status {
                status: 0,
                body: format!("invalid base URL: {e}"),
            }
        })?;
        // Provider names contain spaces ("Green Line"); push_segment escapes them.
        url.path_segments_mut()
            .map_err(|_| ApiError::Status {
                status: 0,
                body: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(name);
        debug!(%url, "fetching provider profile");

        let dto: ProviderDetailsDto = self.send_json(self.http.get(url)).await?;
        Ok(convert_profile(dto)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ClientConfig::new("http://localhost:9000/")
            .with_timeout(5)
            .with_max_concurrent(2);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
    }

    #[test]
    fn client_creation() {
        let client = ApiClient::new(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn decode_error_keeps_body_prefix() {
        let err = decode::<Vec<DistrictDto>>("<html>oops</html>").unwrap_err();
        match err {
            ApiError::Json { body, .. } => assert_eq!(body.as_deref(), Some("<html>oops</html>")),
            other => panic!("expected Json error, got {other:?}"),
        }
    }
}
