//! Caching layer for provider profile lookups.
//!
//! Provider profiles change rarely but are requested repeatedly while a
//! user reads through answers. Everything else passes straight through:
//! reference data is loaded once per session, and searches, bookings and
//! answers must always reflect the server.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::api::{ApiError, BookingApi, BookingSubmission, RouteQuery};
use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BusOffer, Carrier, District, ProviderProfile,
};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached profiles.
    pub ttl: Duration,

    /// Maximum number of cached profiles.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 256,
        }
    }
}

/// Normalise a provider name into a cache key.
fn profile_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Booking API with cached provider profiles.
///
/// Wraps any `BookingApi` implementation.
pub struct CachedBookingApi<A> {
    inner: A,
    profiles: MokaCache<String, ProviderProfile>,
}

impl<A: BookingApi> CachedBookingApi<A> {
    /// Create a new cached client.
    pub fn new(inner: A, config: &CacheConfig) -> Self {
        let profiles = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, profiles }
    }

    /// Access the underlying client.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Number of cached profiles (for monitoring).
    pub fn cached_profiles(&self) -> u64 {
        self.profiles.entry_count()
    }

    /// Invalidate all cached profiles.
    pub fn invalidate_all(&self) {
        self.profiles.invalidate_all();
    }
}

impl<A: BookingApi> BookingApi for CachedBookingApi<A> {
    async fn districts(&self) -> Result<Vec<District>, ApiError> {
        self.inner.districts().await
    }

    async fn carriers(&self) -> Result<Vec<Carrier>, ApiError> {
        self.inner.carriers().await
    }

    async fn search(&self, query: &RouteQuery) -> Result<Vec<BusOffer>, ApiError> {
        self.inner.search(query).await
    }

    async fn create_booking(&self, submission: &BookingSubmission) -> Result<Booking, ApiError> {
        self.inner.create_booking(submission).await
    }

    async fn bookings(&self, search: Option<&str>) -> Result<Vec<Booking>, ApiError> {
        self.inner.bookings(search).await
    }

    async fn cancel_booking(&self, reference: &BookingReference) -> Result<(), ApiError> {
        self.inner.cancel_booking(reference).await
    }

    async fn ask(&self, query: &str) -> Result<Vec<AnsweredExcerpt>, ApiError> {
        self.inner.ask(query).await
    }

    async fn provider_details(&self, name: &str) -> Result<ProviderProfile, ApiError> {
        let key = profile_key(name);

        // Try cache first
        if let Some(cached) = self.profiles.get(&key).await {
            return Ok(cached);
        }

        // Failures are not cached
        let profile = self.inner.provider_details(name).await?;
        self.profiles.insert(key, profile.clone()).await;

        Ok(profile)
    }
}
