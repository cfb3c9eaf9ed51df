//! Route search.

use crate::api::{ApiRequest, RouteQuery};
use crate::domain::{BusOffer, Fare};

use super::error::ClientError;
use super::outbox::Outbox;

/// Search form contents as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub origin: String,
    pub destination: String,
    /// Blank for no limit.
    pub max_fare: String,
}

impl SearchForm {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            max_fare: String::new(),
        }
    }

    pub fn with_max_fare(mut self, max_fare: impl Into<String>) -> Self {
        self.max_fare = max_fare.into();
        self
    }

    /// Validate into a query.
    pub fn to_query(&self) -> Result<RouteQuery, ClientError> {
        let origin = self.origin.trim();
        let destination = self.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(ClientError::validation(
                "Please select both origin and destination",
            ));
        }

        let max_fare = match self.max_fare.trim() {
            "" => None,
            raw => {
                let amount = raw.parse::<f64>().map_err(|_| invalid_max_fare())?;
                Some(Fare::new(amount).map_err(|_| invalid_max_fare())?)
            }
        };

        Ok(RouteQuery {
            origin: origin.to_string(),
            destination: destination.to_string(),
            max_fare,
        })
    }
}

fn invalid_max_fare() -> ClientError {
    ClientError::validation("Maximum fare must be a non-negative number")
}

/// What the results area shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchResults {
    /// Nothing searched yet, or results discarded.
    #[default]
    Idle,
    /// The search succeeded with no matches.
    NoBuses,
    /// Matches in server order.
    Found(Vec<BusOffer>),
}

impl SearchResults {
    pub fn offers(&self) -> &[BusOffer] {
        match self {
            SearchResults::Found(offers) => offers,
            SearchResults::Idle | SearchResults::NoBuses => &[],
        }
    }

    /// Summary line, e.g. `Found 3 bus(es)`.
    pub fn summary(&self) -> Option<String> {
        match self {
            SearchResults::Idle => None,
            SearchResults::NoBuses => Some("No buses found for this route".to_string()),
            SearchResults::Found(offers) => Some(format!("Found {} bus(es)", offers.len())),
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchController {
    results: SearchResults,
    in_flight: usize,
}

impl SearchController {
    pub(crate) fn submit(&mut self, form: &SearchForm, out: &mut Outbox) -> Result<(), ClientError> {
        let query = form.to_query()?;
        tracing::info!(
            origin = %query.origin,
            destination = %query.destination,
            max_fare = ?query.max_fare.map(|f| f.amount()),
            "searching buses"
        );
        self.in_flight += 1;
        out.request(ApiRequest::Search(query));
        Ok(())
    }

    pub(crate) fn complete(&mut self, result: Result<Vec<BusOffer>, ClientError>, out: &mut Outbox) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(offers) if offers.is_empty() => self.results = SearchResults::NoBuses,
            Ok(offers) => {
                tracing::debug!(count = offers.len(), "search results");
                self.results = SearchResults::Found(offers);
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                out.error(e.user_message("Failed to search buses"));
            }
        }
    }

    /// Discard rendered results. A search still in flight will fill them
    /// again when it answers; the last response wins.
    pub(crate) fn clear(&mut self) {
        self.results = SearchResults::Idle;
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight > 0
    }
}
