//! Booking lookup and cancellation.

use crate::api::ApiRequest;
use crate::domain::{Booking, BookingReference};

use super::error::ClientError;
use super::outbox::Outbox;

pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this booking?";

/// What the bookings list shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BookingList {
    #[default]
    NotLoaded,
    /// "No bookings found"
    Empty,
    Loaded(Vec<Booking>),
}

impl BookingList {
    pub fn bookings(&self) -> &[Booking] {
        match self {
            BookingList::Loaded(bookings) => bookings,
            BookingList::NotLoaded | BookingList::Empty => &[],
        }
    }

    fn find(&self, reference: &BookingReference) -> Option<&Booking> {
        self.bookings().iter().find(|b| &b.reference == reference)
    }
}

#[derive(Debug, Default)]
pub struct LookupController {
    list: BookingList,
    last_search: Option<String>,
    pending_cancel: Option<BookingReference>,
}

impl LookupController {
    /// Fetch bookings matching `search`; blank fetches all.
    pub(crate) fn load(&mut self, search: &str, out: &mut Outbox) {
        let term = search.trim();
        self.last_search = (!term.is_empty()).then(|| term.to_string());
        out.request(ApiRequest::ListBookings(self.last_search.clone()));
    }

    pub(crate) fn loaded(&mut self, result: Result<Vec<Booking>, ClientError>, out: &mut Outbox) {
        match result {
            Ok(bookings) if bookings.is_empty() => self.list = BookingList::Empty,
            Ok(bookings) => {
                tracing::debug!(count = bookings.len(), "bookings loaded");
                self.list = BookingList::Loaded(bookings);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load bookings");
                out.error("Failed to load bookings");
            }
        }
    }

    /// Ask for confirmation before cancelling. Returns false when the
    /// reference is not an active booking in the current list.
    pub(crate) fn request_cancel(&mut self, reference: BookingReference) -> bool {
        match self.list.find(&reference) {
            Some(booking) if booking.is_cancellable() => {
                self.pending_cancel = Some(reference);
                true
            }
            _ => {
                tracing::warn!(%reference, "cancel requested for a booking that is not active");
                false
            }
        }
    }

    pub(crate) fn confirm(&mut self, confirmed: bool, out: &mut Outbox) {
        let Some(reference) = self.pending_cancel.take() else {
            return;
        };
        if confirmed {
            tracing::info!(%reference, "cancelling booking");
            out.request(ApiRequest::CancelBooking(reference));
        } else {
            tracing::debug!(%reference, "cancellation declined");
        }
    }

    pub(crate) fn cancelled(
        &mut self,
        reference: &BookingReference,
        result: Result<(), ClientError>,
        out: &mut Outbox,
    ) {
        match result {
            Ok(()) => {
                tracing::info!(%reference, "booking cancelled");
                out.success("Booking cancelled successfully");
                out.request(ApiRequest::ListBookings(self.last_search.clone()));
            }
            Err(e) => {
                tracing::warn!(%reference, error = %e, "cancellation failed");
                out.error(e.user_message("Failed to cancel booking"));
            }
        }
    }

    pub fn list(&self) -> &BookingList {
        &self.list
    }

    pub fn last_search(&self) -> Option<&str> {
        self.last_search.as_deref()
    }

    /// Booking awaiting the user's answer to [`CANCEL_PROMPT`].
    pub fn pending_cancel(&self) -> Option<&BookingReference> {
        self.pending_cancel.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, Fare};
    use chrono::NaiveDate;

    fn booking(reference: &str, status: BookingStatus) -> Booking {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        Booking {
            reference: BookingReference::parse(reference).unwrap(),
            customer_name: "Rahim".into(),
            customer_phone: "01711111111".into(),
            origin: "Dhaka".into(),
            destination: "Chittagong".into(),
            provider: "Hanif".into(),
            travel_date: date,
            dropping_point: None,
            fare: Fare::new(750.0).unwrap(),
            status,
            booked_at: date.and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    fn loaded() -> LookupController {
        let mut controller = LookupController::default();
        let mut out = Outbox::default();
        controller.loaded(
            Ok(vec![
                booking("BK12345", BookingStatus::Active),
                booking("BK99999", BookingStatus::Cancelled),
            ]),
            &mut out,
        );
        controller
    }

    fn reference(s: &str) -> BookingReference {
        BookingReference::parse(s).unwrap()
    }

    #[test]
    fn blank_search_requests_everything() {
        let mut controller = LookupController::default();
        let mut out = Outbox::default();
        controller.load("   ", &mut out);
        assert_eq!(
            out.effects[0].as_request(),
            Some(&ApiRequest::ListBookings(None))
        );

        controller.load(" 0171 ", &mut out);
        assert_eq!(
            out.effects[1].as_request(),
            Some(&ApiRequest::ListBookings(Some("0171".into())))
        );
    }

    #[test]
    fn only_active_bookings_can_be_cancelled() {
        let mut controller = loaded();
        assert!(!controller.request_cancel(reference("BK99999")));
        assert!(!controller.request_cancel(reference("BK00000")));
        assert!(controller.request_cancel(reference("BK12345")));
        assert_eq!(controller.pending_cancel(), Some(&reference("BK12345")));
    }

    #[test]
    fn declining_issues_nothing() {
        let mut controller = loaded();
        let before = controller.list().clone();
        controller.request_cancel(reference("BK12345"));

        let mut out = Outbox::default();
        controller.confirm(false, &mut out);
        assert!(out.effects.is_empty());
        assert!(out.notices.is_empty());
        assert_eq!(controller.list(), &before);
        assert_eq!(controller.pending_cancel(), None);
    }

    #[test]
    fn failed_cancel_does_not_reload() {
        let mut controller = loaded();
        let mut out = Outbox::default();
        controller.cancelled(
            &reference("BK12345"),
            Err(ClientError::Server("Booking already cancelled".into())),
            &mut out,
        );
        assert!(out.effects.is_empty());
        assert_eq!(out.notices[0].0, "Booking already cancelled");
    }

    #[test]
    fn empty_result_is_distinct() {
        let mut controller = LookupController::default();
        let mut out = Outbox::default();
        controller.loaded(Ok(Vec::new()), &mut out);
        assert_eq!(controller.list(), &BookingList::Empty);
    }
}
