//! Inputs to and outputs from the session state machine.

use std::time::Duration;

use crate::api::ApiRequest;
use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BusOffer, Carrier, District, Prefill,
    ProviderProfile,
};
use crate::notify::NotificationId;

use super::error::ClientError;
use super::navigator::View;
use super::search::SearchForm;

/// A single booking form field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEdit {
    CustomerName(String),
    CustomerPhone(String),
    Origin(String),
    Destination(String),
    Provider(String),
    /// ISO `YYYY-MM-DD`
    TravelDate(String),
    /// Empty clears the selection.
    DroppingPoint(String),
}

/// Something that happened: a user intent, a response, or a timer firing.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Load reference data. Sent once when the session starts.
    Start,
    LoadDistricts,
    LoadCarriers,
    DistrictsLoaded(Result<Vec<District>, ClientError>),
    CarriersLoaded(Result<Vec<Carrier>, ClientError>),

    Navigate(View),
    NavigationSettled {
        generation: u64,
    },
    FocusDue {
        generation: u64,
    },
    NotificationExpired(NotificationId),

    Search(SearchForm),
    SearchCompleted(Result<Vec<BusOffer>, ClientError>),
    /// "Book now" on a search result.
    QuickBook(Prefill),

    EditBooking(BookingEdit),
    SubmitBooking,
    BookingSubmitted(Result<Booking, ClientError>),

    LoadBookings {
        search: String,
    },
    BookingsLoaded(Result<Vec<Booking>, ClientError>),
    CancelRequested(BookingReference),
    /// The user's answer to the cancellation prompt.
    ConfirmCancel(bool),
    CancelCompleted {
        reference: BookingReference,
        result: Result<(), ClientError>,
    },

    Ask(String),
    AnswersReceived(Result<Vec<AnsweredExcerpt>, ClientError>),
    LoadProfile(String),
    ProfileLoaded {
        name: String,
        result: Result<ProviderProfile, ClientError>,
    },
}

/// Work the session asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call the booking service and feed the outcome back as an event.
    Request(ApiRequest),

    /// Feed `event` back after `after` has elapsed.
    Schedule { after: Duration, event: Event },

    /// Expire a notification after its display duration. Kept apart from
    /// [`Effect::Schedule`] so drivers can settle without waiting on it.
    ExpireNotification { id: NotificationId, after: Duration },
}

impl Effect {
    pub fn as_request(&self) -> Option<&ApiRequest> {
        match self {
            Effect::Request(request) => Some(request),
            Effect::Schedule { .. } | Effect::ExpireNotification { .. } => None,
        }
    }
}
