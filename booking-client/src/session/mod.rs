//! The booking session state machine.
//!
//! [`Session::handle`] is a pure transition from one [`Event`] to the
//! [`Effect`]s the driver must carry out. All state lives here and is
//! only touched from the single control loop feeding it events.

mod ask;
mod booking;
mod error;
mod event;
mod lookup;
mod navigator;
mod outbox;
mod search;
mod timing;


pub use ask::{AnswerPanel, AskController, NOTHING_FOUND_HINT, ProfilePanel};
pub use booking::{
    BookingController, BookingForm, Confirmation, DROPPING_POINT_PLACEHOLDER, DroppingOption,
};
pub use error::ClientError;
pub use event::{BookingEdit, Effect, Event};
pub use lookup::{BookingList, CANCEL_PROMPT, LookupController};
pub use navigator::{Navigator, Settled, View};
pub use search::{SearchController, SearchForm, SearchResults};
pub use timing::Timing;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::ApiRequest;
use crate::domain::{Carrier, District, Prefill};
use crate::notify::NotificationQueue;
use crate::reference::ReferenceCache;

use outbox::Outbox;

/// Input field that receives focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    BookingSearch,
}

pub struct Session {
    timing: Timing,
    navigator: Navigator,
    reference: ReferenceCache,
    search: SearchController,
    booking: BookingController,
    lookup: LookupController,
    ask: AskController,
    notifications: NotificationQueue,
    /// Applied when the pending navigation to the book view settles.
    pending_prefill: Option<Prefill>,
    focus: Option<Focus>,
}

impl Session {
    /// `today` is the earliest bookable travel date.
    pub fn new(timing: Timing, today: NaiveDate) -> Self {
        Self {
            timing,
            navigator: Navigator::new(),
            reference: ReferenceCache::default(),
            search: SearchController::default(),
            booking: BookingController::new(today),
            lookup: LookupController::default(),
            ask: AskController::default(),
            notifications: NotificationQueue::new(),
            pending_prefill: None,
            focus: None,
        }
    }

    /// A session whose earliest travel date is the local date now.
    pub fn starting_today(timing: Timing) -> Self {
        Self::new(timing, chrono::Local::now().date_naive())
    }

    /// Apply one event and return the effects it produces.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut out = Outbox::default();
        self.apply(event, &mut out);

        let Outbox {
            mut effects,
            notices,
        } = out;
        for (message, severity) in notices {
            debug!(%severity, %message, "notification");
            let id = self.notifications.push(message, severity);
            effects.push(Effect::ExpireNotification {
                id,
                after: self.timing.notification_ttl,
            });
        }
        effects
    }

    fn apply(&mut self, event: Event, out: &mut Outbox) {
        match event {
            Event::Start => {
                out.request(ApiRequest::LoadDistricts);
                out.request(ApiRequest::LoadCarriers);
            }
            Event::LoadDistricts => out.request(ApiRequest::LoadDistricts),
            Event::LoadCarriers => out.request(ApiRequest::LoadCarriers),
            Event::DistrictsLoaded(result) => self.districts_loaded(result, out),
            Event::CarriersLoaded(result) => self.carriers_loaded(result, out),

            Event::Navigate(view) => self.navigate(view, out),
            Event::NavigationSettled { generation } => self.settle(generation, out),
            Event::FocusDue { generation } => {
                if self.navigator.is_idle_at(generation) && self.navigator.current() == View::Manage
                {
                    self.focus = Some(Focus::BookingSearch);
                }
            }
            Event::NotificationExpired(id) => {
                self.notifications.expire(id);
            }

            Event::Search(form) => {
                let result = self.search.submit(&form, out);
                report(result, out);
            }
            Event::SearchCompleted(result) => self.search.complete(result, out),
            Event::QuickBook(prefill) => {
                self.navigate(View::Book, out);
                self.pending_prefill = Some(prefill);
            }

            Event::EditBooking(edit) => {
                let result = self.booking.edit(edit, self.reference.districts());
                report(result, out);
            }
            Event::SubmitBooking => {
                let result = self.booking.submit(out);
                report(result, out);
            }
            Event::BookingSubmitted(result) => self.booking.complete(result, out),

            Event::LoadBookings { search } => self.lookup.load(&search, out),
            Event::BookingsLoaded(result) => self.lookup.loaded(result, out),
            Event::CancelRequested(reference) => {
                self.lookup.request_cancel(reference);
            }
            Event::ConfirmCancel(confirmed) => self.lookup.confirm(confirmed, out),
            Event::CancelCompleted { reference, result } => {
                self.lookup.cancelled(&reference, result, out)
            }

            Event::Ask(question) => {
                let result = self.ask.ask(&question, out);
                report(result, out);
            }
            Event::AnswersReceived(result) => self.ask.answered(result, out),
            Event::LoadProfile(name) => {
                let result = self.ask.load_profile(&name, out);
                report(result, out);
            }
            Event::ProfileLoaded { name, result } => self.ask.profile_loaded(&name, result, out),
        }
    }

    fn districts_loaded(&mut self, result: Result<Vec<District>, ClientError>, out: &mut Outbox) {
        let replaced = result.and_then(|list| {
            self.reference
                .replace_districts(list)
                .map_err(ClientError::from)
        });
        match replaced {
            Ok(count) => info!(count, "districts loaded"),
            Err(e) => {
                warn!(error = %e, "failed to load districts");
                out.error("Failed to load districts");
            }
        }
    }

    fn carriers_loaded(&mut self, result: Result<Vec<Carrier>, ClientError>, out: &mut Outbox) {
        let replaced = result.and_then(|list| {
            self.reference
                .replace_carriers(list)
                .map_err(ClientError::from)
        });
        match replaced {
            Ok(count) => info!(count, "bus providers loaded"),
            Err(e) => {
                warn!(error = %e, "failed to load bus providers");
                out.error("Failed to load bus providers");
            }
        }
    }

    fn navigate(&mut self, view: View, out: &mut Outbox) {
        let generation = self.navigator.navigate_to(view);
        if view != View::Book && self.pending_prefill.take().is_some() {
            debug!(%view, "pending prefill superseded");
        }
        self.focus = None;
        debug!(%view, generation, "navigating");
        out.schedule(self.timing.view_settle, Event::NavigationSettled { generation });
    }

    fn settle(&mut self, generation: u64, out: &mut Outbox) {
        let Some(Settled { from, to }) = self.navigator.settle(generation) else {
            debug!(generation, "ignoring stale navigation");
            return;
        };
        info!(%from, %to, "view changed");

        if from == View::Search && to != View::Search {
            self.search.clear();
        }
        match to {
            View::Book => {
                if let Some(prefill) = self.pending_prefill.take() {
                    self.booking
                        .apply_prefill(prefill, self.reference.districts());
                }
            }
            View::Manage => {
                out.schedule(self.timing.focus_delay, Event::FocusDue { generation });
            }
            View::Search | View::Ask => {}
        }
    }

    /// Global blocking indicator: a view transition or a booking
    /// submission is in progress.
    pub fn is_loading(&self) -> bool {
        self.navigator.is_transitioning() || self.booking.is_submitting()
    }

    pub fn current_view(&self) -> View {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn reference(&self) -> &ReferenceCache {
        &self.reference
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn booking(&self) -> &BookingController {
        &self.booking
    }

    pub fn lookup(&self) -> &LookupController {
        &self.lookup
    }

    pub fn ask(&self) -> &AskController {
        &self.ask
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}

/// Turn a rejected intent into its notification.
fn report(result: Result<(), ClientError>, out: &mut Outbox) {
    if let Err(e) = result {
        debug!(error = %e, "rejected");
        out.error(e.to_string());
    }
}
