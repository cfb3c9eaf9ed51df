//! Runs a [`Session`] against a booking service.
//!
//! The driver owns the session and every in-flight request and timer.
//! Completions are polled on the current task and fed back into
//! [`Session::handle`] one at a time, so state is never shared.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::api::{ApiError, ApiRequest, BookingApi};
use crate::session::{ClientError, Effect, Event, Session};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

type Pending = FuturesUnordered<LocalBoxFuture<'static, Event>>;

pub struct Driver<A> {
    api: Arc<A>,
    session: Session,
    request_timeout: Duration,
    /// Requests and view timers.
    work: Pending,
    /// Notification expiry timers. These never block [`Driver::settle`].
    expiries: Pending,
}

impl<A: BookingApi + 'static> Driver<A> {
    pub fn new(api: A, session: Session) -> Self {
        Self::with_shared(Arc::new(api), session)
    }

    pub fn with_shared(api: Arc<A>, session: Session) -> Self {
        Self {
            api,
            session,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            work: FuturesUnordered::new(),
            expiries: FuturesUnordered::new(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Number of outstanding requests and timers, expiries included.
    pub fn pending(&self) -> usize {
        self.work.len() + self.expiries.len()
    }

    /// Hand an event to the session and start the resulting effects.
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.session.handle(event) {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Request(request) => {
                let api = Arc::clone(&self.api);
                let limit = self.request_timeout;
                self.work.push(perform(api, request, limit).boxed_local());
            }
            Effect::Schedule { after, event } => {
                self.work.push(delayed(after, event).boxed_local());
            }
            Effect::ExpireNotification { id, after } => {
                self.expiries
                    .push(delayed(after, Event::NotificationExpired(id)).boxed_local());
            }
        }
    }

    /// Wait for the next completion and dispatch it.
    ///
    /// Returns false when nothing is outstanding.
    pub async fn step(&mut self) -> bool {
        let event = tokio::select! {
            biased;
            Some(event) = self.work.next(), if !self.work.is_empty() => event,
            Some(event) = self.expiries.next(), if !self.expiries.is_empty() => event,
            else => return false,
        };
        self.dispatch(event);
        true
    }

    /// Run until no requests or view timers remain. Notifications may
    /// still be visible afterwards.
    pub async fn settle(&mut self) {
        while !self.work.is_empty() {
            self.step().await;
        }
    }

    /// Run until nothing at all is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }
}

/// Yield `event` once `after` has elapsed, counted from now rather than
/// from the first poll.
fn delayed(after: Duration, event: Event) -> impl Future<Output = Event> {
    let deadline = tokio::time::Instant::now() + after;
    async move {
        tokio::time::sleep_until(deadline).await;
        event
    }
}

async fn timed<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ClientError> {
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result.map_err(ClientError::from),
        Err(_) => Err(ClientError::from(ApiError::Timeout)),
    }
}

/// Perform one request and turn its outcome into the matching event.
async fn perform<A: BookingApi>(api: Arc<A>, request: ApiRequest, limit: Duration) -> Event {
    let endpoint = request.endpoint();
    let started = tokio::time::Instant::now();

    let event = match request {
        ApiRequest::LoadDistricts => Event::DistrictsLoaded(timed(limit, api.districts()).await),
        ApiRequest::LoadCarriers => Event::CarriersLoaded(timed(limit, api.carriers()).await),
        ApiRequest::Search(query) => Event::SearchCompleted(timed(limit, api.search(&query)).await),
        ApiRequest::CreateBooking(submission) => {
            Event::BookingSubmitted(timed(limit, api.create_booking(&submission)).await)
        }
        ApiRequest::ListBookings(search) => {
            Event::BookingsLoaded(timed(limit, api.bookings(search.as_deref())).await)
        }
        ApiRequest::CancelBooking(reference) => {
            let result = timed(limit, api.cancel_booking(&reference)).await;
            Event::CancelCompleted { reference, result }
        }
        ApiRequest::Ask(question) => Event::AnswersReceived(timed(limit, api.ask(&question)).await),
        ApiRequest::ProviderDetails(name) => {
            let result = timed(limit, api.provider_details(&name)).await;
            Event::ProfileLoaded { name, result }
        }
    };

    let elapsed = started.elapsed();
    if is_failure(&event) {
        warn!(%endpoint, ?elapsed, "request failed");
    } else {
        debug!(%endpoint, ?elapsed, "request completed");
    }
    event
}

fn is_failure(event: &Event) -> bool {
    match event {
        Event::DistrictsLoaded(r) => r.is_err(),
        Event::CarriersLoaded(r) => r.is_err(),
        Event::SearchCompleted(r) => r.is_err(),
        Event::BookingSubmitted(r) => r.is_err(),
        Event::BookingsLoaded(r) => r.is_err(),
        Event::CancelCompleted { result, .. } => result.is_err(),
        Event::AnswersReceived(r) => r.is_err(),
        Event::ProfileLoaded { result, .. } => result.is_err(),
        Event::Start
        | Event::LoadDistricts
        | Event::LoadCarriers
        | Event::Navigate(_)
        | Event::NavigationSettled { .. }
        | Event::FocusDue { .. }
        | Event::NotificationExpired(_)
        | Event::Search(_)
        | Event::QuickBook(_)
        | Event::EditBooking(_)
        | Event::SubmitBooking
        | Event::LoadBookings { .. }
        | Event::CancelRequested(_)
        | Event::ConfirmCancel(_)
        | Event::Ask(_)
        | Event::LoadProfile(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, MockBookingApi};
    use crate::domain::{
        BookingReference, BookingStatus, BusOffer, Carrier, District, DroppingPoint, Fare, Rating,
    };
    use crate::notify::Severity;
    use crate::session::{BookingEdit, SearchForm, SearchResults, Timing, View};
    use chrono::NaiveDate;

    fn fare(amount: f64) -> Fare {
        Fare::new(amount).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn mock() -> MockBookingApi {
        MockBookingApi::new()
            .with_districts(vec![
                District::new(
                    "Dhaka",
                    vec![
                        DroppingPoint::new("Gabtoli", fare(50.0)).unwrap(),
                        DroppingPoint::new("Kamalapur", fare(30.0)).unwrap(),
                    ],
                )
                .unwrap(),
                District::new("Chittagong", Vec::new()).unwrap(),
            ])
            .with_carriers(vec![Carrier::new("Hanif", Rating::new(4.5).unwrap())])
            .with_offers(vec![BusOffer::new(
                "Hanif",
                "Chittagong",
                "Dhaka",
                fare(750.0),
            )])
            .with_clock(today().and_hms_opt(9, 0, 0).unwrap())
    }

    async fn started(api: MockBookingApi, timing: Timing) -> Driver<MockBookingApi> {
        let mut driver = Driver::new(api, Session::new(timing, today()));
        driver.dispatch(Event::Start);
        driver.settle().await;
        driver
    }

    fn latest(driver: &Driver<MockBookingApi>) -> (String, Severity) {
        let n = driver.session().notifications().latest().expect("no notification");
        (n.message.clone(), n.severity)
    }

    async fn book(driver: &mut Driver<MockBookingApi>) {
        let prefill = BusOffer::new("Hanif", "Chittagong", "Dhaka", fare(750.0)).book_now();
        driver.dispatch(Event::QuickBook(prefill));
        driver.settle().await;
        for edit in [
            BookingEdit::CustomerName("Rahim".into()),
            BookingEdit::CustomerPhone("01711111111".into()),
            BookingEdit::TravelDate("2024-03-20".into()),
            BookingEdit::DroppingPoint("Gabtoli".into()),
        ] {
            driver.dispatch(Event::EditBooking(edit));
        }
        driver.dispatch(Event::SubmitBooking);
    }

    #[tokio::test(start_paused = true)]
    async fn start_loads_reference_data() {
        let api = mock();
        let driver = started(api.clone(), Timing::headless()).await;
        assert_eq!(driver.session().reference().districts().len(), 2);
        assert_eq!(
            driver.session().reference().carriers().labels(),
            ["Hanif (Rating: 4.5⭐)"]
        );
        assert_eq!(api.call_count(Endpoint::Districts), 1);
        assert_eq!(api.call_count(Endpoint::Carriers), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn search_end_to_end() {
        let mut driver = started(mock(), Timing::headless()).await;
        driver.dispatch(Event::Search(SearchForm::new("Chittagong", "Dhaka")));
        driver.settle().await;

        let results = driver.session().search().results();
        assert_eq!(results.offers().len(), 1);
        assert_eq!(results.summary().as_deref(), Some("Found 1 bus(es)"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_district_search_shows_detail() {
        let mut driver = started(mock(), Timing::headless()).await;
        driver.dispatch(Event::Search(SearchForm::new("Atlantis", "Dhaka")));
        driver.settle().await;
        assert_eq!(
            latest(&driver),
            ("District not found".to_string(), Severity::Error)
        );
        assert_eq!(driver.session().search().results(), &SearchResults::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn booking_round_trip_uses_server_fare() {
        let api = mock();
        let mut driver = started(api.clone(), Timing::headless()).await;
        book(&mut driver).await;
        assert!(driver.session().is_loading());
        driver.settle().await;

        assert!(!driver.session().is_loading());
        let confirmation = driver.session().booking().confirmation().unwrap();
        assert_eq!(confirmation.booking.reference.as_str(), "BK00000001");
        assert_eq!(confirmation.booking.fare, fare(750.0));
        assert!(!confirmation.fare_changed());
        assert_eq!(
            confirmation.booking.dropping_point.as_deref(),
            Some("Gabtoli")
        );
        assert_eq!(api.stored_bookings().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_submission_clears_loading() {
        let api = mock();
        api.set_latency(Endpoint::CreateBooking, Duration::from_secs(60));
        let mut driver = started(api, Timing::headless())
            .await
            .with_request_timeout(Duration::from_secs(15));

        book(&mut driver).await;
        assert!(driver.session().is_loading());
        driver.settle().await;

        assert!(!driver.session().is_loading());
        assert_eq!(
            latest(&driver),
            ("Failed to create booking".to_string(), Severity::Error)
        );
        assert_eq!(driver.session().booking().form().customer_name, "Rahim");
    }

    #[tokio::test(start_paused = true)]
    async fn server_rejection_keeps_form() {
        let api = mock();
        api.fail_next(
            Endpoint::CreateBooking,
            ApiError::Server {
                status: 400,
                detail: "No seats available".into(),
            },
        );
        let mut driver = started(api, Timing::headless()).await;
        book(&mut driver).await;
        driver.settle().await;

        assert_eq!(
            latest(&driver),
            ("No seats available".to_string(), Severity::Error)
        );
        assert_eq!(driver.session().booking().form().provider, "Hanif");
        assert!(!driver.session().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_then_reload() {
        let api = mock();
        let mut driver = started(api.clone(), Timing::headless()).await;
        book(&mut driver).await;
        driver.settle().await;

        driver.dispatch(Event::LoadBookings {
            search: "01711111111".into(),
        });
        driver.settle().await;
        let reference = BookingReference::parse("BK00000001").unwrap();
        assert!(driver.session().lookup().list().bookings()[0].is_cancellable());

        driver.dispatch(Event::CancelRequested(reference.clone()));
        driver.dispatch(Event::ConfirmCancel(true));
        driver.settle().await;

        let listed = &driver.session().lookup().list().bookings()[0];
        assert_eq!(listed.reference, reference);
        assert_eq!(listed.status, BookingStatus::Cancelled);
        assert_eq!(api.call_count(Endpoint::ListBookings), 2);
        assert_eq!(
            api.calls().last(),
            Some(&ApiRequest::ListBookings(Some("01711111111".into())))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn last_response_wins() {
        let api = mock().with_offers(vec![
            BusOffer::new("Hanif", "Chittagong", "Dhaka", fare(750.0)),
            BusOffer::new("Hanif", "Dhaka", "Chittagong", fare(700.0)),
            BusOffer::new("Shyamoli", "Dhaka", "Chittagong", fare(800.0)),
        ]);
        let mut driver = started(api.clone(), Timing::headless()).await;

        api.set_latency(Endpoint::Search, Duration::from_millis(200));
        driver.dispatch(Event::Search(SearchForm::new("Chittagong", "Dhaka")));
        // Start the first request before the second is issued
        let _ = tokio::time::timeout(Duration::from_millis(10), driver.step()).await;
        api.set_latency(Endpoint::Search, Duration::from_millis(50));
        driver.dispatch(Event::Search(SearchForm::new("Dhaka", "Chittagong")));
        assert!(driver.session().search().is_searching());
        driver.settle().await;
        assert!(!driver.session().search().is_searching());

        // The first search answers last
        let offers = driver.session().search().results().offers();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].origin, "Chittagong");
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_expire_after_display_time() {
        let mut driver = started(mock(), Timing::interactive()).await;
        driver.dispatch(Event::Ask("   ".into()));
        driver.settle().await;
        assert_eq!(driver.session().notifications().len(), 1);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(driver.pending(), 1);

        driver.run_until_idle().await;
        assert!(driver.session().notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn interactive_navigation_settles_after_delay() {
        let mut driver = started(mock(), Timing::interactive()).await;
        let start = tokio::time::Instant::now();
        driver.dispatch(Event::Navigate(View::Manage));
        assert!(driver.session().is_loading());

        driver.settle().await;
        assert_eq!(driver.session().current_view(), View::Manage);
        assert!(!driver.session().is_loading());
        assert!(driver.session().focus().is_some());
        assert!(start.elapsed() >= Duration::from_millis(1300));
    }
}
