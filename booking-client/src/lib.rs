//! Client-side session controller for a bus ticket booking service.
//!
//! Users search routes between districts, book a seat, look up and cancel
//! bookings, and ask free-text questions about bus providers. The
//! [`session::Session`] state machine holds all workflow state; the
//! [`driver::Driver`] performs its requests against a [`api::BookingApi`].

pub mod api;
pub mod cache;
pub mod domain;
pub mod driver;
pub mod notify;
pub mod reference;
pub mod session;
