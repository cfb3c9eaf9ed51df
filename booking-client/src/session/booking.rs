//! The booking form, dropping-point resolution and submission.

use chrono::NaiveDate;

use crate::api::{ApiRequest, BookingSubmission};
use crate::domain::{Booking, Fare, Prefill, parse_iso_date};
use crate::reference::Districts;

use super::error::ClientError;
use super::event::BookingEdit;
use super::outbox::Outbox;

/// Shown in the dropping point selector when it has no options.
pub const DROPPING_POINT_PLACEHOLDER: &str = "Select dropping point";

/// One selectable dropping point.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppingOption {
    pub name: String,
    pub price: Fare,
    /// e.g. `Gabtoli - ৳50`
    pub label: String,
}

/// Booking form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub origin: String,
    pub destination: String,
    pub provider: String,
    pub travel_date: Option<NaiveDate>,
    /// Empty when none is selected.
    pub dropping_point: String,
    /// Fare of the search result the form was prefilled from.
    pub quoted_fare: Option<Fare>,
}

impl BookingForm {
    /// Check required fields and build the submission.
    pub fn to_submission(&self) -> Result<BookingSubmission, ClientError> {
        let text_fields = [
            ("customer name", &self.customer_name),
            ("phone number", &self.customer_phone),
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("bus provider", &self.provider),
        ];
        let mut missing: Vec<&str> = text_fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect();
        if self.travel_date.is_none() {
            missing.push("travel date");
        }

        let travel_date = match self.travel_date {
            Some(date) if missing.is_empty() => date,
            _ => return Err(missing_fields(&missing)),
        };

        Ok(BookingSubmission {
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            provider: self.provider.clone(),
            travel_date,
            dropping_point: self.dropping_point.clone(),
            quoted_fare: self.quoted_fare,
        })
    }
}

fn missing_fields(missing: &[&str]) -> ClientError {
    ClientError::Validation(format!(
        "Please fill in all required fields: {}",
        missing.join(", ")
    ))
}

/// Summary rendered after a successful booking, straight from the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub booking: Booking,
    /// Fare the user saw on the search result, if prefilled.
    pub quoted_fare: Option<Fare>,
}

impl Confirmation {
    /// Label/value pairs in display order.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let b = &self.booking;
        vec![
            ("Booking Reference", b.reference.to_string()),
            ("Passenger", b.customer_name.clone()),
            ("Route", b.route_label()),
            ("Bus Provider", b.provider.clone()),
            ("Travel Date", b.travel_date.to_string()),
            ("Fare", b.fare.to_string()),
        ]
    }

    /// True when the charged fare differs from the quoted one.
    pub fn fare_changed(&self) -> bool {
        self.quoted_fare
            .is_some_and(|quoted| quoted != self.booking.fare)
    }
}

#[derive(Debug)]
pub struct BookingController {
    form: BookingForm,
    dropping_options: Vec<DroppingOption>,
    min_date: NaiveDate,
    in_flight: usize,
    confirmation: Option<Confirmation>,
}

impl BookingController {
    /// `min_date` is the earliest travel date the form accepts.
    pub fn new(min_date: NaiveDate) -> Self {
        Self {
            form: BookingForm::default(),
            dropping_options: Vec::new(),
            min_date,
            in_flight: 0,
            confirmation: None,
        }
    }

    pub(crate) fn edit(&mut self, edit: BookingEdit, districts: &Districts) -> Result<(), ClientError> {
        match edit {
            BookingEdit::CustomerName(name) => self.form.customer_name = name,
            BookingEdit::CustomerPhone(phone) => self.form.customer_phone = phone,
            BookingEdit::Origin(origin) => {
                self.form.origin = origin;
                self.form.quoted_fare = None;
            }
            BookingEdit::Provider(provider) => {
                self.form.provider = provider;
                self.form.quoted_fare = None;
            }
            BookingEdit::Destination(destination) => {
                self.form.quoted_fare = None;
                self.on_destination_changed(destination, districts);
            }
            BookingEdit::TravelDate(raw) => self.set_travel_date(&raw)?,
            BookingEdit::DroppingPoint(name) => self.select_dropping_point(name)?,
        }
        Ok(())
    }

    /// Rebuild the dropping point options for a new destination.
    ///
    /// Shared by manual selection and prefill. The selected point is
    /// always cleared.
    pub(crate) fn on_destination_changed(&mut self, destination: String, districts: &Districts) {
        self.dropping_options = districts
            .dropping_points(&destination)
            .iter()
            .map(|point| DroppingOption {
                name: point.name.clone(),
                price: point.price,
                label: point.label(),
            })
            .collect();
        if self.dropping_options.is_empty() {
            tracing::debug!(%destination, "no dropping points");
        }
        self.form.destination = destination;
        self.form.dropping_point.clear();
    }

    pub(crate) fn apply_prefill(&mut self, prefill: Prefill, districts: &Districts) {
        tracing::info!(provider = %prefill.provider, "prefilling booking form");
        self.form.provider = prefill.provider;
        self.form.origin = prefill.origin;
        self.on_destination_changed(prefill.destination, districts);
        self.form.quoted_fare = Some(prefill.fare);
    }

    /// Blank clears the date. A rejected date also clears it, so the
    /// form never holds a date the user no longer sees.
    fn set_travel_date(&mut self, raw: &str) -> Result<(), ClientError> {
        self.form.travel_date = None;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(());
        }
        let date = parse_iso_date(raw)
            .map_err(|_| ClientError::validation("Please choose a valid travel date"))?;
        if date < self.min_date {
            return Err(ClientError::Validation(format!(
                "Travel date cannot be before {}",
                self.min_date
            )));
        }
        self.form.travel_date = Some(date);
        Ok(())
    }

    fn select_dropping_point(&mut self, name: String) -> Result<(), ClientError> {
        if !name.is_empty() && !self.dropping_options.iter().any(|o| o.name == name) {
            return Err(ClientError::validation(
                "Please choose a dropping point from the list",
            ));
        }
        self.form.dropping_point = name;
        Ok(())
    }

    pub(crate) fn submit(&mut self, out: &mut Outbox) -> Result<(), ClientError> {
        let submission = self.form.to_submission()?;
        tracing::info!(
            provider = %submission.provider,
            origin = %submission.origin,
            destination = %submission.destination,
            travel_date = %submission.travel_date,
            "submitting booking"
        );
        self.in_flight += 1;
        out.request(ApiRequest::CreateBooking(submission));
        Ok(())
    }

    pub(crate) fn complete(&mut self, result: Result<Booking, ClientError>, out: &mut Outbox) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(booking) => {
                tracing::info!(reference = %booking.reference, fare = %booking.fare, "booking confirmed");
                out.success(format!("Booking confirmed: {}", booking.reference));
                let quoted_fare = self.form.quoted_fare;
                self.reset();
                self.confirmation = Some(Confirmation {
                    booking,
                    quoted_fare,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "booking failed");
                let fallback = if matches!(e, ClientError::Network(_)) {
                    "Failed to create booking"
                } else {
                    "Booking failed"
                };
                out.error(e.user_message(fallback));
            }
        }
    }

    fn reset(&mut self) {
        self.form = BookingForm::default();
        self.dropping_options.clear();
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Dropping point options; empty means the placeholder is shown.
    pub fn dropping_options(&self) -> &[DroppingOption] {
        &self.dropping_options
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight > 0
    }
}
