//! Bookings and their lifecycle status.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{BookingReference, DomainError, Fare};

/// Wire format for travel dates.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Display format for booking creation timestamps.
const DISPLAY_DATE: &str = "%d %b %Y";

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE).map_err(|_| DomainError::InvalidDate {
        value: s.to_string(),
        expected: "YYYY-MM-DD",
    })
}

/// Parse a booking creation timestamp.
///
/// The server emits naive ISO date-times (`2024-03-15T10:30:00.123456`);
/// RFC 3339 with an offset is accepted too and reduced to its local
/// wall-clock time.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DomainError> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    Err(DomainError::InvalidDate {
        value: s.to_string(),
        expected: "ISO 8601 date-time",
    })
}

/// Booking lifecycle status.
///
/// The only transition is `Active → Cancelled`, performed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Active,
    Cancelled,
}

impl BookingStatus {
    /// Parse the wire form (`active` / `cancelled`).
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(BookingStatus::Active),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Upper-case badge text.
    pub fn badge(&self) -> &'static str {
        match self {
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed booking as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub reference: BookingReference,
    pub customer_name: String,
    pub customer_phone: String,
    pub origin: String,
    pub destination: String,
    pub provider: String,
    pub travel_date: NaiveDate,
    pub dropping_point: Option<String>,
    pub fare: Fare,
    pub status: BookingStatus,
    pub booked_at: NaiveDateTime,
}

impl Booking {
    /// Only active bookings expose a cancel action.
    pub fn is_cancellable(&self) -> bool {
        self.status == BookingStatus::Active
    }

    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    /// Creation date for display, e.g. `15 Mar 2024`.
    pub fn booked_on_label(&self) -> String {
        self.booked_at.format(DISPLAY_DATE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status() {
        assert_eq!(BookingStatus::parse("active"), Ok(BookingStatus::Active));
        assert_eq!(BookingStatus::parse("CANCELLED"), Ok(BookingStatus::Cancelled));
        assert!(BookingStatus::parse("pending").is_err());
    }

    #[test]
    fn badges() {
        assert_eq!(BookingStatus::Active.badge(), "ACTIVE");
        assert_eq!(BookingStatus::Cancelled.badge(), "CANCELLED");
    }

    #[test]
    fn parse_dates() {
        assert_eq!(
            parse_iso_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_iso_date("15/03/2024").is_err());
        assert!(parse_iso_date("2024-02-30").is_err());
    }

    #[test]
    fn parse_timestamps() {
        let naive = parse_timestamp("2024-03-15T10:30:00.123456").unwrap();
        assert_eq!(naive.format("%H:%M").to_string(), "10:30");

        let whole = parse_timestamp("2024-03-15T10:30:00").unwrap();
        assert_eq!(whole.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        let offset = parse_timestamp("2024-03-15T10:30:00+06:00").unwrap();
        assert_eq!(offset.format("%H:%M").to_string(), "10:30");

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn cancellable_only_when_active() {
        let mut booking = Booking {
            reference: BookingReference::parse("BK12345").unwrap(),
            customer_name: "Rahim".into(),
            customer_phone: "01700000000".into(),
            origin: "Dhaka".into(),
            destination: "Sylhet".into(),
            provider: "Hanif".into(),
            travel_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            dropping_point: None,
            fare: Fare::new(600.0).unwrap(),
            status: BookingStatus::Active,
            booked_at: parse_timestamp("2024-03-15T10:30:00").unwrap(),
        };
        assert!(booking.is_cancellable());
        assert_eq!(booking.booked_on_label(), "15 Mar 2024");
        assert_eq!(booking.route_label(), "Dhaka → Sylhet");

        booking.status = BookingStatus::Cancelled;
        assert!(!booking.is_cancellable());
    }
}
