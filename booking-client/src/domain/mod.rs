//! Domain types for the bus booking client.
//!
//! These types represent validated data received from the booking service
//! or entered by the user. Invariants are enforced at construction, so
//! controllers that receive them can trust their validity.

mod answer;
mod booking;
mod carrier;
mod district;
mod error;
mod fare;
mod offer;
mod reference;

pub use answer::{AnsweredExcerpt, ContactInfo, ContactKind, Relevance};
pub use booking::{Booking, BookingStatus, ISO_DATE, parse_iso_date, parse_timestamp};
pub use carrier::{Carrier, DEFAULT_RATING, ProviderProfile, Rating};
pub use district::{District, DroppingPoint};
pub use error::DomainError;
pub use fare::{CURRENCY_GLYPH, Fare};
pub use offer::{BusOffer, Prefill};
pub use reference::BookingReference;
