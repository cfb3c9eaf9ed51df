//! Conversion from wire types to validated domain types.

use tracing::warn;

use crate::domain::{
    AnsweredExcerpt, Booking, BookingReference, BookingStatus, BusOffer, Carrier, ContactInfo,
    District, DomainError, DroppingPoint, Fare, ProviderProfile, Rating, Relevance,
    parse_iso_date, parse_timestamp,
};

use super::types::{
    BookingDto, BusOfferDto, CarrierDto, ContactInfoDto, DistrictDto, ProviderDetailsDto,
    RagResultDto,
};

/// Convert a district and its dropping points.
pub fn convert_district(dto: DistrictDto) -> Result<District, DomainError> {
    let points = dto
        .dropping_points
        .into_iter()
        .map(|p| DroppingPoint::new(p.name, Fare::new(p.price)?))
        .collect::<Result<Vec<_>, _>>()?;
    District::new(dto.name, points)
}

/// Convert a carrier, defaulting absent or out-of-range ratings.
pub fn convert_carrier(dto: CarrierDto) -> Result<Carrier, DomainError> {
    if dto.name.trim().is_empty() {
        return Err(DomainError::EmptyName("carrier"));
    }

    let (rating, defaulted) = Rating::or_default(dto.rating);
    if defaulted && dto.rating.is_some() {
        warn!(carrier = %dto.name, rating = ?dto.rating, "rating out of range, using default");
    }

    Ok(Carrier {
        name: dto.name,
        rating,
        coverage_districts: dto.coverage_districts.unwrap_or_default(),
        official_address: non_blank(dto.official_address),
        contact_info: non_blank(dto.contact_info),
    })
}

/// Convert a search result.
pub fn convert_offer(dto: BusOfferDto) -> Result<BusOffer, DomainError> {
    let fare = Fare::new(dto.fare)?;
    let rating = dto.rating.and_then(Rating::new);

    Ok(BusOffer {
        provider: dto.provider,
        origin: dto.from_district,
        destination: dto.to_district,
        fare,
        available_seats: dto.available_seats,
        total_seats: dto.total_seats,
        rating,
        seat_class: non_blank(dto.seat_class),
        departure_times: dto.departure_times.unwrap_or_default(),
        duration_hours: dto.duration_hours.filter(|h| h.is_finite() && *h >= 0.0),
        distance_km: dto.distance_km.filter(|d| d.is_finite() && *d >= 0.0),
        contact: non_blank(dto.contact),
    })
}

/// Convert a booking returned by the server.
pub fn convert_booking(dto: BookingDto) -> Result<Booking, DomainError> {
    Ok(Booking {
        reference: BookingReference::parse(&dto.booking_reference)?,
        customer_name: dto.customer_name,
        customer_phone: dto.customer_phone,
        origin: dto.from_district,
        destination: dto.to_district,
        provider: dto.bus_provider,
        travel_date: parse_iso_date(&dto.travel_date)?,
        dropping_point: non_blank(dto.dropping_point),
        fare: Fare::new(dto.fare)?,
        status: BookingStatus::parse(&dto.status)?,
        booked_at: parse_timestamp(&dto.booking_date)?,
    })
}

/// Convert one ranked answer.
pub fn convert_answer(dto: RagResultDto) -> AnsweredExcerpt {
    AnsweredExcerpt {
        provider: dto.provider,
        contact: dto.contact_info.map(convert_contact).filter(|c| !c.is_empty()),
        excerpt: dto.excerpt,
        relevance: Relevance::new(dto.relevance_score),
    }
}

fn convert_contact(dto: ContactInfoDto) -> ContactInfo {
    ContactInfo {
        phone: non_blank(dto.phone),
        email: non_blank(dto.email),
        website: non_blank(dto.website),
        address: non_blank(dto.address),
    }
}

/// Convert a provider profile.
pub fn convert_profile(dto: ProviderDetailsDto) -> Result<ProviderProfile, DomainError> {
    if dto.name.trim().is_empty() {
        return Err(DomainError::EmptyName("carrier"));
    }

    Ok(ProviderProfile {
        name: dto.name,
        coverage_districts: dto.coverage_districts.unwrap_or_default(),
        official_address: non_blank(dto.official_address),
        phone: non_blank(dto.contact_info),
        email: non_blank(dto.email),
        website: non_blank(dto.website),
        privacy_policy: non_blank(dto.privacy_policy),
    })
}

/// Convert a list, failing on the first invalid entry.
pub fn convert_all<D, T>(
    dtos: Vec<D>,
    f: impl Fn(D) -> Result<T, DomainError>,
) -> Result<Vec<T>, DomainError> {
    dtos.into_iter().map(f).collect()
}

/// Treat blank strings like missing ones.
fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
