//! schema.org `FlightReservation` markup embedded in HTML bodies
//!
//! Airlines and booking sites embed JSON-LD in `<script type="application/ld+json">`
//! blocks. When present it is authoritative: codes, flight numbers and
//! departure times come straight from the sender's booking system.

use crate::dates::format_time;
use crate::patterns::normalize_flight_number;
use crate::types::Segment;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

/// Booking facts read from JSON-LD markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredBooking {
    pub confirmation: Option<String>,
    pub segments: Vec<Segment>,
    /// Departure times in segment order
    pub times: Vec<String>,
    /// Set when any reservation carries a cancelled status
    pub cancelled: bool,
}

impl StructuredBooking {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.confirmation.is_none() && self.segments.is_empty() && !self.cancelled
    }
}

/// Read every JSON-LD block of an HTML body.
///
/// Returns `None` when the document carries no flight markup. Malformed
/// blocks are skipped.
#[must_use]
pub fn extract_structured(html: &str) -> Option<StructuredBooking> {
    if !html.contains("application/ld+json") {
        return None;
    }

    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    let mut booking = StructuredBooking::default();
    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => visit(&value, &mut booking),
            Err(e) => warn!("Skipping malformed JSON-LD block: {e}"),
        }
    }

    if booking.is_empty() {
        None
    } else {
        debug!(
            "JSON-LD booking {:?} with {} segment(s)",
            booking.confirmation,
            booking.segments.len()
        );
        Some(booking)
    }
}

fn has_type(value: &Value, wanted: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

fn visit(value: &Value, booking: &mut StructuredBooking) {
    match value {
        Value::Array(items) => {
            for item in items {
                visit(item, booking);
            }
        }
        Value::Object(map) => {
            if has_type(value, "FlightReservation") {
                read_reservation(value, booking);
            } else if has_type(value, "Flight") {
                read_flight(value, booking);
            } else if let Some(graph) = map.get("@graph") {
                visit(graph, booking);
            }
        }
        _ => {}
    }
}

fn read_reservation(reservation: &Value, booking: &mut StructuredBooking) {
    let code = reservation
        .get("reservationNumber")
        .and_then(Value::as_str)
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty());

    if booking.confirmation.is_none() {
        booking.confirmation.clone_from(&code);
    }

    let cancelled = reservation
        .get("reservationStatus")
        .and_then(Value::as_str)
        .is_some_and(|s| s.contains("Cancelled") || s.contains("Canceled"));
    booking.cancelled |= cancelled;

    if let Some(target) = reservation.get("reservationFor") {
        match target {
            Value::Array(flights) => flights.iter().for_each(|f| read_flight(f, booking)),
            flight => read_flight(flight, booking),
        }
    }
}

fn iata_code(value: Option<&Value>) -> Option<String> {
    let code = match value? {
        Value::String(s) => s.as_str(),
        other => other.get("iataCode")?.as_str()?,
    };
    let code = code.trim().to_uppercase();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())).then_some(code)
}

fn flight_number(flight: &Value) -> Option<String> {
    let carrier = flight
        .get("airline")
        .or_else(|| flight.get("provider"))
        .and_then(|a| a.get("iataCode"))
        .and_then(Value::as_str)
        .map(str::to_uppercase);

    let raw = match flight.get("flightNumber")? {
        Value::String(s) => s.trim().to_uppercase(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let digits_start = raw.find(|c: char| c.is_ascii_digit())?;
    let (prefix, digits) = raw.split_at(digits_start);
    let prefix = match prefix.trim() {
        "" => carrier,
        p => Some(p.to_string()),
    };
    Some(normalize_flight_number(prefix.as_deref(), digits))
}

fn departure(value: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let local = dt.naive_local();
        return Some((local.date(), Some(local.time())));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some((dt.date(), Some(dt.time())));
    }
    let date = NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()?;
    Some((date, None))
}

fn read_flight(flight: &Value, booking: &mut StructuredBooking) {
    let Some(destination) = iata_code(flight.get("arrivalAirport")) else {
        return;
    };
    let Some((date, time)) = flight
        .get("departureTime")
        .and_then(Value::as_str)
        .and_then(departure)
    else {
        return;
    };

    let segment = Segment {
        origin: iata_code(flight.get("departureAirport")),
        destination,
        date,
        flight_number: flight_number(flight),
    };

    if booking.segments.iter().any(|s| s.key() == segment.key()) {
        return;
    }
    booking.segments.push(segment);
    if let Some(time) = time {
        booking.times.push(format_time(time));
    }
}
