//! Content hashing and change-detection fingerprints

use crate::types::FlightInfo;
use sha2::{Digest, Sha256};

/// Number of leading body characters covered by the content hash
pub const CONTENT_HASH_BODY_CHARS: usize = 2000;

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hash identifying byte-for-byte duplicate messages.
///
/// Covers the whitespace-collapsed, lowercased subject and the first
/// [`CONTENT_HASH_BODY_CHARS`] characters of the body, so the same message
/// fetched from two folders hashes identically.
#[must_use]
pub fn content_hash(subject: &str, body: &str) -> String {
    let leading: String = body.chars().take(CONTENT_HASH_BODY_CHARS).collect();
    let payload = format!("{}\n{}", normalize(subject), normalize(&leading));
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

/// Fingerprint from sorted airports, the first date and sorted flight numbers.
///
/// Order-insensitive in airports and flight numbers: the same itinerary
/// extracted from differently laid out emails yields the same fingerprint.
#[must_use]
pub fn fingerprint_parts(airports: &[String], dates: &[String], flight_numbers: &[String]) -> String {
    let mut airports: Vec<&str> = airports.iter().map(String::as_str).collect();
    airports.sort_unstable();
    airports.dedup();

    let mut flights: Vec<&str> = flight_numbers.iter().map(String::as_str).collect();
    flights.sort_unstable();
    flights.dedup();

    let first_date = dates.first().map_or("", String::as_str);

    format!("{}|{first_date}|{}", airports.join(","), flights.join(","))
}

/// Fingerprint of one email's extracted flight facts
#[must_use]
pub fn flight_fingerprint(info: &FlightInfo) -> String {
    fingerprint_parts(&info.airports, &info.dates, &info.flight_numbers)
}
