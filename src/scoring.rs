//! Weighted relevance scoring
//!
//! An optional gate in front of extraction. Each rule adds or subtracts a
//! fixed weight and records a human-readable reason, so a rejected email can
//! be explained.

use crate::airlines::{AIRLINE_SENDER_DOMAINS, HOTEL_DOMAINS};
use crate::airports::is_valid_airport;
use crate::patterns::{carrier_flight_numbers, find_pnr_token};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Score threshold used when none is configured
pub const DEFAULT_THRESHOLD: i32 = 50;

const MULTI_AIRPORT_WEIGHT: i32 = 30;
const SINGLE_AIRPORT_WEIGHT: i32 = 10;
const FLIGHT_NUMBER_WEIGHT: i32 = 25;
const PNR_WEIGHT: i32 = 15;
const PHRASE_WEIGHT: i32 = 10;
const MAX_PHRASES: usize = 5;
const AIRLINE_DOMAIN_WEIGHT: i32 = 20;
const HOTEL_DOMAIN_PENALTY: i32 = -30;
const ACCOMMODATION_PENALTY: i32 = -30;
const SPAM_PENALTY: i32 = -15;
const MAX_SPAM_PHRASES: usize = 3;
const SURVEY_PENALTY: i32 = -20;

const FLIGHT_PHRASES: &[&str] = &[
    "boarding pass",
    "flight confirmation",
    "itinerary",
    "confirmation code",
    "record locator",
    "departure",
    "arrival",
    "gate",
    "terminal",
    "seat assignment",
    "check-in",
    "e-ticket",
    "booking reference",
    "flight number",
    "nonstop",
    "layover",
];

const SPAM_PHRASES: &[&str] = &[
    "unsubscribe",
    "limited time",
    "special offer",
    "book now",
    "sale ends",
    "exclusive deal",
    "earn miles",
    "credit card",
    "apply now",
    "win a trip",
];

const ACCOMMODATION_KEYWORDS: &[&str] = &[
    "airbnb",
    "where you're staying",
    "your stay",
    "your host",
    "check-in time",
];

const SURVEY_KEYWORDS: &[&str] = &["survey", "how was your flight", "rate your experience", "feedback"];

static CODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{3}\b").unwrap());

/// Outcome of scoring one email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailScore {
    pub score: i32,
    /// One entry per rule that fired, in evaluation order
    pub reasons: Vec<String>,
}

impl EmailScore {
    /// Whether the score reaches `threshold` (equal passes)
    #[must_use]
    pub const fn passes(&self, threshold: i32) -> bool {
        self.score >= threshold
    }

    fn add(&mut self, weight: i32, reason: String) {
        self.score += weight;
        self.reasons.push(reason);
    }
}

fn sender_domain(from: &str) -> String {
    let lower = from.to_lowercase();
    let address = lower
        .rsplit_once('<')
        .map_or(lower.as_str(), |(_, rest)| rest.trim_end_matches('>'));
    address
        .rsplit_once('@')
        .map_or(address, |(_, domain)| domain)
        .trim()
        .to_string()
}

fn domain_matches(domain: &str, known: &str) -> bool {
    domain == known || domain.ends_with(&format!(".{known}"))
}

/// Score an email's likelihood of carrying flight information
#[must_use]
pub fn score_email(subject: &str, body: &str, from: &str) -> EmailScore {
    let mut result = EmailScore::default();
    let text = format!("{subject} {body}");
    let text_lower = text.to_lowercase();
    let domain = sender_domain(from);

    let mut airports: Vec<&str> = Vec::new();
    for token in CODE_TOKEN.find_iter(&text).map(|m| m.as_str()) {
        if is_valid_airport(token) && !airports.contains(&token) {
            airports.push(token);
        }
    }
    match airports.len() {
        0 => {}
        1 => result.add(SINGLE_AIRPORT_WEIGHT, format!("Airport: {}", airports[0])),
        _ => result.add(
            MULTI_AIRPORT_WEIGHT,
            format!("Airports: {}", airports.iter().take(4).copied().collect::<Vec<_>>().join(", ")),
        ),
    }

    let flights = carrier_flight_numbers(&text);
    if !flights.is_empty() {
        let shown: Vec<&str> = flights.iter().take(2).map(|(_, f)| f.as_str()).collect();
        result.add(FLIGHT_NUMBER_WEIGHT, format!("Flight#: {}", shown.join(", ")));
    }

    if let Some(code) = find_pnr_token(&text) {
        result.add(PNR_WEIGHT, format!("PNR: {code}"));
    }

    let phrases: Vec<&str> = FLIGHT_PHRASES
        .iter()
        .copied()
        .filter(|p| text_lower.contains(p))
        .take(MAX_PHRASES)
        .collect();
    for phrase in phrases {
        result.add(PHRASE_WEIGHT, format!("\"{phrase}\""));
    }

    if let Some(known) = AIRLINE_SENDER_DOMAINS
        .iter()
        .find(|known| domain_matches(&domain, known))
    {
        result.add(AIRLINE_DOMAIN_WEIGHT, format!("From: {known}"));
    }

    if let Some(hotel) = HOTEL_DOMAINS.iter().find(|h| domain_matches(&domain, h)) {
        result.add(HOTEL_DOMAIN_PENALTY, format!("HOTEL: {hotel}"));
    }

    if ACCOMMODATION_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        result.add(ACCOMMODATION_PENALTY, "ACCOMMODATION".to_string());
    }

    let spam: Vec<&str> = SPAM_PHRASES
        .iter()
        .copied()
        .filter(|p| text_lower.contains(p))
        .take(MAX_SPAM_PHRASES)
        .collect();
    for phrase in spam {
        result.add(SPAM_PENALTY, format!("SPAM: \"{phrase}\""));
    }

    let from_lower = from.to_lowercase();
    if SURVEY_KEYWORDS
        .iter()
        .any(|k| text_lower.contains(k) || from_lower.contains(k))
    {
        result.add(SURVEY_PENALTY, "SURVEY".to_string());
    }

    result
}

/// Whether an email scores at least `threshold`
#[must_use]
pub fn passes_score_threshold(subject: &str, body: &str, from: &str, threshold: i32) -> bool {
    score_email(subject, body, from).passes(threshold)
}
