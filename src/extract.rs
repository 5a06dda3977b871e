//! Field extraction pipeline
//!
//! An [`Extractor`] runs an ordered list of [`ExtractionStrategy`] objects
//! over one email and merges their partial results field by field. Earlier
//! strategies win; once a strategy marks its result authoritative, later
//! strategies may only fill fields that are still empty.
//!
//! Extraction never fails. A strategy that finds nothing returns an empty
//! [`PartialFlightInfo`].

use crate::airlines::{airline_from_sender, carrier_code};
use crate::classify::get_email_type;
use crate::dates::{ChronoDateParser, DateParser, format_display, format_time};
use crate::parser::message_text;
use crate::patterns::{
    self, ExtractedDate, MAX_AIRPORTS, MAX_DATES, MAX_FLIGHT_NUMBERS, MAX_TIMES,
    same_flight_number,
};
use crate::structured::extract_structured;
use crate::types::{EmailRecord, EmailType, FlightInfo, Route, Segment};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Everything a strategy may look at
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub from: &'a str,
    pub subject: &'a str,
    /// Plain body plus text of the HTML body
    pub text: &'a str,
    /// Raw HTML body, for markup-aware strategies
    pub html: Option<&'a str>,
    /// Year used to complete year-less dates
    pub received_year: Option<i32>,
}

/// Fields found by a single strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFlightInfo {
    pub confirmation: Option<String>,
    pub airports: Vec<String>,
    pub flight_numbers: Vec<String>,
    pub dates: Vec<ExtractedDate>,
    pub times: Vec<String>,
    pub segments: Vec<Segment>,
    pub cancelled: bool,
    /// Set by strategies reading machine-generated booking data
    pub authoritative: bool,
}

fn merge_unique<T: PartialEq>(into: &mut Vec<T>, from: Vec<T>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

fn merge_flight_numbers(into: &mut Vec<String>, from: Vec<String>) {
    for number in from {
        if !into.iter().any(|n| same_flight_number(n, &number)) {
            into.push(number);
        }
    }
}

impl PartialFlightInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge a later strategy's result into this one
    pub fn absorb(&mut self, other: Self) {
        if self.confirmation.is_none() {
            self.confirmation = other.confirmation;
        }
        self.cancelled |= other.cancelled;

        if self.authoritative {
            fill_if_empty(&mut self.airports, other.airports);
            fill_if_empty(&mut self.flight_numbers, other.flight_numbers);
            fill_if_empty(&mut self.times, other.times);
            fill_if_empty(&mut self.segments, other.segments);
            if self.dates.is_empty() {
                self.dates = other.dates;
            }
        } else {
            merge_unique(&mut self.airports, other.airports);
            merge_flight_numbers(&mut self.flight_numbers, other.flight_numbers);
            merge_unique(&mut self.times, other.times);
            merge_unique(&mut self.segments, other.segments);
            for date in other.dates {
                if !self.dates.iter().any(|d| d.date == date.date) {
                    self.dates.push(date);
                }
            }
        }
        self.authoritative |= other.authoritative;
    }

    /// Put airports and flight numbers of explicit segments first; dates come
    /// from the segments only
    fn fill_from_segments(&mut self) {
        let mut airports = Vec::new();
        let mut numbers = Vec::new();
        let mut dates: Vec<ExtractedDate> = Vec::new();

        for segment in &self.segments {
            merge_unique(&mut airports, segment.origin.iter().cloned().collect());
            merge_unique(&mut airports, vec![segment.destination.clone()]);
            merge_unique(&mut numbers, segment.flight_number.iter().cloned().collect());
            if !dates.iter().any(|d| d.date == segment.date) {
                dates.push(ExtractedDate {
                    display: format_display(segment.date),
                    date: segment.date,
                    year_qualified: true,
                });
            }
        }

        merge_unique(&mut airports, std::mem::take(&mut self.airports));
        merge_flight_numbers(&mut numbers, std::mem::take(&mut self.flight_numbers));
        // Other text dates (booking date, purchase date) are not flight dates
        self.dates.clear();

        self.airports = airports;
        self.flight_numbers = numbers;
        self.dates = dates;
    }

    fn into_flight_info(mut self, subject: &str, text: &str) -> FlightInfo {
        if !self.segments.is_empty() {
            self.fill_from_segments();
        }

        self.dates.sort_by_key(|d| !d.year_qualified);
        self.airports.truncate(MAX_AIRPORTS);
        self.flight_numbers.truncate(MAX_FLIGHT_NUMBERS);
        self.dates.truncate(MAX_DATES);
        self.times.truncate(MAX_TIMES);

        let segments = if self.segments.is_empty() {
            build_segments(&self.airports, &self.dates, &self.flight_numbers)
        } else {
            self.segments
        };

        let route = segments
            .iter()
            .find_map(Segment::route)
            .or_else(|| match self.airports.as_slice() {
                [origin, destination, ..] => Some(Route::new(origin.clone(), destination.clone())),
                _ => None,
            });

        let flight_relevant = self.confirmation.is_some() || !segments.is_empty();
        let email_type = if self.cancelled {
            EmailType::Cancellation
        } else {
            get_email_type(subject, text, flight_relevant)
        };

        FlightInfo {
            confirmation: self.confirmation,
            airports: self.airports,
            route,
            flight_numbers: self.flight_numbers,
            dates: self.dates.into_iter().map(|d| d.display).collect(),
            times: self.times,
            segments,
            email_type,
            score: None,
        }
    }
}

fn fill_if_empty<T>(into: &mut Vec<T>, from: Vec<T>) {
    if into.is_empty() {
        *into = from;
    }
}

/// Pair dates with legs when no explicit segments were found.
///
/// Date `i` takes flight number `i`, or the first number when there are
/// fewer numbers than dates. More than two airports are read as a chain of
/// legs. Two airports with exactly two dates are an outbound and a return.
/// A single airport yields destination-only legs.
#[must_use]
pub fn build_segments(
    airports: &[String],
    dates: &[ExtractedDate],
    flight_numbers: &[String],
) -> Vec<Segment> {
    let flight_for = |i: usize| flight_numbers.get(i).or_else(|| flight_numbers.first()).cloned();

    let legs: Vec<(Option<&String>, &String)> = match airports {
        [] => return Vec::new(),
        [destination] => dates.iter().map(|_| (None, destination)).collect(),
        [origin, destination] => {
            let round_trip = dates.len() == 2;
            dates
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    if round_trip && i == 1 {
                        (Some(destination), origin)
                    } else {
                        (Some(origin), destination)
                    }
                })
                .collect()
        }
        chain => chain.windows(2).map(|w| (Some(&w[0]), &w[1])).collect(),
    };

    let mut segments: Vec<Segment> = Vec::new();
    for (i, (date, (origin, destination))) in dates.iter().zip(legs).enumerate() {
        let segment = Segment {
            origin: origin.cloned(),
            destination: destination.clone(),
            date: date.date,
            flight_number: flight_for(i),
        };
        if !segments.iter().any(|s| s.key() == segment.key()) {
            segments.push(segment);
        }
    }
    segments
}

/// One way of reading flight fields out of an email
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, input: &ExtractionInput<'_>) -> PartialFlightInfo;
}

/// schema.org JSON-LD markup in the HTML body
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDataStrategy;

impl ExtractionStrategy for StructuredDataStrategy {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> PartialFlightInfo {
        let Some(booking) = input.html.and_then(extract_structured) else {
            return PartialFlightInfo::default();
        };

        let mut partial = PartialFlightInfo {
            confirmation: booking.confirmation,
            times: booking.times,
            segments: booking.segments,
            cancelled: booking.cancelled,
            authoritative: true,
            ..PartialFlightInfo::default()
        };
        partial.fill_from_segments();
        partial
    }
}

static LABELLED_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:depart(?:s|ure|ing)?|arriv(?:es|al|ing|e)|flight\s+date|travel\s+date)(?:\s+(?:date|time))?\s*:\s*([^\n\r]{1,80})",
    )
    .unwrap()
});

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Dates and times next to "Departs:" / "Arrives:" style labels
pub struct LabelledDateStrategy {
    parser: Box<dyn DateParser>,
}

impl LabelledDateStrategy {
    #[must_use]
    pub fn new(parser: impl DateParser + 'static) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl ExtractionStrategy for LabelledDateStrategy {
    fn name(&self) -> &'static str {
        "labelled-dates"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> PartialFlightInfo {
        let mut partial = PartialFlightInfo::default();

        for caps in LABELLED_VALUE.captures_iter(input.text) {
            let value = &caps[1];

            if let Some(date) = self.parser.parse_date(value, input.received_year)
                && !partial.dates.iter().any(|d| d.date == date)
            {
                partial.dates.push(ExtractedDate {
                    display: format_display(date),
                    date,
                    year_qualified: YEAR.is_match(value),
                });
            }
            if let Some(time) = self.parser.parse_time(value) {
                let time = format_time(time);
                if !partial.times.contains(&time) {
                    partial.times.push(time);
                }
            }
        }
        partial
    }
}

/// Regex patterns over subject and text
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexStrategy;

impl ExtractionStrategy for RegexStrategy {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn extract(&self, input: &ExtractionInput<'_>) -> PartialFlightInfo {
        let combined = format!("{}\n{}", input.subject, input.text);
        let carrier = airline_from_sender(input.from).and_then(carrier_code);

        PartialFlightInfo {
            confirmation: patterns::extract_confirmation(input.subject, input.text),
            airports: patterns::extract_airports(&combined),
            flight_numbers: patterns::extract_flight_numbers(&combined),
            dates: patterns::extract_dates(&combined, input.received_year),
            times: patterns::extract_times(input.text),
            segments: patterns::extract_itinerary_rows(input.text, input.received_year, carrier),
            cancelled: false,
            authoritative: false,
        }
    }
}

/// Ordered strategy pipeline turning an [`EmailRecord`] into a [`FlightInfo`]
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    /// Structured data first, then labelled dates, then regex fallback
    #[must_use]
    pub fn new(date_parser: impl DateParser + 'static) -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredDataStrategy),
            Box::new(LabelledDateStrategy::new(date_parser)),
            Box::new(RegexStrategy),
        ])
    }

    /// Regex fallback only
    #[must_use]
    pub fn regex_only() -> Self {
        Self::with_strategies(vec![Box::new(RegexStrategy)])
    }

    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in the order they run
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extract flight facts from one email
    #[must_use]
    pub fn extract(&self, email: &EmailRecord) -> FlightInfo {
        let text = message_text(email);
        let input = ExtractionInput {
            from: &email.from,
            subject: &email.subject,
            text: &text,
            html: email.html_body.as_deref(),
            received_year: email.received_year(),
        };

        let mut merged = PartialFlightInfo::default();
        for strategy in &self.strategies {
            let partial = strategy.extract(&input);
            if !partial.is_empty() {
                trace!("Strategy {} matched {:?}", strategy.name(), email.subject);
            }
            merged.absorb(partial);
        }

        merged.into_flight_info(&email.subject, &text)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ChronoDateParser)
    }
}
