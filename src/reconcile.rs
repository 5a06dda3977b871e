//! Batch reconciliation of per-email flight records into itinerary rows
//!
//! Emails about the same booking are grouped (by confirmation code, or by a
//! synthetic flight identity when no code was found). A cancellation anywhere
//! in a group removes the whole group. Surviving groups emit one row per
//! flight date, taken from the most trustworthy email for that date.

use crate::dates::{format_display, parse_display_date};
use crate::types::{EmailRecord, EmailType, Flight, FlightInfo, FlightSummary, Segment};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One email's extraction result, carried into reconciliation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightEmail {
    pub from: String,
    pub subject: String,
    /// Source label from the classifier
    pub airline: Option<String>,
    pub email_date: Option<DateTime<Utc>>,
    pub content_hash: String,
    pub info: FlightInfo,
}

impl FlightEmail {
    #[must_use]
    pub fn new(email: &EmailRecord, airline: Option<&str>, info: FlightInfo) -> Self {
        Self {
            from: email.from.clone(),
            subject: email.subject.clone(),
            airline: airline.map(str::to_string),
            email_date: email.date,
            content_hash: email.content_hash.clone(),
            info,
        }
    }

    /// Flight dates this email speaks about, in extraction order.
    ///
    /// Segment dates only, when the email has segments; text dates otherwise.
    fn flight_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = Vec::new();
        let candidates: Vec<NaiveDate> = if self.info.segments.is_empty() {
            self.info.dates.iter().filter_map(|d| parse_display_date(d)).collect()
        } else {
            self.info.segments.iter().map(|s| s.date).collect()
        };
        for date in candidates {
            if !dates.contains(&date) {
                dates.push(date);
            }
        }
        dates
    }

    /// Check-in beats everything else, then the most recent email wins
    fn rank(&self) -> (bool, Option<DateTime<Utc>>) {
        (self.info.email_type == EmailType::CheckIn, self.email_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Confirmation(String),
    Synthetic(String),
}

fn group_key(email: &FlightEmail) -> Option<GroupKey> {
    let info = &email.info;
    if let Some(code) = &info.confirmation {
        return Some(GroupKey::Confirmation(code.clone()));
    }

    let first = info.segments.first();
    let route = info.route.clone().or_else(|| first.and_then(Segment::route));
    let (origin, destination) = route
        .as_ref()
        .map_or(("", ""), |r| (r.origin.as_str(), r.destination.as_str()));
    let date = first
        .map(|s| s.date)
        .or_else(|| info.dates.iter().find_map(|d| parse_display_date(d)))
        .map(|d| d.to_string())
        .unwrap_or_default();

    if let Some(number) = info.flight_numbers.first() {
        return Some(GroupKey::Synthetic(format!(
            "{number}|{origin}|{destination}|{date}"
        )));
    }
    if route.is_some() && !date.is_empty() {
        return Some(GroupKey::Synthetic(format!("{origin}|{destination}|{date}")));
    }
    None
}

/// Reconcile a batch of per-email records into ordered itinerary rows.
///
/// Marketing emails and emails without any usable identity are ignored.
/// Rows are sorted by flight date, undated rows last.
#[must_use]
pub fn reconcile(emails: &[FlightEmail]) -> Vec<Flight> {
    let mut groups: BTreeMap<GroupKey, Vec<&FlightEmail>> = BTreeMap::new();

    for email in emails {
        if email.info.email_type == EmailType::Marketing {
            debug!("Ignoring marketing email {:?}", email.subject);
            continue;
        }
        match group_key(email) {
            Some(key) => groups.entry(key).or_default().push(email),
            None => debug!("No flight identity in {:?}", email.subject),
        }
    }

    let mut flights = Vec::new();
    for (key, members) in &groups {
        if members
            .iter()
            .any(|e| e.info.email_type == EmailType::Cancellation)
        {
            debug!("Dropping cancelled booking {key:?}");
            continue;
        }
        let confirmation = match key {
            GroupKey::Confirmation(code) => Some(code.as_str()),
            GroupKey::Synthetic(_) => None,
        };
        flights.extend(resolve_group(confirmation, members));
    }

    flights.sort_by(|a, b| {
        let (da, db) = (a.flight_info.iso_date, b.flight_info.iso_date);
        da.is_none()
            .cmp(&db.is_none())
            .then(da.cmp(&db))
            .then_with(|| a.confirmation.cmp(&b.confirmation))
    });
    flights
}

fn resolve_group(confirmation: Option<&str>, members: &[&FlightEmail]) -> Vec<Flight> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&FlightEmail>> = BTreeMap::new();
    for email in members {
        for date in email.flight_dates() {
            buckets.entry(date).or_default().push(email);
        }
    }

    if buckets.is_empty() {
        // Undated bookings still produce a single row
        return members
            .iter()
            .copied()
            .max_by_key(|e| e.rank())
            .map(|winner| undated_row(confirmation, winner, members.len()))
            .into_iter()
            .collect();
    }

    buckets
        .into_iter()
        .filter_map(|(date, candidates)| {
            let winner = candidates.iter().copied().max_by_key(|e| e.rank())?;
            Some(dated_row(confirmation, winner, date, candidates.len()))
        })
        .collect()
}

fn flight_row(
    confirmation: Option<&str>,
    winner: &FlightEmail,
    email_count: usize,
    flight_info: FlightSummary,
) -> Flight {
    Flight {
        confirmation: confirmation.map(str::to_string),
        airline: winner.airline.clone(),
        from: winner.from.clone(),
        subject: winner.subject.clone(),
        email_date: winner.email_date,
        content_hash: winner.content_hash.clone(),
        email_count,
        flight_info,
    }
}

fn dated_row(
    confirmation: Option<&str>,
    winner: &FlightEmail,
    date: NaiveDate,
    email_count: usize,
) -> Flight {
    let info = &winner.info;

    let mut segments: Vec<Segment> = Vec::new();
    for segment in info.segments.iter().filter(|s| s.date == date) {
        if !segments.iter().any(|s| s.key() == segment.key()) {
            segments.push(segment.clone());
        }
    }

    let (route, airports, flight_numbers) = if segments.is_empty() {
        // Date came from the text only; fall back to the email's first leg
        let position = winner.flight_dates().iter().position(|d| *d == date);
        let number = position
            .and_then(|i| info.flight_numbers.get(i))
            .or_else(|| info.flight_numbers.first());
        (
            info.route.clone(),
            info.airports.clone(),
            number.cloned().into_iter().collect(),
        )
    } else {
        let mut airports: Vec<String> = Vec::new();
        let mut numbers: Vec<String> = Vec::new();
        for segment in &segments {
            for code in segment.origin.iter().chain([&segment.destination]) {
                if !airports.contains(code) {
                    airports.push(code.clone());
                }
            }
            if let Some(number) = &segment.flight_number
                && !numbers.contains(number)
            {
                numbers.push(number.clone());
            }
        }
        (segments[0].route(), airports, numbers)
    };

    flight_row(
        confirmation,
        winner,
        email_count,
        FlightSummary {
            route,
            airports,
            dates: vec![format_display(date)],
            iso_date: Some(date),
            flight_numbers,
            segments,
            email_type: info.email_type,
        },
    )
}

fn undated_row(confirmation: Option<&str>, winner: &FlightEmail, email_count: usize) -> Flight {
    let info = &winner.info;
    flight_row(
        confirmation,
        winner,
        email_count,
        FlightSummary {
            route: info.route.clone(),
            airports: info.airports.clone(),
            dates: Vec::new(),
            iso_date: None,
            flight_numbers: info.flight_numbers.clone(),
            segments: Vec::new(),
            email_type: info.email_type,
        },
    )
}
