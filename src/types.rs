//! Core types for emails, extracted flight data and reconciled flights

use crate::fingerprint;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fetched message as handed over by the mail-retrieval side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Sender (raw header value, e.g. `"JetBlue <noreply@jetblue.com>"`)
    pub from: String,

    /// Subject line
    pub subject: String,

    /// Received date, always normalized to UTC
    pub date: Option<DateTime<Utc>>,

    /// Plain text body
    pub body: String,

    /// HTML body (if available)
    pub html_body: Option<String>,

    /// Hash over normalized subject and leading body text
    pub content_hash: String,
}

impl EmailRecord {
    /// Build a record, computing its content hash.
    ///
    /// The hash covers the plain body, or the HTML body when the message has
    /// no plain part.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        subject: impl Into<String>,
        date: Option<DateTime<Utc>>,
        body: impl Into<String>,
        html_body: Option<String>,
    ) -> Self {
        let from = from.into();
        let subject = subject.into();
        let body = body.into();
        let hashed_body = if body.trim().is_empty() {
            html_body.as_deref().unwrap_or("")
        } else {
            body.as_str()
        };
        let content_hash = fingerprint::content_hash(&subject, hashed_body);

        Self {
            from,
            subject,
            date,
            body,
            html_body,
            content_hash,
        }
    }

    /// Year of the received date, used to qualify year-less flight dates
    #[must_use]
    pub fn received_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.date.map(|d| d.year()).filter(|y| *y > 2000)
    }
}

/// Kind of flight email
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EmailType {
    Booking,
    CheckIn,
    Cancellation,
    Marketing,
    #[default]
    Unknown,
}

impl EmailType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::CheckIn => "check-in",
            Self::Cancellation => "cancellation",
            Self::Marketing => "marketing",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin and destination airport pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// The same route flown the other way
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}

/// One leg of an itinerary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// Departure airport; absent for destination-only check-in legs
    pub origin: Option<String>,

    /// Arrival airport
    pub destination: String,

    /// Flight date
    pub date: NaiveDate,

    /// Normalized flight number (e.g. `B6349` or `1234`)
    pub flight_number: Option<String>,
}

impl Segment {
    /// Identity of the leg: origin (or destination when origin is unknown) and date
    #[must_use]
    pub fn key(&self) -> (&str, NaiveDate) {
        (
            self.origin.as_deref().unwrap_or(&self.destination),
            self.date,
        )
    }

    /// Route of the leg, when both ends are known
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.origin
            .as_ref()
            .map(|origin| Route::new(origin.clone(), self.destination.clone()))
    }
}

/// Flight facts extracted from a single email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightInfo {
    /// Booking confirmation code (PNR)
    pub confirmation: Option<String>,

    /// Valid airport codes in first-seen order (at most 4)
    pub airports: Vec<String>,

    /// Route of the first leg, when derivable
    pub route: Option<Route>,

    /// Normalized flight numbers (at most 4)
    pub flight_numbers: Vec<String>,

    /// Display dates, year-qualified first (at most 3)
    pub dates: Vec<String>,

    /// Display times (at most 4)
    pub times: Vec<String>,

    /// Per-leg segments
    pub segments: Vec<Segment>,

    /// Email classification
    pub email_type: EmailType,

    /// Relevance score when the scoring gate ran
    pub score: Option<i32>,
}

impl FlightInfo {
    /// Whether the record carries anything a booking can be keyed on
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.confirmation.is_some()
            || !self.flight_numbers.is_empty()
            || (self.route.is_some() && !self.dates.is_empty())
    }

    /// First extracted display date
    #[must_use]
    pub fn first_date(&self) -> Option<&str> {
        self.dates.first().map(String::as_str)
    }

    /// Change-detection fingerprint
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint::flight_fingerprint(self)
    }
}

/// Per-row flight details of a reconciled [`Flight`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightSummary {
    pub route: Option<Route>,
    pub airports: Vec<String>,
    pub dates: Vec<String>,
    pub iso_date: Option<NaiveDate>,
    pub flight_numbers: Vec<String>,
    pub segments: Vec<Segment>,
    pub email_type: EmailType,
}

impl FlightSummary {
    /// Change-detection fingerprint, comparable with [`FlightInfo::fingerprint`]
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint::fingerprint_parts(&self.airports, &self.dates, &self.flight_numbers)
    }
}

/// One reconciled itinerary row, ready for forwarding or reporting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flight {
    /// Booking confirmation code, if any email in the group carried one
    pub confirmation: Option<String>,

    /// Source label from the classifier
    pub airline: Option<String>,

    /// Sender of the winning email
    pub from: String,

    /// Subject of the winning email
    pub subject: String,

    /// Received date of the winning email
    pub email_date: Option<DateTime<Utc>>,

    /// Content hash of the winning email
    pub content_hash: String,

    /// Number of emails merged into this row
    pub email_count: usize,

    pub flight_info: FlightSummary,
}

impl Flight {
    /// Key under which this row is recorded in the processed store.
    ///
    /// Confirmed bookings are keyed by code and flight date so that each leg
    /// of a multi-leg booking is tracked on its own.
    #[must_use]
    pub fn store_key(&self) -> String {
        match (&self.confirmation, self.flight_info.iso_date) {
            (Some(code), Some(date)) => format!("{code}/{date}"),
            (Some(code), None) => code.clone(),
            (None, _) => format!("unknown_{}", self.content_hash),
        }
    }

    /// Change-detection fingerprint of this row
    #[must_use]
    pub fn fingerprint(&self) -> String {
        self.flight_info.fingerprint()
    }
}
