// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Flight Record Extraction
//!
//! Turns a batch of airline, booking-site and travel-portal emails into a
//! de-duplicated, chronologically ordered list of flights.
//!
//! # Pipeline
//!
//! - Classification of sender and subject against a profile table
//! - Optional weighted relevance scoring
//! - Field extraction (JSON-LD markup, labelled dates, regex fallback)
//! - Batch reconciliation (grouping, cancellation, per-date resolution)
//! - Change detection against a persisted processed store
//!
//! # Example
//!
//! ```rust
//! use flight_extract::{Engine, ProcessedStore, parse_message};
//!
//! let raw = b"From: JetBlue <noreply@jetblue.com>\r\n\
//!             Subject: Your flight confirmation - DG7X2Q\r\n\
//!             Date: Mon, 03 Nov 2025 12:00:00 +0000\r\n\
//!             \r\n\
//!             Flight 349 Boston (BOS) to Savannah (SAV) Dec 12, 2025 6:00 PM";
//! let email = parse_message(raw).unwrap();
//!
//! let report = Engine::default().scan(&[email], &ProcessedStore::new());
//! let flight = &report.to_forward[0].flight;
//! assert_eq!(flight.confirmation.as_deref(), Some("DG7X2Q"));
//! assert_eq!(flight.flight_info.airports, vec!["BOS", "SAV"]);
//! ```

mod airlines;
mod airports;
mod classify;
mod config;
mod dates;
mod engine;
mod error;
mod extract;
mod fingerprint;
mod parser;
mod patterns;
mod reconcile;
mod scoring;
mod store;
mod structured;
mod summary;
mod types;

pub use airlines::{
    SourceKind, airline_from_sender, airline_from_text, carrier_code, carrier_name,
    is_carrier_code,
};
pub use airports::{airport_display, excluded_codes, iata_codes, is_valid_airport};
pub use classify::{SourceMatch, get_email_type, is_flight_email, is_marketing_email};
pub use config::{EngineConfig, ScoringConfig};
pub use dates::{ChronoDateParser, DateParser, format_display, parse_display_date, parse_received_date};
pub use engine::{Engine, ScanReport, ScanStats, ScannedFlight};
pub use error::{Error, Result};
pub use extract::{
    ExtractionInput, ExtractionStrategy, Extractor, LabelledDateStrategy, PartialFlightInfo,
    RegexStrategy, StructuredDataStrategy, build_segments,
};
pub use fingerprint::{CONTENT_HASH_BODY_CHARS, content_hash, fingerprint_parts, flight_fingerprint};
pub use parser::{message_text, parse_message, strip_html};
pub use patterns::{
    ExtractedDate, extract_airports, extract_confirmation, extract_dates, extract_flight_numbers,
    extract_itinerary_rows, extract_times, is_valid_pnr, normalize_flight_number, same_flight_number,
};
pub use reconcile::{FlightEmail, reconcile};
pub use scoring::{DEFAULT_THRESHOLD, EmailScore, passes_score_threshold, score_email};
pub use store::{ProcessedEntry, ProcessedStore, StoreStatus};
pub use structured::{StructuredBooking, extract_structured};
pub use summary::{MonthKey, group_by_year_month};
pub use types::*;
