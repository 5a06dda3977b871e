//! Scan orchestration: classify, score, extract, reconcile, check the store

use crate::classify::{SourceMatch, is_flight_email};
use crate::config::EngineConfig;
use crate::extract::Extractor;
use crate::parser::message_text;
use crate::reconcile::{FlightEmail, reconcile};
use crate::scoring::score_email;
use crate::store::{ProcessedStore, StoreStatus};
use crate::types::{EmailRecord, EmailType, Flight};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// A reconciled flight with its standing against the processed store
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScannedFlight {
    pub flight: Flight,
    pub status: StoreStatus,
}

/// Per-stage counters of one scan
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ScanStats {
    pub examined: usize,
    pub duplicate_messages: usize,
    pub not_flight: usize,
    pub below_threshold: usize,
    pub marketing: usize,
    pub no_identity: usize,
    pub extracted: usize,
    pub reconciled: usize,
}

/// Result of one scan
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScanReport {
    /// New or changed flights, in itinerary order
    pub to_forward: Vec<ScannedFlight>,
    /// Flights already forwarded, or whose content was
    pub skipped: Vec<ScannedFlight>,
    pub stats: ScanStats,
}

impl ScanReport {
    /// Forwardable flights that were never recorded before
    pub fn new_flights(&self) -> impl Iterator<Item = &Flight> {
        self.to_forward
            .iter()
            .filter(|f| f.status == StoreStatus::New)
            .map(|f| &f.flight)
    }

    /// Forwardable flights whose recorded fingerprint changed
    pub fn changed_flights(&self) -> impl Iterator<Item = &Flight> {
        self.to_forward
            .iter()
            .filter(|f| f.status == StoreStatus::Changed)
            .map(|f| &f.flight)
    }
}

enum Outcome {
    NotFlight,
    BelowThreshold,
    Marketing,
    NoIdentity,
    Extracted(Box<FlightEmail>),
}

/// Runs the full per-batch pipeline
pub struct Engine {
    config: EngineConfig,
    extractor: Extractor,
}

impl Engine {
    #[must_use]
    pub const fn new(config: EngineConfig, extractor: Extractor) -> Self {
        Self { config, extractor }
    }

    /// Engine with the default structured-first extractor
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(config, Extractor::default())
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn examine(&self, email: &EmailRecord) -> Outcome {
        let source: Option<SourceMatch> = is_flight_email(&email.from, &email.subject);
        if source.is_none() && self.config.require_source_match {
            return Outcome::NotFlight;
        }

        let mut score = None;
        if self.config.scoring.enabled {
            let text: String = message_text(email)
                .chars()
                .take(self.config.scoring.body_chars)
                .collect();
            let result = score_email(&email.subject, &text, &email.from);
            if !result.passes(self.config.scoring.threshold) {
                debug!(
                    "Score {} below {} for {:?}: {}",
                    result.score,
                    self.config.scoring.threshold,
                    email.subject,
                    result.reasons.join(", ")
                );
                return Outcome::BelowThreshold;
            }
            score = Some(result.score);
        }

        let mut info = self.extractor.extract(email);
        info.score = score;

        if info.email_type == EmailType::Marketing {
            return Outcome::Marketing;
        }
        if !info.has_identity() {
            return Outcome::NoIdentity;
        }

        Outcome::Extracted(Box::new(FlightEmail::new(
            email,
            source.map(|s| s.name),
            info,
        )))
    }

    /// Extract a single email, or `None` when it is not a usable flight email
    #[must_use]
    pub fn extract_email(&self, email: &EmailRecord) -> Option<FlightEmail> {
        match self.examine(email) {
            Outcome::Extracted(flight_email) => Some(*flight_email),
            _ => None,
        }
    }

    /// Run one scan over a batch against the processed store.
    ///
    /// The store is only read; record forwarded flights with
    /// [`ProcessedStore::record`] afterwards.
    #[must_use]
    pub fn scan(&self, emails: &[EmailRecord], store: &ProcessedStore) -> ScanReport {
        let mut stats = ScanStats::default();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut extracted = Vec::new();

        for email in emails {
            stats.examined += 1;
            if !seen.insert(email.content_hash.as_str()) {
                stats.duplicate_messages += 1;
                continue;
            }
            match self.examine(email) {
                Outcome::NotFlight => stats.not_flight += 1,
                Outcome::BelowThreshold => stats.below_threshold += 1,
                Outcome::Marketing => stats.marketing += 1,
                Outcome::NoIdentity => stats.no_identity += 1,
                Outcome::Extracted(flight_email) => extracted.push(*flight_email),
            }
        }
        stats.extracted = extracted.len();

        let flights = reconcile(&extracted);
        stats.reconciled = flights.len();

        let mut report = ScanReport {
            stats,
            ..ScanReport::default()
        };
        for flight in flights {
            let status = store.status(&flight);
            let scanned = ScannedFlight { flight, status };
            if status.is_pending() {
                report.to_forward.push(scanned);
            } else {
                debug!("Skipping {} ({status:?})", scanned.flight.store_key());
                report.skipped.push(scanned);
            }
        }

        info!(
            "Scanned {} emails: {} to forward, {} skipped",
            report.stats.examined,
            report.to_forward.len(),
            report.skipped.len()
        );
        report
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}
