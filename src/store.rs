//! Persisted record of already-forwarded flights
//!
//! The engine only reads the store during a scan. Callers update it with
//! [`ProcessedStore::record`] after they have acted on a flight, then
//! persist it with [`ProcessedStore::to_json`].

use crate::error::{Error, Result};
use crate::types::Flight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// What was recorded for one forwarded flight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessedEntry {
    pub fingerprint: String,
    #[serde(default)]
    pub airports: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub flight_numbers: Vec<String>,
    #[serde(alias = "imported_at")]
    pub forwarded_at: DateTime<Utc>,
}

/// How a reconciled flight relates to what was already forwarded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StoreStatus {
    /// Never seen before
    New,
    /// Recorded before with a different fingerprint
    Changed,
    /// Recorded before with the same fingerprint
    AlreadyImported,
    /// Not recorded, but the same message content was forwarded already
    DuplicateContent,
}

impl StoreStatus {
    /// Whether the flight should be forwarded
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::New | Self::Changed)
    }
}

/// Forwarded flights keyed by [`Flight::store_key`], plus every content hash seen
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessedStore {
    #[serde(default)]
    pub confirmations: BTreeMap<String, ProcessedEntry>,
    #[serde(default)]
    pub content_hashes: BTreeSet<String>,
}

impl ProcessedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a store document, failing on any malformed content
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Store)
    }

    /// Decode a store document, recovering what can be recovered.
    ///
    /// Empty input is a first run. A section that fails to decode is reset
    /// on its own; an undecodable document yields an empty store.
    #[must_use]
    pub fn load_or_default(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::default();
        }

        let value: Value = match serde_json::from_str(json) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                warn!("Processed store is not a JSON object, starting fresh");
                return Self::default();
            }
            Err(e) => {
                warn!("Processed store is corrupt ({e}), starting fresh");
                return Self::default();
            }
        };

        let confirmations: BTreeMap<String, ProcessedEntry> = value
            .get("confirmations")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .unwrap_or_else(|e| {
                warn!("Discarding unreadable confirmations in processed store: {e}");
                None
            })
            .unwrap_or_default();

        let content_hashes: BTreeSet<String> = value
            .get("content_hashes")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .unwrap_or_else(|e| {
                warn!("Discarding unreadable content hashes in processed store: {e}");
                None
            })
            .unwrap_or_default();

        Self {
            confirmations,
            content_hashes,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Store)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.confirmations.is_empty() && self.content_hashes.is_empty()
    }

    #[must_use]
    pub fn entry(&self, flight: &Flight) -> Option<&ProcessedEntry> {
        self.confirmations.get(&flight.store_key())
    }

    /// Decide what a reconciled flight means against the store
    #[must_use]
    pub fn status(&self, flight: &Flight) -> StoreStatus {
        let entry = self.entry(flight);

        if entry.is_some_and(|e| e.fingerprint == flight.fingerprint()) {
            return StoreStatus::AlreadyImported;
        }
        if self.content_hashes.contains(&flight.content_hash) {
            return StoreStatus::DuplicateContent;
        }
        if entry.is_some() {
            StoreStatus::Changed
        } else {
            StoreStatus::New
        }
    }

    /// Record a flight as forwarded
    pub fn record(&mut self, flight: &Flight, forwarded_at: DateTime<Utc>) {
        let info = &flight.flight_info;
        self.confirmations.insert(
            flight.store_key(),
            ProcessedEntry {
                fingerprint: flight.fingerprint(),
                airports: info.airports.clone(),
                dates: info.dates.clone(),
                flight_numbers: info.flight_numbers.clone(),
                forwarded_at,
            },
        );
        self.content_hashes.insert(flight.content_hash.clone());
    }
}
