//! Grouping of reconciled flights for reports

use crate::types::Flight;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Report bucket; dated months sort before undated flights
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MonthKey {
    Month { year: i32, month: u32 },
    Undated,
}

impl MonthKey {
    /// Heading such as `"March 2025"` or `"Undated"`
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Month { year, month } => chrono::NaiveDate::from_ymd_opt(*year, *month, 1)
                .map_or_else(|| format!("{year}-{month:02}"), |d| d.format("%B %Y").to_string()),
            Self::Undated => "Undated".to_string(),
        }
    }
}

/// Group flights by the year and month they fly, keeping input order within a month
#[must_use]
pub fn group_by_year_month(flights: &[Flight]) -> BTreeMap<MonthKey, Vec<&Flight>> {
    let mut groups: BTreeMap<MonthKey, Vec<&Flight>> = BTreeMap::new();
    for flight in flights {
        let key = flight
            .flight_info
            .iso_date
            .map_or(MonthKey::Undated, |d| MonthKey::Month {
                year: d.year(),
                month: d.month(),
            });
        groups.entry(key).or_default().push(flight);
    }
    groups
}
