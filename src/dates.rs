//! Date and time parsing for flight emails
//!
//! Date parsing is injected into the extractor through the [`DateParser`]
//! trait, so extraction stays deterministic and can be tested with a fixed
//! parser. [`ChronoDateParser`] is the default implementation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

const MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Regex alternation matching English month names and abbreviations
pub const MONTH_PATTERN: &str = r"Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sept?(?:ember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static GLUED_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})({MONTH_PATTERN})\b")).unwrap()
});

static MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2}:\d{2})\s*([ap])\.?m\.?$").unwrap());

static CLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap());

/// Month number for an English month name or abbreviation
#[must_use]
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    MONTHS.iter().find(|(m, _)| *m == lower).map(|(_, n)| *n)
}

/// Build a date from a month name, day and year
#[must_use]
pub fn date_from_parts(month: &str, day: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month_number(month)?, day)
}

/// Display form used for generated dates, e.g. `"Mar 1, 2025"`
#[must_use]
pub fn format_display(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parses free-form date and time text found next to labels like "Departs:"
pub trait DateParser: Send + Sync {
    /// Find a calendar date in `text`.
    ///
    /// Year-less dates are completed with `default_year`; without one they
    /// are not recognized.
    fn parse_date(&self, text: &str, default_year: Option<i32>) -> Option<NaiveDate>;

    /// Find a clock time in `text`
    fn parse_time(&self, text: &str) -> Option<NaiveTime>;
}

/// [`DateParser`] backed by chrono format strings
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateParser;

const DATED_FORMATS: &[&str] = &[
    "%b %d %Y", "%d %b %Y", "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y",
];

const YEARLESS_FORMATS: &[&str] = &["%b %d %Y", "%d %b %Y"];

impl ChronoDateParser {
    /// Canonical tokens: weekday names dropped, month names abbreviated,
    /// punctuation between tokens removed.
    fn tokens(text: &str) -> Vec<String> {
        let text = ORDINAL_SUFFIX.replace_all(text, "$1");
        let text = GLUED_DAY_MONTH.replace_all(&text, "$1 $2");

        text.split(|c: char| c.is_whitespace() || c == ',')
            .map(|t| t.trim_matches(|c: char| c == '.' || c == '(' || c == ')'))
            .filter(|t| !t.is_empty() && !is_weekday(t))
            .map(|t| {
                month_number(t).map_or_else(
                    || t.to_string(),
                    |m| SHORT_MONTHS[(m - 1) as usize].to_string(),
                )
            })
            .collect()
    }

    fn parse_window(window: &str, default_year: Option<i32>) -> Option<NaiveDate> {
        if let Some(date) = DATED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(window, fmt).ok())
        {
            return Some(date);
        }

        let year = default_year?;
        let completed = format!("{window} {year}");
        YEARLESS_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&completed, fmt).ok())
    }
}

impl DateParser for ChronoDateParser {
    fn parse_date(&self, text: &str, default_year: Option<i32>) -> Option<NaiveDate> {
        let tokens = Self::tokens(text);

        for start in 0..tokens.len() {
            for len in (1..=3).rev() {
                let Some(window) = tokens.get(start..start + len) else {
                    continue;
                };
                if let Some(date) = Self::parse_window(&window.join(" "), default_year) {
                    return Some(date);
                }
            }
        }
        None
    }

    fn parse_time(&self, text: &str) -> Option<NaiveTime> {
        let words: Vec<&str> = text.split_whitespace().collect();

        for (i, word) in words.iter().enumerate() {
            let joined = words
                .get(i + 1)
                .map_or_else(|| (*word).to_string(), |next| format!("{word} {next}"));

            for candidate in [joined.as_str(), *word] {
                if let Some(caps) = MERIDIEM.captures(candidate) {
                    let normalized = format!("{} {}M", &caps[1], caps[2].to_uppercase());
                    if let Ok(time) = NaiveTime::parse_from_str(&normalized, "%I:%M %p") {
                        return Some(time);
                    }
                }
            }

            let bare = word.trim_end_matches(|c: char| !c.is_ascii_digit());
            if CLOCK.is_match(bare)
                && let Ok(time) = NaiveTime::parse_from_str(bare, "%H:%M")
            {
                return Some(time);
            }
        }
        None
    }
}

fn is_weekday(token: &str) -> bool {
    const WEEKDAYS: &[&str] = &[
        "mon", "monday", "tue", "tues", "tuesday", "wed", "wednesday", "thu", "thur", "thurs",
        "thursday", "fri", "friday", "sat", "saturday", "sun", "sunday",
    ];
    let lower = token.to_lowercase();
    WEEKDAYS.contains(&lower.as_str())
}

/// Parse a display date produced by extraction back into a calendar date
#[must_use]
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    ChronoDateParser.parse_date(text, None)
}

/// Display form for a clock time, e.g. `"6:00 PM"`
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Parse a received-date header into UTC.
///
/// Accepts RFC 2822, RFC 3339 and naive `YYYY-MM-DD[ HH:MM:SS]` forms; naive
/// values are taken as UTC so every received date shares one timeline.
#[must_use]
pub fn parse_received_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
