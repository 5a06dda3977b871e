//! Regex extraction of flight fields from plain text
//!
//! These are the building blocks of the regex fallback strategy. Every
//! finder returns its results in order of appearance and applies the field's
//! cap, so callers never see more than a handful of candidates.

use crate::airlines::is_carrier_code;
use crate::airports::is_valid_airport;
use crate::dates::{MONTH_PATTERN, date_from_parts, format_display, format_time};
use crate::types::Segment;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

pub const MAX_AIRPORTS: usize = 4;
pub const MAX_FLIGHT_NUMBERS: usize = 4;
pub const MAX_DATES: usize = 3;
pub const MAX_TIMES: usize = 4;

/// Words that look like confirmation codes in subjects and bodies
const EXCLUDED_PNR_WORDS: &[&str] = &[
    "FLIGHT", "NUMBER", "BOOKED", "TRAVEL", "DEPART", "ARRIVE", "RETURN", "TICKET", "STATUS",
    "CHANGE", "UPDATE", "MOBILE", "ONLINE", "PLEASE", "THANKS", "REVIEW", "CANCEL", "REFUND",
    "CREDIT", "POINTS", "MEMBER", "REWARD", "BONUS", "SELECT", "OPTION", "DETAIL", "SUMMARY",
    "RECEIPT", "CONFIRM", "AIRLINE", "AIRPORT", "BOARDING", "BAGGAGE", "SEATING", "DIRECT",
    "NONSTOP", "ECONOMY", "PREMIUM", "FIRST", "COACH", "MAIN", "BASIC", "CABIN", "WINDOW",
    "MIDDLE", "TRAVELER", "PASSENGER", "ADULT", "CHILD", "INFANT", "SENIOR", "MILES", "EARNED",
    "BALANCE", "ACCOUNT", "PROFILE", "LOGIN", "SIGNIN", "HELPFUL", "CUSTOMER", "SERVICE",
    "CONTACT", "SUPPORT", "CENTER", "PRIVACY", "POLICY", "TERMS", "ACCESS", "PROGRAM",
    "FOOTER", "HEADER", "BUTTON", "MARGIN", "BORDER", "HEIGHT", "WIDTH", "ITINERARY",
];

static CITY_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([A-Z]{3})\)").unwrap());

static CODE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{3})\s*(?:→|->|–|—|-|\bto\b)\s*([A-Z]{3})\b").unwrap()
});

static LABELLED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:\b(?:depart(?:s|ure|ing)?|arriv(?:e|es|al|ing)|from|to)\b)\s*:?\s*([A-Z]{3})\b")
        .unwrap()
});

static CARRIER_FLIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Z0-9]|[0-9][A-Z])\s?-?\s?(\d{1,4})\b").unwrap()
});

static BARE_FLIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:\b(?:flight|flt)\b)\.?\s*(?i:#|no\.?|number)?\s*:?\s*(\d{1,4})\b").unwrap()
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_PATTERN})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})\s+({MONTH_PATTERN})\.?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap());

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_PATTERN})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .unwrap()
});

static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s*({MONTH_PATTERN})\b")).unwrap()
});

static MERIDIEM_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s?([ap])\.?m\b\.?").unwrap()
});

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());

static SUBJECT_SUFFIX_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]+\s+([A-Z0-9]{6})\s*$").unwrap());

static LABELLED_CONFIRMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:\b(?:confirmation(?:\s+(?:code|number|no\.?|#))?|booking\s+(?:reference|code|ref\.?)|record\s+locator|pnr|reservation(?:\s+(?:code|number))?)\b)(?:\s+(?i:is))?\s*[:#]?\s*#?\s*([A-Z0-9]{6})\b",
    )
    .unwrap()
});

static CODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([A-Z0-9]{6})\b").unwrap());

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9A-F]{6}|[0-9A-F]{3})$").unwrap());

static ITINERARY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b([A-Z]{{3}})\s+([A-Z]{{3}})\s+(?:\d+\s*hr\s*(?:\d+\s*min\s+)?)?(?i:flight)\s+(\d{{1,4}})\s+(?:(?i:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+)?((?i:{MONTH_PATTERN}))\.?\s+(\d{{1,2}})(?:,?\s+(\d{{4}}))?"
    ))
    .unwrap()
});

/// A date found in text, with its resolved calendar value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    /// Text as shown in the email, or a generated display for year-less dates
    pub display: String,
    pub date: NaiveDate,
    /// Whether the email itself stated the year
    pub year_qualified: bool,
}

fn overlaps(spans: &[Range<usize>], span: &Range<usize>) -> bool {
    spans.iter().any(|s| s.start < span.end && span.start < s.end)
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Airport codes from parenthesized codes, code pairs and labelled codes.
///
/// Only whitelisted, non-excluded codes survive; ordering follows position
/// in the text across all three families.
#[must_use]
pub fn extract_airports(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();

    for caps in CITY_CODE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            found.push((m.start(), m.as_str()));
        }
    }
    for caps in CODE_PAIR.captures_iter(text) {
        for group in [1, 2] {
            if let Some(m) = caps.get(group) {
                found.push((m.start(), m.as_str()));
            }
        }
    }
    for caps in LABELLED_CODE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            found.push((m.start(), m.as_str()));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut airports = Vec::new();
    for (_, code) in found {
        if is_valid_airport(code) {
            push_unique(&mut airports, code.to_string());
        }
        if airports.len() == MAX_AIRPORTS {
            break;
        }
    }
    airports
}

/// Canonical flight number: carrier prefix plus digits without leading zeros
#[must_use]
pub fn normalize_flight_number(prefix: Option<&str>, digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{}{digits}", prefix.unwrap_or(""))
}

fn flight_digits(number: &str) -> &str {
    match number.get(..2) {
        Some(prefix) if number.len() > 2 && !prefix.chars().all(|c| c.is_ascii_digit()) => {
            &number[2..]
        }
        _ => number,
    }
}

/// Whether two normalized flight numbers name the same flight, one of them
/// possibly written without its carrier prefix
#[must_use]
pub fn same_flight_number(a: &str, b: &str) -> bool {
    let bare = |n: &str| n.chars().all(|c| c.is_ascii_digit());
    a == b || (bare(a) != bare(b) && flight_digits(a) == flight_digits(b))
}

/// Carrier-prefixed flight numbers such as `B6 349` or `DL2971`.
///
/// Prefixes must be known carrier codes. A prefix directly after a clock
/// reading is a meridiem (`10:30 AM 2025`), not Aeromexico.
#[must_use]
pub fn carrier_flight_numbers(text: &str) -> Vec<(usize, String)> {
    CARRIER_FLIGHT
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let prefix = caps.get(1)?.as_str();
            let digits = caps.get(2)?.as_str();

            if !is_carrier_code(prefix) {
                return None;
            }
            let before = text[..whole.start()].trim_end();
            if matches!(prefix, "AM" | "PM")
                && before.ends_with(|c: char| c.is_ascii_digit())
            {
                return None;
            }
            Some((whole.start(), normalize_flight_number(Some(prefix), digits)))
        })
        .collect()
}

/// Flight numbers: carrier-prefixed forms plus bare `Flight 1234` mentions.
///
/// A bare number is dropped when the same digits also appear with a carrier
/// prefix.
#[must_use]
pub fn extract_flight_numbers(text: &str) -> Vec<String> {
    let prefixed = carrier_flight_numbers(text);
    let mut found: Vec<(usize, String)> = prefixed.clone();

    for caps in BARE_FLIGHT.captures_iter(text) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let number = normalize_flight_number(None, digits.as_str());
        let shadowed = prefixed.iter().any(|(_, p)| same_flight_number(p, &number));
        if !shadowed {
            found.push((whole.start(), number));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut numbers = Vec::new();
    for (_, number) in found {
        push_unique(&mut numbers, number);
        if numbers.len() == MAX_FLIGHT_NUMBERS {
            break;
        }
    }
    numbers
}

fn year_qualified_dates(text: &str) -> Vec<(Range<usize>, ExtractedDate)> {
    let mut found = Vec::new();
    let mut record = |range: Range<usize>, display: &str, date: Option<NaiveDate>| {
        if let Some(date) = date {
            found.push((
                range,
                ExtractedDate {
                    display: display.split_whitespace().collect::<Vec<_>>().join(" "),
                    date,
                    year_qualified: true,
                },
            ));
        }
    };

    for caps in ISO_DATE.captures_iter(text) {
        let whole = &caps[0];
        let date = NaiveDate::parse_from_str(whole, "%Y-%m-%d").ok();
        if let Some(m) = caps.get(0) {
            record(m.range(), whole, date);
        }
    }
    for caps in MONTH_DAY_YEAR.captures_iter(text) {
        let date = match (caps[2].parse::<u32>(), caps[3].parse::<i32>()) {
            (Ok(day), Ok(year)) => date_from_parts(&caps[1], day, year),
            _ => None,
        };
        if let Some(m) = caps.get(0) {
            record(m.range(), m.as_str(), date);
        }
    }
    for caps in DAY_MONTH_YEAR.captures_iter(text) {
        let date = match (caps[1].parse::<u32>(), caps[3].parse::<i32>()) {
            (Ok(day), Ok(year)) => date_from_parts(&caps[2], day, year),
            _ => None,
        };
        if let Some(m) = caps.get(0) {
            record(m.range(), m.as_str(), date);
        }
    }
    for caps in NUMERIC_DATE.captures_iter(text) {
        let date = match (
            caps[1].parse::<u32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<i32>(),
        ) {
            (Ok(month), Ok(day), Ok(year)) => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        };
        if let Some(m) = caps.get(0) {
            record(m.range(), m.as_str(), date);
        }
    }

    found.sort_by_key(|(range, _)| range.start);
    found
}

fn yearless_dates(text: &str, year: i32, taken: &[Range<usize>]) -> Vec<(usize, ExtractedDate)> {
    let mut found = Vec::new();

    let mut record = |range: Range<usize>, month: &str, day: &str| {
        // Lower-case month words ("you may 10...") are prose, not dates
        let capitalized = text[range.clone()]
            .chars()
            .find(char::is_ascii_alphabetic)
            .is_some_and(|c| c.is_ascii_uppercase());
        if !capitalized || overlaps(taken, &range) {
            return;
        }
        if let Some(date) = day.parse::<u32>().ok().and_then(|d| date_from_parts(month, d, year)) {
            found.push((
                range.start,
                ExtractedDate {
                    display: format_display(date),
                    date,
                    year_qualified: false,
                },
            ));
        }
    };

    for caps in MONTH_DAY.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            record(m.range(), &caps[1], &caps[2]);
        }
    }
    for caps in DAY_MONTH.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            record(m.range(), &caps[2], &caps[1]);
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found
}

/// Dates in two passes: year-qualified forms first, then year-less forms
/// completed with the received year.
///
/// Year-less forms are skipped entirely when no received year is known.
/// Results are unique by calendar date and capped at [`MAX_DATES`].
#[must_use]
pub fn extract_dates(text: &str, received_year: Option<i32>) -> Vec<ExtractedDate> {
    let qualified = year_qualified_dates(text);
    let taken: Vec<Range<usize>> = qualified.iter().map(|(r, _)| r.clone()).collect();

    let mut candidates: Vec<ExtractedDate> = qualified.into_iter().map(|(_, d)| d).collect();
    if let Some(year) = received_year {
        candidates.extend(yearless_dates(text, year, &taken).into_iter().map(|(_, d)| d));
    }

    let mut dates: Vec<ExtractedDate> = Vec::new();
    for candidate in candidates {
        if !dates.iter().any(|d| d.date == candidate.date) {
            dates.push(candidate);
        }
        if dates.len() == MAX_DATES {
            break;
        }
    }
    dates
}

/// Clock times, 12-hour forms normalized to `"6:00 PM"`
#[must_use]
pub fn extract_times(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut taken: Vec<Range<usize>> = Vec::new();

    for caps in MERIDIEM_TIME.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let meridiem = if caps[3].eq_ignore_ascii_case("p") { "PM" } else { "AM" };
        let parsed = NaiveTime::parse_from_str(
            &format!("{}:{} {meridiem}", &caps[1], &caps[2]),
            "%I:%M %p",
        );
        if let Ok(time) = parsed {
            found.push((m.start(), format_time(time)));
            taken.push(m.range());
        }
    }
    for m in CLOCK_TIME.find_iter(text) {
        if !overlaps(&taken, &m.range()) {
            found.push((m.start(), m.as_str().to_string()));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut times = Vec::new();
    for (_, time) in found {
        push_unique(&mut times, time);
        if times.len() == MAX_TIMES {
            break;
        }
    }
    times
}

/// Check if a six-character token is a plausible booking reference.
///
/// Rejects common words, hex colours, runs of one character, pure numbers
/// and pure hex strings that lack either letters or digits.
#[must_use]
pub fn is_valid_pnr(code: &str) -> bool {
    if code.len() != 6
        || !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return false;
    }
    if EXCLUDED_PNR_WORDS.contains(&code) {
        return false;
    }

    let has_letter = code.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = code.chars().any(|c| c.is_ascii_digit());
    if !has_letter {
        return false;
    }

    let mut chars = code.chars();
    let first = chars.next();
    if chars.all(|c| Some(c) == first) {
        return false;
    }

    !(HEX_COLOR.is_match(code) && !(has_letter && has_digit))
}

/// Confirmation code in priority order: trailing subject token, labelled
/// body code, then any plausible bare token in the subject
#[must_use]
pub fn extract_confirmation(subject: &str, text: &str) -> Option<String> {
    if let Some(caps) = SUBJECT_SUFFIX_CODE.captures(subject)
        && is_valid_pnr(&caps[1])
    {
        return Some(caps[1].to_string());
    }

    for source in [text, subject] {
        if let Some(code) = LABELLED_CONFIRMATION
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .find(|code| is_valid_pnr(code))
        {
            return Some(code);
        }
    }

    CODE_TOKEN
        .captures_iter(subject)
        .map(|caps| caps[1].to_string())
        .find(|code| is_valid_pnr(code))
}

/// First plausible booking reference anywhere in `text`
#[must_use]
pub fn find_pnr_token(text: &str) -> Option<&str> {
    CODE_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|code| is_valid_pnr(code))
}

/// Itinerary rows of the form `BOS SAV Flight 349 Wed, Nov 12`.
///
/// Each row becomes an explicit segment; rows whose year is neither printed
/// nor derivable from the received date are dropped. `carrier` prefixes the
/// flight number when the sending airline is known.
#[must_use]
pub fn extract_itinerary_rows(
    text: &str,
    received_year: Option<i32>,
    carrier: Option<&str>,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for caps in ITINERARY_ROW.captures_iter(text) {
        let (origin, destination) = (&caps[1], &caps[2]);
        if !is_valid_airport(origin) || !is_valid_airport(destination) {
            continue;
        }

        let year = caps
            .get(6)
            .and_then(|y| y.as_str().parse().ok())
            .or(received_year);
        let date = year.and_then(|year| {
            caps[5]
                .parse()
                .ok()
                .and_then(|day| date_from_parts(&caps[4], day, year))
        });
        let Some(date) = date else { continue };

        let segment = Segment {
            origin: Some(origin.to_string()),
            destination: destination.to_string(),
            date,
            flight_number: Some(normalize_flight_number(carrier, &caps[3])),
        };
        if !segments.iter().any(|s| s.key() == segment.key()) {
            segments.push(segment);
        }
    }
    segments
}
