//! Flight email classification
//!
//! Two independent, pure decisions: whether a message comes from a
//! flight-related source ([`is_flight_email`]), and what kind of flight email
//! it is ([`get_email_type`]). Neither looks at other messages.

use crate::airlines::{SOURCE_PROFILES, SourceKind, SourceProfile};
use crate::types::EmailType;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::trace;

/// Source identified for a flight email
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SourceMatch {
    /// Profile label, e.g. `"JetBlue"` or `"Generic Flight"`
    pub name: &'static str,
    pub kind: SourceKind,
}

struct CompiledProfile {
    profile: &'static SourceProfile,
    from: Vec<Regex>,
    subject: Vec<Regex>,
}

impl CompiledProfile {
    fn matches(&self, from: &str, subject: &str) -> bool {
        let from_ok = self.from.is_empty() || self.from.iter().any(|re| re.is_match(from));
        from_ok && self.subject.iter().any(|re| re.is_match(subject))
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
        .collect()
}

static PROFILES: LazyLock<Vec<CompiledProfile>> = LazyLock::new(|| {
    SOURCE_PROFILES
        .iter()
        .map(|profile| CompiledProfile {
            profile,
            from: compile(profile.from_patterns),
            subject: compile(profile.subject_patterns),
        })
        .collect()
});

/// Match a sender and subject against the profile table.
///
/// Returns the first profile whose sender and subject patterns both match;
/// the catch-all profile is matched on subject alone.
#[must_use]
pub fn is_flight_email(from: &str, subject: &str) -> Option<SourceMatch> {
    let matched = PROFILES
        .iter()
        .find(|compiled| compiled.matches(from, subject))
        .map(|compiled| SourceMatch {
            name: compiled.profile.name,
            kind: compiled.profile.kind,
        });

    if matched.is_none() {
        trace!("No flight profile for {from:?} / {subject:?}");
    }

    matched
}

// Marketing footer and promotion phrases
const MARKETING_KEYWORDS: &[&str] = &[
    "unsubscribe",
    "opt out",
    "manage preferences",
    "trueblue points",
    "earn points",
    "bonus points",
    "limited time",
    "book now",
    "sale ends",
    "exclusive offer",
    "special offer",
    "credit card",
    "apply now",
];

const MARKETING_SUBJECT_WORDS: &[&str] = &[
    "earn", "bonus", "points", "sale", "offer", "save", "win", "deals", "discount", "reward",
];

const SURVEY_PHRASES: &[&str] = &[
    "survey",
    "how was your flight",
    "rate your experience",
    "tell us about your trip",
];

// Declarative forms only; "if your flight is cancelled" is policy text
const CANCELLATION_PHRASES: &[&str] = &[
    "has been cancelled",
    "has been canceled",
    "is now cancelled",
    "is now canceled",
];

const CONDITIONAL_OPENERS: &[&str] = &["if ", "in the event", "should ", "when ", "in case"];

const CHECK_IN_SUBJECT_PHRASES: &[&str] = &["check-in", "check in", "boarding pass"];

const BOOKING_SUBJECT_WORDS: &[&str] = &[
    "confirmation",
    "itinerary",
    "receipt",
    "reservation",
    "e-ticket",
    "eticket",
];

/// Check if a message reads like a promotion rather than a transaction
#[must_use]
pub fn is_marketing_email(subject: &str, text: &str) -> bool {
    let subject_lower = subject.to_lowercase();

    if SURVEY_PHRASES.iter().any(|p| subject_lower.contains(p)) {
        return true;
    }

    // Footers of real bookings carry the same boilerplate as promotions
    let transactional = BOOKING_SUBJECT_WORDS
        .iter()
        .chain(["check-in", "check in"].iter())
        .any(|w| subject_lower.contains(w));
    if transactional {
        return false;
    }

    let combined = format!("{} {}", text.to_lowercase(), subject_lower);
    let keyword_hits = MARKETING_KEYWORDS
        .iter()
        .filter(|kw| combined.contains(*kw))
        .count();
    if keyword_hits >= 2 {
        return true;
    }

    MARKETING_SUBJECT_WORDS
        .iter()
        .any(|kw| subject_lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == *kw))
}

/// Whether some sentence of the body declares a cancellation outright
fn states_cancellation(body_lower: &str) -> bool {
    body_lower
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|sentence| !CONDITIONAL_OPENERS.iter().any(|o| sentence.starts_with(o)))
        .any(|sentence| CANCELLATION_PHRASES.iter().any(|p| sentence.contains(p)))
}

/// Classify a flight email by its wording.
///
/// `flight_relevant` is true when the caller already knows the message
/// carries booking data (e.g. a confirmation code was found); such messages
/// fall back to [`EmailType::Booking`] instead of [`EmailType::Unknown`].
#[must_use]
pub fn get_email_type(subject: &str, body: &str, flight_relevant: bool) -> EmailType {
    let subject_lower = subject.to_lowercase();
    let body_lower = body.to_lowercase();

    if subject_lower.contains("cancel") || states_cancellation(&body_lower) {
        return EmailType::Cancellation;
    }

    if is_marketing_email(subject, body) {
        return EmailType::Marketing;
    }

    let booking_subject = BOOKING_SUBJECT_WORDS
        .iter()
        .any(|w| subject_lower.contains(w));

    // Check-in reminders also sit in booking bodies, so only the subject counts
    if CHECK_IN_SUBJECT_PHRASES
        .iter()
        .any(|p| subject_lower.contains(p))
    {
        return EmailType::CheckIn;
    }

    if booking_subject || flight_relevant {
        EmailType::Booking
    } else {
        EmailType::Unknown
    }
}
