//! Declarative carrier and sender tables
//!
//! Everything here is plain data: adding a carrier or a booking site is a
//! table edit, and the matching code in [`crate::classify`] and
//! [`crate::scoring`] never changes.

use serde::Serialize;

/// Two-character IATA carrier codes accepted as flight-number prefixes
pub static CARRIER_CODES: &[(&str, &str)] = &[
    // United States
    ("AA", "American Airlines"),
    ("DL", "Delta"),
    ("UA", "United"),
    ("WN", "Southwest"),
    ("B6", "JetBlue"),
    ("AS", "Alaska Airlines"),
    ("NK", "Spirit"),
    ("F9", "Frontier"),
    ("HA", "Hawaiian Airlines"),
    ("G4", "Allegiant"),
    ("SY", "Sun Country"),
    ("MX", "Breeze Airways"),
    ("9K", "Cape Air"),
    // Canada
    ("AC", "Air Canada"),
    ("WS", "WestJet"),
    // Europe
    ("BA", "British Airways"),
    ("LH", "Lufthansa"),
    ("AF", "Air France"),
    ("KL", "KLM"),
    ("VS", "Virgin Atlantic"),
    ("IB", "Iberia"),
    ("AZ", "ITA Airways"),
    ("SK", "SAS"),
    ("AY", "Finnair"),
    ("LX", "Swiss"),
    ("OS", "Austrian"),
    ("TP", "TAP Portugal"),
    ("EI", "Aer Lingus"),
    ("FR", "Ryanair"),
    ("U2", "easyJet"),
    ("FI", "Icelandair"),
    ("DY", "Norwegian"),
    // Middle East
    ("EK", "Emirates"),
    ("EY", "Etihad"),
    ("QR", "Qatar Airways"),
    ("TK", "Turkish Airlines"),
    ("SV", "Saudia"),
    ("GF", "Gulf Air"),
    ("WY", "Oman Air"),
    // Asia
    ("CX", "Cathay Pacific"),
    ("SQ", "Singapore Airlines"),
    ("JL", "Japan Airlines"),
    ("NH", "ANA"),
    ("KE", "Korean Air"),
    ("OZ", "Asiana"),
    ("TG", "Thai Airways"),
    ("MH", "Malaysia Airlines"),
    ("CI", "China Airlines"),
    ("BR", "EVA Air"),
    ("CA", "Air China"),
    ("MU", "China Eastern"),
    ("CZ", "China Southern"),
    ("VN", "Vietnam Airlines"),
    ("GA", "Garuda"),
    ("PR", "Philippine Airlines"),
    ("AK", "AirAsia"),
    // Australia and Pacific
    ("QF", "Qantas"),
    ("VA", "Virgin Australia"),
    ("NZ", "Air New Zealand"),
    ("FJ", "Fiji Airways"),
    // Latin America
    ("AM", "Aeromexico"),
    ("AV", "Avianca"),
    ("LA", "LATAM"),
    ("CM", "Copa"),
    ("AD", "Azul"),
    ("G3", "GOL"),
    ("Y4", "Volaris"),
];

/// Lower-case name variations mapped to a standard airline name
pub static AIRLINE_NAME_VARIATIONS: &[(&str, &str)] = &[
    ("jetblue airways", "JetBlue"),
    ("jet blue", "JetBlue"),
    ("jetblue", "JetBlue"),
    ("delta air lines", "Delta"),
    ("delta airlines", "Delta"),
    ("delta", "Delta"),
    ("united airlines", "United"),
    ("united", "United"),
    ("american airlines", "American Airlines"),
    ("aa.com", "American Airlines"),
    ("southwest airlines", "Southwest"),
    ("southwest", "Southwest"),
    ("alaska airlines", "Alaska Airlines"),
    ("alaskaair", "Alaska Airlines"),
    ("spirit airlines", "Spirit"),
    ("frontier airlines", "Frontier"),
    ("flyfrontier", "Frontier"),
    ("hawaiian airlines", "Hawaiian Airlines"),
    ("allegiant", "Allegiant"),
    ("sun country", "Sun Country"),
    ("breeze airways", "Breeze Airways"),
    ("cape air", "Cape Air"),
    ("air canada", "Air Canada"),
    ("westjet", "WestJet"),
    ("british airways", "British Airways"),
    ("lufthansa", "Lufthansa"),
    ("air france", "Air France"),
    ("klm", "KLM"),
    ("virgin atlantic", "Virgin Atlantic"),
    ("iberia", "Iberia"),
    ("aer lingus", "Aer Lingus"),
    ("icelandair", "Icelandair"),
    ("norwegian", "Norwegian"),
    ("ryanair", "Ryanair"),
    ("easyjet", "easyJet"),
    ("emirates", "Emirates"),
    ("etihad", "Etihad"),
    ("qatar airways", "Qatar Airways"),
    ("turkish airlines", "Turkish Airlines"),
    ("cathay pacific", "Cathay Pacific"),
    ("singapore airlines", "Singapore Airlines"),
    ("japan airlines", "Japan Airlines"),
    ("all nippon", "ANA"),
    ("korean air", "Korean Air"),
    ("qantas", "Qantas"),
    ("air new zealand", "Air New Zealand"),
    ("aeromexico", "Aeromexico"),
    ("avianca", "Avianca"),
    ("latam", "LATAM"),
    ("copa airlines", "Copa"),
];

/// Where a sender profile sits in the matching order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Carrier,
    AirlineGroup,
    BookingSite,
    TravelPortal,
    Generic,
}

/// One row of the sender/subject profile table.
///
/// Patterns are case-insensitive regexes. An empty `from_patterns` list means
/// the profile matches on subject alone.
#[derive(Debug)]
pub struct SourceProfile {
    pub name: &'static str,
    pub kind: SourceKind,
    pub from_patterns: &'static [&'static str],
    pub subject_patterns: &'static [&'static str],
}

/// Ordered profile table; the first profile matching both sender and subject wins
pub static SOURCE_PROFILES: &[SourceProfile] = &[
    SourceProfile {
        name: "JetBlue",
        kind: SourceKind::Carrier,
        from_patterns: &[r"jetblue"],
        subject_patterns: &[r"confirmation", r"itinerary", r"check[- ]?in", r"cancel"],
    },
    SourceProfile {
        name: "Delta",
        kind: SourceKind::Carrier,
        from_patterns: &[r"delta"],
        subject_patterns: &[r"ereceipt", r"confirmation", r"itinerary", r"check[- ]?in", r"cancel"],
    },
    SourceProfile {
        name: "United",
        kind: SourceKind::Carrier,
        from_patterns: &[r"united"],
        subject_patterns: &[r"confirmation", r"itinerary", r"trip details", r"check[- ]?in", r"cancel"],
    },
    SourceProfile {
        name: "American Airlines",
        kind: SourceKind::Carrier,
        from_patterns: &[r"americanairlines", r"american airlines", r"@.*\baa\.com"],
        subject_patterns: &[r"reservation", r"confirmation", r"itinerary", r"check[- ]?in", r"cancel"],
    },
    SourceProfile {
        name: "Southwest",
        kind: SourceKind::Carrier,
        from_patterns: &[r"southwest"],
        subject_patterns: &[r"confirmation", r"itinerary", r"trip", r"flight", r"check[- ]?in"],
    },
    SourceProfile {
        name: "Alaska Airlines",
        kind: SourceKind::Carrier,
        from_patterns: &[r"alaskaair", r"alaska airlines"],
        subject_patterns: &[r"confirmation", r"itinerary", r"check[- ]?in"],
    },
    SourceProfile {
        name: "Spirit",
        kind: SourceKind::Carrier,
        from_patterns: &[r"spirit"],
        subject_patterns: &[r"confirmation", r"itinerary"],
    },
    SourceProfile {
        name: "Frontier",
        kind: SourceKind::Carrier,
        from_patterns: &[r"flyfrontier", r"frontier"],
        subject_patterns: &[r"confirmation", r"itinerary"],
    },
    SourceProfile {
        name: "Hawaiian Airlines",
        kind: SourceKind::Carrier,
        from_patterns: &[r"hawaiian"],
        subject_patterns: &[r"confirmation", r"itinerary"],
    },
    SourceProfile {
        name: "Air Canada",
        kind: SourceKind::Carrier,
        from_patterns: &[r"aircanada"],
        subject_patterns: &[r"confirmation", r"itinerary"],
    },
    SourceProfile {
        name: "British Airways",
        kind: SourceKind::Carrier,
        from_patterns: &[r"britishairways", r"@.*\bba\.com"],
        subject_patterns: &[r"confirmation", r"booking", r"itinerary"],
    },
    SourceProfile {
        name: "Lufthansa",
        kind: SourceKind::Carrier,
        from_patterns: &[r"lufthansa"],
        subject_patterns: &[r"confirmation", r"booking"],
    },
    SourceProfile {
        name: "Emirates",
        kind: SourceKind::Carrier,
        from_patterns: &[r"emirates"],
        subject_patterns: &[r"confirmation", r"booking", r"itinerary"],
    },
    SourceProfile {
        name: "International Airline",
        kind: SourceKind::AirlineGroup,
        from_patterns: &[
            r"airfrance|klm|qantas|singaporeair|cathay|jal\.com|ana\.co\.jp|koreanair|turkishairlines|qatarairways|etihad|virgin|icelandair|norwegian|ryanair|easyjet|westjet|avianca|latam|aeromexico|copaair",
        ],
        subject_patterns: &[r"confirmation", r"booking", r"itinerary", r"e-?ticket"],
    },
    SourceProfile {
        name: "Expedia",
        kind: SourceKind::BookingSite,
        from_patterns: &[r"expedia"],
        subject_patterns: &[r"confirmation", r"itinerary", r"trip", r"booking"],
    },
    SourceProfile {
        name: "Booking Site",
        kind: SourceKind::BookingSite,
        from_patterns: &[
            r"kayak|priceline|orbitz|travelocity|cheapoair|hopper|skyscanner|trip\.com|booking\.com",
        ],
        subject_patterns: &[r"confirmation", r"itinerary", r"trip", r"booking", r"flight"],
    },
    SourceProfile {
        name: "Google Travel",
        kind: SourceKind::BookingSite,
        from_patterns: &[r"google"],
        subject_patterns: &[r"flight.*confirmation", r"trip.*confirmation", r"itinerary"],
    },
    SourceProfile {
        name: "Corporate Travel",
        kind: SourceKind::TravelPortal,
        from_patterns: &[r"concur|egencia|tripactions|navan"],
        subject_patterns: &[r"confirmation", r"itinerary", r"trip", r"travel"],
    },
    SourceProfile {
        name: "Credit Card Travel",
        kind: SourceKind::TravelPortal,
        from_patterns: &[r"chase|americanexpress|capitalone|citi"],
        subject_patterns: &[
            r"flight.*confirmation",
            r"trip.*confirmation",
            r"travel.*confirmation",
            r"itinerary",
        ],
    },
    SourceProfile {
        name: "Generic Flight",
        kind: SourceKind::Generic,
        from_patterns: &[],
        subject_patterns: &[
            r"flight.*confirmation",
            r"booking.*confirmation.*flight",
            r"e-?ticket",
            r"itinerary.*flight",
            r"your.*flight",
            r"trip.*confirmation",
        ],
    },
];

/// Sender domains of airlines and booking sites (positive score signal)
pub static AIRLINE_SENDER_DOMAINS: &[&str] = &[
    "aa.com",
    "united.com",
    "delta.com",
    "southwest.com",
    "jetblue.com",
    "alaskaair.com",
    "flyfrontier.com",
    "spirit.com",
    "hawaiianairlines.com",
    "aircanada.com",
    "easyjet.com",
    "ryanair.com",
    "britishairways.com",
    "lufthansa.com",
    "airfrance.com",
    "klm.com",
    "emirates.com",
    "qatarairways.com",
    "chasetravel.com",
    "expedia.com",
    "kayak.com",
    "priceline.com",
];

/// Hotel and accommodation sender domains (negative score signal)
pub static HOTEL_DOMAINS: &[&str] = &[
    "airbnb.com",
    "vrbo.com",
    "booking.com",
    "hotels.com",
    "marriott.com",
    "hilton.com",
    "hyatt.com",
    "ihg.com",
    "wyndham.com",
    "choicehotels.com",
    "trivago.com",
    "hostelworld.com",
];

/// Airline name for a two-character carrier code
#[must_use]
pub fn carrier_name(code: &str) -> Option<&'static str> {
    CARRIER_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Carrier code for a standard airline name
#[must_use]
pub fn carrier_code(airline: &str) -> Option<&'static str> {
    CARRIER_CODES
        .iter()
        .find(|(_, name)| *name == airline)
        .map(|(code, _)| *code)
}

/// Check whether a two-character prefix is a known carrier
#[must_use]
pub fn is_carrier_code(code: &str) -> bool {
    carrier_name(code).is_some()
}

fn find_variation(haystack: &str) -> Option<&'static str> {
    let lower = haystack.to_lowercase();
    AIRLINE_NAME_VARIATIONS
        .iter()
        .find(|(variation, _)| lower.contains(variation))
        .map(|(_, name)| *name)
}

/// Resolve a standard airline name from the sender alone
#[must_use]
pub fn airline_from_sender(from: &str) -> Option<&'static str> {
    find_variation(from)
}

/// Resolve a standard airline name from the sender, then from body text
#[must_use]
pub fn airline_from_text(text: &str, from: &str) -> Option<&'static str> {
    airline_from_sender(from).or_else(|| find_variation(text))
}
