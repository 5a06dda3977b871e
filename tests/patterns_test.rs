use chrono::NaiveDate;
use flight_extract::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Airports ---

#[test]
fn test_airport_families() {
    let cases = [
        ("Boston (BOS) to Savannah (SAV)", vec!["BOS", "SAV"]),
        ("SEA → ORD nonstop", vec!["SEA", "ORD"]),
        ("SEA-LAX", vec!["SEA", "LAX"]),
        ("Departs: LAX Arrives: JFK", vec!["LAX", "JFK"]),
        ("THE (THE) AND → FOR", vec![]),
    ];

    for (text, expected) in cases {
        assert_eq!(extract_airports(text), expected, "Failed for {text:?}");
    }
}

#[test]
fn test_airports_capped_and_unique() {
    let airports = extract_airports("(BOS) (JFK) (BOS) (SEA) (ORD) (LAX)");
    assert_eq!(airports, vec!["BOS", "JFK", "SEA", "ORD"]);
}

// --- Flight numbers ---

#[test]
fn test_flight_numbers() {
    let cases = [
        ("Flight B6 0349 departs", vec!["B6349"]),
        ("DL2971 and UA 100", vec!["DL2971", "UA100"]),
        ("Flight 1234 BOS to JFK", vec!["1234"]),
        ("Flight 349 is B6 349", vec!["B6349"]),
        ("Cape Air 9K 1021", vec!["9K1021"]),
        ("departs 10:30 AM 2025", vec![]),
        ("Call ZZ 1234", vec![]),
    ];

    for (text, expected) in cases {
        assert_eq!(extract_flight_numbers(text), expected, "Failed for {text:?}");
    }
}

#[test]
fn test_normalize_flight_number() {
    assert_eq!(normalize_flight_number(Some("B6"), "0349"), "B6349");
    assert_eq!(normalize_flight_number(None, "0012"), "12");
    assert_eq!(normalize_flight_number(Some("AA"), "000"), "AA0");
}

#[test]
fn test_same_flight_number() {
    assert!(same_flight_number("B6349", "349"));
    assert!(same_flight_number("349", "B6349"));
    assert!(same_flight_number("B6349", "B6349"));
    assert!(!same_flight_number("B6349", "DL349"));
    assert!(!same_flight_number("1349", "349"));
}

// --- Dates ---

#[test]
fn test_year_qualified_before_defaulted() {
    let dates = extract_dates("Departing Mar 1, 2025 returning Mar 10", Some(2025));

    let displays: Vec<&str> = dates.iter().map(|d| d.display.as_str()).collect();
    assert_eq!(displays, vec!["Mar 1, 2025", "Mar 10, 2025"]);
    assert!(dates[0].year_qualified);
    assert!(!dates[1].year_qualified);
    assert_eq!(dates[1].date, date(2025, 3, 10));
}

#[test]
fn test_date_formats() {
    let cases = [
        ("on 2025-03-01", date(2025, 3, 1)),
        ("on Dec 12, 2025", date(2025, 12, 12)),
        ("on 12 December 2025", date(2025, 12, 12)),
        ("on 3/15/2025", date(2025, 3, 15)),
        ("on September 5th, 2025", date(2025, 9, 5)),
    ];

    for (text, expected) in cases {
        let dates = extract_dates(text, None);
        assert_eq!(dates.len(), 1, "Failed for {text:?}");
        assert_eq!(dates[0].date, expected, "Failed for {text:?}");
    }
}

#[test]
fn test_yearless_dates_need_received_year() {
    assert!(extract_dates("Wed, Nov 12", None).is_empty());

    let dates = extract_dates("Wed, Nov 12", Some(2025));
    assert_eq!(dates[0].display, "Nov 12, 2025");

    let dates = extract_dates("Departs 17APR", Some(2025));
    assert_eq!(dates[0].date, date(2025, 4, 17));
}

#[test]
fn test_lowercase_month_words_ignored() {
    assert!(extract_dates("you may 10 times", Some(2025)).is_empty());
}

#[test]
fn test_dates_capped() {
    let text = "Jan 1, 2025, Feb 2, 2025, Mar 3, 2025, Apr 4, 2025";
    assert_eq!(extract_dates(text, None).len(), 3);
}

// --- Times ---

#[test]
fn test_times() {
    assert_eq!(
        extract_times("Departs 6:00 PM, arrives 21:05"),
        vec!["6:00 PM", "21:05"]
    );
    assert_eq!(extract_times("boarding at 6:40pm"), vec!["6:40 PM"]);
    assert_eq!(extract_times("7:15 a.m."), vec!["7:15 AM"]);
}

// --- Confirmation codes ---

#[test]
fn test_is_valid_pnr() {
    let cases = [
        ("AB12CD", true),
        ("QWERTY", true),
        ("A1B2C3", true),
        ("FLIGHT", false),
        ("AAAAAA", false),
        ("123456", false),
        ("ABCDEF", false),
        ("abc123", false),
        ("ABC12", false),
    ];

    for (code, expected) in cases {
        assert_eq!(is_valid_pnr(code), expected, "Failed for {code}");
    }
}

#[test]
fn test_confirmation_sources() {
    let cases = [
        ("Your trip to Boston – DG7X2Q", "", Some("DG7X2Q")),
        ("Booking - AB12CD", "", Some("AB12CD")),
        ("Your trip", "Your confirmation code is AB12CD.", Some("AB12CD")),
        ("Your trip", "Record locator: XK4M9P", Some("XK4M9P")),
        ("Your trip", "Booking reference: ZZ7Y3W", Some("ZZ7Y3W")),
        ("Booking QX7P2M confirmed", "", Some("QX7P2M")),
        ("Your trip", "Record locator: FLIGHT", None),
        ("Hello", "Nothing here", None),
    ];

    for (subject, body, expected) in cases {
        assert_eq!(
            extract_confirmation(subject, body).as_deref(),
            expected,
            "Failed for {subject:?} / {body:?}"
        );
    }
}

// --- Itinerary rows ---

#[test]
fn test_itinerary_rows() {
    let text = "BOS SAV 2hr 22min Flight 349 Wed, Nov 12\nSAV BOS Flight 350 Sun, Nov 16";
    let segments = extract_itinerary_rows(text, Some(2025), Some("B6"));

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].origin.as_deref(), Some("BOS"));
    assert_eq!(segments[0].destination, "SAV");
    assert_eq!(segments[0].date, date(2025, 11, 12));
    assert_eq!(segments[0].flight_number.as_deref(), Some("B6349"));
    assert_eq!(segments[1].route(), Some(Route::new("SAV", "BOS")));
    assert_eq!(segments[1].flight_number.as_deref(), Some("B6350"));
}

#[test]
fn test_itinerary_rows_without_year_are_dropped() {
    let text = "BOS SAV Flight 349 Wed, Nov 12";
    assert!(extract_itinerary_rows(text, None, None).is_empty());

    let text = "BOS SAV Flight 349 Nov 12, 2025";
    let segments = extract_itinerary_rows(text, None, None);
    assert_eq!(segments[0].flight_number.as_deref(), Some("349"));
}
