use chrono::{NaiveDate, TimeZone, Utc};
use flight_extract::*;

fn flight(code: Option<&str>, date: Option<(i32, u32, u32)>, numbers: &[&str], hash: &str) -> Flight {
    let iso_date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
    Flight {
        confirmation: code.map(str::to_string),
        airline: Some("JetBlue".to_string()),
        from: "JetBlue <noreply@jetblue.com>".to_string(),
        subject: "Your trip".to_string(),
        email_date: None,
        content_hash: hash.to_string(),
        email_count: 1,
        flight_info: FlightSummary {
            route: Some(Route::new("BOS", "SAV")),
            airports: vec!["BOS".to_string(), "SAV".to_string()],
            dates: iso_date.map(format_display).into_iter().collect(),
            iso_date,
            flight_numbers: numbers.iter().map(|n| (*n).to_string()).collect(),
            segments: Vec::new(),
            email_type: EmailType::Booking,
        },
    }
}

#[test]
fn test_store_keys() {
    let dated = flight(Some("QX7P2M"), Some((2025, 11, 12)), &["B6349"], "h1");
    let undated = flight(Some("QX7P2M"), None, &[], "h1");
    let anonymous = flight(None, Some((2025, 11, 12)), &["B6349"], "abc");

    assert_eq!(dated.store_key(), "QX7P2M/2025-11-12");
    assert_eq!(undated.store_key(), "QX7P2M");
    assert_eq!(anonymous.store_key(), "unknown_abc");
}

#[test]
fn test_status_transitions() {
    let forwarded_at = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
    let original = flight(Some("QX7P2M"), Some((2025, 11, 12)), &["B6349"], "h1");
    let mut store = ProcessedStore::new();

    assert_eq!(store.status(&original), StoreStatus::New);
    assert!(store.status(&original).is_pending());

    store.record(&original, forwarded_at);
    assert_eq!(store.status(&original), StoreStatus::AlreadyImported);
    assert!(!store.status(&original).is_pending());

    // Same booking and date, new flight number, new message
    let changed = flight(Some("QX7P2M"), Some((2025, 11, 12)), &["B6351"], "h2");
    assert_eq!(store.status(&changed), StoreStatus::Changed);

    // Never recorded, but the message was forwarded under another key
    let resent = flight(Some("ZZ9Y8X"), Some((2025, 11, 12)), &["B6349"], "h1");
    assert_eq!(store.status(&resent), StoreStatus::DuplicateContent);
}

#[test]
fn test_entry_contents() {
    let forwarded_at = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
    let original = flight(Some("QX7P2M"), Some((2025, 11, 12)), &["B6349"], "h1");
    let mut store = ProcessedStore::new();
    store.record(&original, forwarded_at);

    let entry = store.entry(&original).unwrap();
    assert_eq!(entry.fingerprint, "BOS,SAV|Nov 12, 2025|B6349");
    assert_eq!(entry.dates, vec!["Nov 12, 2025"]);
    assert_eq!(entry.forwarded_at, forwarded_at);
    assert!(store.content_hashes.contains("h1"));
}

#[test]
fn test_json_persistence() {
    let forwarded_at = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
    let mut store = ProcessedStore::new();
    store.record(
        &flight(Some("QX7P2M"), Some((2025, 11, 12)), &["B6349"], "h1"),
        forwarded_at,
    );

    let json = store.to_json().unwrap();
    assert_eq!(ProcessedStore::from_json(&json).unwrap(), store);
    assert_eq!(ProcessedStore::load_or_default(&json), store);
}

#[test]
fn test_imported_at_alias() {
    let json = r#"{
        "confirmations": {
            "AB12CD": {
                "fingerprint": "BOS,JFK||",
                "imported_at": "2025-01-05T10:00:00Z"
            }
        }
    }"#;

    let store = ProcessedStore::from_json(json).unwrap();
    let entry = &store.confirmations["AB12CD"];
    assert_eq!(
        entry.forwarded_at,
        Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap()
    );
    assert!(entry.airports.is_empty());
    assert!(store.content_hashes.is_empty());
}

#[test]
fn test_strict_load_rejects_corrupt_input() {
    assert!(matches!(
        ProcessedStore::from_json("{ not json"),
        Err(Error::Store(_))
    ));
}

#[test]
fn test_lenient_load() {
    let cases = ["", "   ", "{ not json", "[1, 2, 3]", "{}"];
    for json in cases {
        assert!(
            ProcessedStore::load_or_default(json).is_empty(),
            "Failed for {json:?}"
        );
    }

    // A broken section is reset on its own
    let json = r#"{"confirmations": 42, "content_hashes": ["h1", "h2"]}"#;
    let store = ProcessedStore::load_or_default(json);
    assert!(store.confirmations.is_empty());
    assert_eq!(store.content_hashes.len(), 2);
}
