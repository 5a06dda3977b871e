use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use flight_extract::*;

fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap())
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn segment(origin: &str, destination: &str, date: NaiveDate, number: &str) -> Segment {
    Segment {
        origin: Some(origin.to_string()),
        destination: destination.to_string(),
        date,
        flight_number: Some(number.to_string()),
    }
}

fn email(
    subject: &str,
    sent: Option<DateTime<Utc>>,
    email_type: EmailType,
    confirmation: Option<&str>,
    segments: Vec<Segment>,
) -> FlightEmail {
    let mut airports: Vec<String> = Vec::new();
    let mut numbers: Vec<String> = Vec::new();
    for s in &segments {
        for code in s.origin.iter().chain([&s.destination]) {
            if !airports.contains(code) {
                airports.push(code.clone());
            }
        }
        numbers.extend(s.flight_number.clone());
    }

    FlightEmail {
        from: "JetBlue <noreply@jetblue.com>".to_string(),
        subject: subject.to_string(),
        airline: Some("JetBlue".to_string()),
        email_date: sent,
        content_hash: format!("hash-{subject}"),
        info: FlightInfo {
            confirmation: confirmation.map(str::to_string),
            route: segments.first().and_then(Segment::route),
            dates: segments.iter().map(|s| format_display(s.date)).collect(),
            airports,
            flight_numbers: numbers,
            segments,
            email_type,
            ..FlightInfo::default()
        },
    }
}

fn round_trip() -> Vec<Segment> {
    vec![
        segment("BOS", "SAV", day(2025, 11, 12), "B6349"),
        segment("SAV", "BOS", day(2025, 11, 16), "B6350"),
    ]
}

#[test]
fn test_cancellation_drops_group_in_any_order() {
    let booking = email("Booking", at(2025, 10, 1), EmailType::Booking, Some("QX7P2M"), round_trip());
    let cancel = email("Cancelled", at(2025, 10, 5), EmailType::Cancellation, Some("QX7P2M"), Vec::new());
    let other = email(
        "Other",
        at(2025, 10, 2),
        EmailType::Booking,
        Some("AB12CD"),
        vec![segment("SEA", "ORD", day(2025, 12, 1), "AS20")],
    );

    for batch in [
        vec![booking.clone(), cancel.clone(), other.clone()],
        vec![cancel.clone(), other.clone(), booking.clone()],
    ] {
        let rows = reconcile(&batch);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].confirmation.as_deref(), Some("AB12CD"));
    }
}

#[test]
fn test_check_in_wins_its_date() {
    let booking = email("Booking", at(2025, 10, 1), EmailType::Booking, Some("QX7P2M"), round_trip());
    let check_in = email(
        "Check in",
        at(2025, 11, 11),
        EmailType::CheckIn,
        Some("QX7P2M"),
        vec![segment("BOS", "SAV", day(2025, 11, 12), "B6349")],
    );

    let rows = reconcile(&[booking, check_in]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].subject, "Check in");
    assert_eq!(rows[0].email_count, 2);
    assert_eq!(rows[0].flight_info.email_type, EmailType::CheckIn);
    assert_eq!(rows[0].flight_info.iso_date, Some(day(2025, 11, 12)));
    assert_eq!(rows[0].flight_info.flight_numbers, vec!["B6349"]);

    assert_eq!(rows[1].subject, "Booking");
    assert_eq!(rows[1].email_count, 1);
    assert_eq!(rows[1].flight_info.dates, vec!["Nov 16, 2025"]);
    assert_eq!(rows[1].flight_info.route, Some(Route::new("SAV", "BOS")));
}

#[test]
fn test_check_in_beats_newer_booking() {
    let leg = || vec![segment("BOS", "SAV", day(2025, 11, 12), "B6349")];
    let check_in = email("Check in", at(2025, 11, 10), EmailType::CheckIn, Some("QX7P2M"), leg());
    let update = email("Updated", at(2025, 11, 11), EmailType::Booking, Some("QX7P2M"), leg());

    let rows = reconcile(&[check_in, update]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "Check in");
}

#[test]
fn test_most_recent_email_breaks_ties() {
    let leg = || vec![segment("BOS", "SAV", day(2025, 11, 12), "B6349")];
    let older = email("Older", at(2025, 10, 1), EmailType::Booking, Some("QX7P2M"), leg());
    let newer = email("Newer", at(2025, 10, 9), EmailType::Booking, Some("QX7P2M"), leg());

    for batch in [vec![older.clone(), newer.clone()], vec![newer.clone(), older.clone()]] {
        let rows = reconcile(&batch);
        assert_eq!(rows[0].subject, "Newer");
        assert_eq!(rows[0].email_date, at(2025, 10, 9));
    }
}

#[test]
fn test_marketing_excluded() {
    let promo = email("Promo", at(2025, 10, 1), EmailType::Marketing, Some("QX7P2M"), round_trip());
    assert!(reconcile(&[promo]).is_empty());
}

#[test]
fn test_synthetic_grouping() {
    let leg = || vec![segment("SEA", "ORD", day(2025, 12, 1), "AS20")];
    let first = email("First", at(2025, 11, 1), EmailType::Booking, None, leg());
    let second = email("Second", at(2025, 11, 20), EmailType::Booking, None, leg());

    let rows = reconcile(&[first, second]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].confirmation, None);
    assert_eq!(rows[0].email_count, 2);
    assert_eq!(rows[0].subject, "Second");
}

#[test]
fn test_route_and_date_identity() {
    let mut e = email("Route only", at(2025, 11, 1), EmailType::Booking, None, Vec::new());
    e.info.route = Some(Route::new("BOS", "JFK"));
    e.info.airports = vec!["BOS".to_string(), "JFK".to_string()];
    e.info.dates = vec!["Dec 12, 2025".to_string()];

    let rows = reconcile(&[e]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].flight_info.iso_date, Some(day(2025, 12, 12)));
    assert_eq!(rows[0].flight_info.route, Some(Route::new("BOS", "JFK")));
}

#[test]
fn test_no_identity_dropped() {
    let mut e = email("Nothing", at(2025, 11, 1), EmailType::Booking, None, Vec::new());
    e.info.airports = vec!["BOS".to_string()];
    assert!(reconcile(&[e]).is_empty());
}

#[test]
fn test_ordering_with_undated_last() {
    let undated = email("Undated", at(2025, 9, 1), EmailType::Booking, Some("AAA111"), Vec::new());
    let late = email(
        "Late",
        at(2025, 9, 2),
        EmailType::Booking,
        Some("BBB222"),
        vec![segment("SEA", "ORD", day(2026, 1, 5), "AS20")],
    );
    let early = email(
        "Early",
        at(2025, 9, 3),
        EmailType::Booking,
        Some("CCC333"),
        vec![segment("ORD", "SEA", day(2025, 12, 1), "AS21")],
    );

    let rows = reconcile(&[undated, late, early]);
    let order: Vec<&str> = rows.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(order, vec!["Early", "Late", "Undated"]);
    assert_eq!(rows[2].flight_info.iso_date, None);
    assert_eq!(rows[2].store_key(), "AAA111");
}

#[test]
fn test_rescan_is_idempotent_with_store() {
    let batch = vec![email("Booking", at(2025, 10, 1), EmailType::Booking, Some("QX7P2M"), round_trip())];
    let forwarded_at = Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).unwrap();

    let mut store = ProcessedStore::new();
    let rows = reconcile(&batch);
    assert!(rows.iter().all(|row| store.status(row) == StoreStatus::New));
    for row in &rows {
        store.record(row, forwarded_at);
    }

    let again = reconcile(&batch);
    assert_eq!(again.len(), 2);
    for row in &again {
        assert_eq!(store.status(row), StoreStatus::AlreadyImported);
    }
}
