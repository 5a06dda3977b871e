use chrono::{DateTime, TimeZone, Utc};
use flight_extract::*;

fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap())
}

fn booking() -> EmailRecord {
    EmailRecord::new(
        "JetBlue Airways <reservations@jetblue.com>",
        "Your JetBlue booking confirmation - QX7P2M",
        at(2025, 10, 1),
        "Thanks for booking!\nBOS SAV Flight 349 Wed, Nov 12\nSAV BOS Flight 350 Sun, Nov 16",
        None,
    )
}

fn check_in() -> EmailRecord {
    EmailRecord::new(
        "JetBlue <checkin@jetblue.com>",
        "Check in for your flight to Savannah",
        at(2025, 11, 11),
        "Confirmation code: QX7P2M\nFlight B6 0349 BOS (BOS) to SAV (SAV) Wed, Nov 12 6:00 AM",
        None,
    )
}

fn marketing() -> EmailRecord {
    EmailRecord::new(
        "JetBlue <news@jetblue.com>",
        "Earn bonus points on your next flight",
        at(2025, 10, 3),
        "Fly more, earn more.",
        None,
    )
}

fn personal() -> EmailRecord {
    EmailRecord::new(
        "friend@example.com",
        "Dinner Saturday?",
        at(2025, 10, 4),
        "Are you free?",
        None,
    )
}

fn batch() -> Vec<EmailRecord> {
    vec![booking(), check_in(), marketing(), personal(), booking()]
}

#[test]
fn test_scan_stats() {
    let report = Engine::default().scan(&batch(), &ProcessedStore::new());

    assert_eq!(
        report.stats,
        ScanStats {
            examined: 5,
            duplicate_messages: 1,
            not_flight: 1,
            below_threshold: 0,
            marketing: 1,
            no_identity: 0,
            extracted: 2,
            reconciled: 2,
        }
    );
}

#[test]
fn test_scan_rows() {
    let report = Engine::default().scan(&batch(), &ProcessedStore::new());

    assert_eq!(report.to_forward.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(report.new_flights().count(), 2);

    let outbound = &report.to_forward[0].flight;
    assert_eq!(outbound.confirmation.as_deref(), Some("QX7P2M"));
    assert_eq!(outbound.airline.as_deref(), Some("JetBlue"));
    assert_eq!(outbound.subject, "Check in for your flight to Savannah");
    assert_eq!(outbound.email_count, 2);
    assert_eq!(outbound.flight_info.email_type, EmailType::CheckIn);
    assert_eq!(outbound.flight_info.dates, vec!["Nov 12, 2025"]);
    assert_eq!(outbound.flight_info.flight_numbers, vec!["B6349"]);
    assert_eq!(outbound.flight_info.route, Some(Route::new("BOS", "SAV")));

    let inbound = &report.to_forward[1].flight;
    assert_eq!(inbound.subject, "Your JetBlue booking confirmation - QX7P2M");
    assert_eq!(inbound.flight_info.email_type, EmailType::Booking);
    assert_eq!(inbound.flight_info.dates, vec!["Nov 16, 2025"]);
    assert_eq!(inbound.flight_info.flight_numbers, vec!["B6350"]);
    assert_eq!(inbound.flight_info.route, Some(Route::new("SAV", "BOS")));
}

#[test]
fn test_rescan_skips_recorded_flights() {
    let engine = Engine::default();
    let mut store = ProcessedStore::new();
    let forwarded_at = Utc.with_ymd_and_hms(2025, 11, 11, 16, 0, 0).unwrap();

    for scanned in &engine.scan(&batch(), &store).to_forward {
        store.record(&scanned.flight, forwarded_at);
    }

    let report = engine.scan(&batch(), &store);
    assert!(report.to_forward.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(
        report
            .skipped
            .iter()
            .all(|s| s.status == StoreStatus::AlreadyImported)
    );
}

#[test]
fn test_schedule_change_is_forwarded() {
    let engine = Engine::default();
    let mut store = ProcessedStore::new();
    let forwarded_at = Utc.with_ymd_and_hms(2025, 10, 1, 16, 0, 0).unwrap();

    for scanned in &engine.scan(&[booking()], &store).to_forward {
        store.record(&scanned.flight, forwarded_at);
    }

    let update = EmailRecord::new(
        "JetBlue <reservations@jetblue.com>",
        "Your updated itinerary - QX7P2M",
        at(2025, 10, 20),
        "BOS SAV Flight 351 Wed, Nov 12\nSAV BOS Flight 350 Sun, Nov 16",
        None,
    );
    let report = engine.scan(&[update], &store);

    let changed: Vec<&Flight> = report.changed_flights().collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].flight_info.flight_numbers, vec!["B6351"]);
    assert_eq!(report.new_flights().count(), 0);
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_cancellation_removes_booking() {
    let cancel = EmailRecord::new(
        "JetBlue <reservations@jetblue.com>",
        "Your flight has been cancelled - QX7P2M",
        at(2025, 11, 1),
        "We're sorry.",
        None,
    );

    let report = Engine::default().scan(&[booking(), check_in(), cancel], &ProcessedStore::new());

    assert_eq!(report.stats.extracted, 3);
    assert_eq!(report.stats.reconciled, 0);
    assert!(report.to_forward.is_empty());
}

#[test]
fn test_scoring_gate() {
    let weak = EmailRecord::new(
        "friend@example.com",
        "Your flight details",
        at(2025, 10, 5),
        "See you soon",
        None,
    );
    let emails = vec![booking(), weak];

    let gated = Engine::with_config(EngineConfig::default().with_scoring(50));
    let report = gated.scan(&emails, &ProcessedStore::new());
    assert_eq!(report.stats.below_threshold, 1);
    assert_eq!(report.stats.extracted, 1);

    let report = Engine::default().scan(&emails, &ProcessedStore::new());
    assert_eq!(report.stats.below_threshold, 0);
    assert_eq!(report.stats.no_identity, 1);
}

#[test]
fn test_score_recorded_on_extraction() {
    let gated = Engine::with_config(EngineConfig::default().with_scoring(50));
    let flight_email = gated.extract_email(&booking()).unwrap();
    assert_eq!(flight_email.info.score, Some(65));

    let plain = Engine::default().extract_email(&booking()).unwrap();
    assert_eq!(plain.info.score, None);
    assert_eq!(plain.airline.as_deref(), Some("JetBlue"));
}

#[test]
fn test_unmatched_sender_needs_source_match_off() {
    let forwarded = EmailRecord::new(
        "friend@example.com",
        "Dinner plans",
        at(2025, 11, 1),
        "Confirmation code: AB12CD Flight 1234 BOS (BOS) to JFK (JFK) Dec 12, 2025",
        None,
    );

    let report = Engine::default().scan(std::slice::from_ref(&forwarded), &ProcessedStore::new());
    assert_eq!(report.stats.not_flight, 1);

    let config = EngineConfig {
        require_source_match: false,
        ..EngineConfig::default()
    };
    let report = Engine::with_config(config).scan(&[forwarded], &ProcessedStore::new());
    assert_eq!(report.to_forward.len(), 1);

    let flight = &report.to_forward[0].flight;
    assert_eq!(flight.confirmation.as_deref(), Some("AB12CD"));
    assert_eq!(flight.airline, None);
    assert_eq!(flight.store_key(), "AB12CD/2025-12-12");
}

#[test]
fn test_config_from_json() {
    let config = EngineConfig::from_json(r#"{"scoring": {"enabled": true}}"#).unwrap();
    assert!(config.scoring.enabled);
    assert_eq!(config.scoring.threshold, DEFAULT_THRESHOLD);
    assert_eq!(config.scoring.body_chars, 5000);
    assert!(config.require_source_match);

    assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    assert!(matches!(
        EngineConfig::from_json(r#"{"scoring": {"threshold": "high"}}"#),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_group_by_year_month() {
    let report = Engine::default().scan(&batch(), &ProcessedStore::new());
    let mut flights: Vec<Flight> = report.to_forward.into_iter().map(|s| s.flight).collect();

    let mut undated = flights[0].clone();
    undated.flight_info.iso_date = None;
    flights.push(undated);

    let groups = group_by_year_month(&flights);
    let keys: Vec<MonthKey> = groups.keys().copied().collect();
    assert_eq!(
        keys,
        vec![MonthKey::Month { year: 2025, month: 11 }, MonthKey::Undated]
    );
    assert_eq!(groups[&keys[0]].len(), 2);
    assert_eq!(keys[0].label(), "November 2025");
    assert_eq!(keys[1].label(), "Undated");
}

#[test]
fn test_check_in_replaces_booked_leg() {
    let booked = EmailRecord::new(
        "Alaska Airlines <info@alaskaair.com>",
        "Your confirmation - AB12CD",
        at(2025, 2, 1),
        "Seattle (SEA) to Chicago (ORD)\nDeparting Mar 1, 2025\nReturning Mar 10, 2025",
        None,
    );
    let checked_in = EmailRecord::new(
        "Alaska Airlines <checkin@alaskaair.com>",
        "Check in now for your flight",
        at(2025, 2, 28),
        "Confirmation code: AB12CD\nSeattle (SEA) to Chicago (ORD) Mar 1, 2025",
        None,
    );

    let report = Engine::default().scan(&[booked, checked_in], &ProcessedStore::new());
    let rows: Vec<(&str, &str)> = report
        .to_forward
        .iter()
        .map(|s| (s.flight.flight_info.dates[0].as_str(), s.flight.subject.as_str()))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Mar 1, 2025", "Check in now for your flight"),
            ("Mar 10, 2025", "Your confirmation - AB12CD"),
        ]
    );
    assert_eq!(
        report.to_forward[1].flight.flight_info.route,
        Some(Route::new("ORD", "SEA"))
    );
}

#[test]
fn test_refund_policy_keeps_booking() {
    let with_policy = EmailRecord::new(
        "JetBlue Airways <reservations@jetblue.com>",
        "Your JetBlue booking confirmation - QX7P2M",
        at(2025, 10, 1),
        "BOS SAV Flight 349 Wed, Nov 12\nSAV BOS Flight 350 Sun, Nov 16\n\
         If your flight is cancelled or significantly delayed, you may be entitled to a refund.",
        None,
    );

    let report = Engine::default().scan(&[with_policy], &ProcessedStore::new());

    assert_eq!(report.stats.reconciled, 2);
    assert!(
        report
            .to_forward
            .iter()
            .all(|s| s.flight.flight_info.email_type == EmailType::Booking)
    );
}

#[test]
fn test_booking_date_is_not_a_flight() {
    let dated = EmailRecord::new(
        "JetBlue Airways <reservations@jetblue.com>",
        "Your JetBlue booking confirmation - QX7P2M",
        at(2025, 10, 1),
        "Booked on Oct 1, 2025\nBOS SAV Flight 349 Wed, Nov 12, 2025\nSAV BOS Flight 350 Sun, Nov 16, 2025",
        None,
    );

    let report = Engine::default().scan(&[dated], &ProcessedStore::new());
    let rows: Vec<(&str, &str)> = report
        .to_forward
        .iter()
        .map(|s| {
            let info = &s.flight.flight_info;
            (info.dates[0].as_str(), info.flight_numbers[0].as_str())
        })
        .collect();

    assert_eq!(
        rows,
        vec![("Nov 12, 2025", "B6349"), ("Nov 16, 2025", "B6350")]
    );
}
