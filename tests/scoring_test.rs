use flight_extract::*;

#[test]
fn test_airline_booking_scores_high() {
    let score = score_email(
        "Your flight confirmation",
        "Boarding pass for B6 349 from BOS to SAV. Confirmation code AB12CD. Gate 12",
        "JetBlue <noreply@jetblue.com>",
    );

    assert_eq!(score.score, 130);
    assert_eq!(
        score.reasons,
        vec![
            "Airports: BOS, SAV",
            "Flight#: B6349",
            "PNR: AB12CD",
            "\"boarding pass\"",
            "\"flight confirmation\"",
            "\"confirmation code\"",
            "\"gate\"",
            "From: jetblue.com",
        ]
    );
    assert!(score.passes(DEFAULT_THRESHOLD));
}

#[test]
fn test_accommodation_scores_negative() {
    let score = score_email(
        "Your stay in Savannah",
        "Check-in time is 3 PM. Your host is Sam.",
        "Airbnb <automated@airbnb.com>",
    );

    assert!(score.score < 0, "score was {}", score.score);
    assert!(score.reasons.contains(&"HOTEL: airbnb.com".to_string()));
    assert!(score.reasons.contains(&"ACCOMMODATION".to_string()));
}

#[test]
fn test_threshold_boundary() {
    let (subject, body, from) = ("Itinerary", "BOS JFK gate", "x@example.com");

    assert_eq!(score_email(subject, body, from).score, 50);
    assert!(passes_score_threshold(subject, body, from, 50));
    assert!(!passes_score_threshold(subject, body, from, 51));
}

#[test]
fn test_single_airport() {
    let score = score_email("Trip", "Landing in SEA", "x@example.com");
    assert_eq!(score.score, 10);
    assert_eq!(score.reasons, vec!["Airport: SEA"]);
}

#[test]
fn test_spam_penalty_is_capped() {
    let score = score_email(
        "Deals",
        "Unsubscribe. Limited time special offer, book now before the sale ends.",
        "x@example.com",
    );

    assert_eq!(score.score, -45);
    assert_eq!(score.reasons.len(), 3);
    assert!(score.reasons.iter().all(|r| r.starts_with("SPAM: ")));
}

#[test]
fn test_survey_penalty() {
    let score = score_email("How was your flight?", "Tell us.", "survey@example.com");
    assert_eq!(score.score, -20);
    assert_eq!(score.reasons, vec!["SURVEY"]);
}

#[test]
fn test_empty_email_scores_zero() {
    let score = score_email("", "", "");
    assert_eq!(score, EmailScore::default());
    assert!(!score.passes(DEFAULT_THRESHOLD));
}
