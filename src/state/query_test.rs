use super::*;

// =============================================================
// AvailabilityQuery validation
// =============================================================

#[test]
fn valid_query_passes() {
    assert!(AvailabilityQuery::new(1, "2024-06-01", "20:00", 4).validate().is_ok());
}

#[test]
fn new_trims_whitespace() {
    let q = AvailabilityQuery::new(1, " 2024-06-01 ", "20:00\n", 2);
    assert_eq!(q.date, "2024-06-01");
    assert_eq!(q.time, "20:00");
}

#[test]
fn missing_date_is_validation_error() {
    let err = AvailabilityQuery::new(1, "", "20:00", 4).validate().unwrap_err();
    assert_eq!(err, BookingError::Validation("date is required".into()));
}

#[test]
fn missing_time_is_validation_error() {
    let err = AvailabilityQuery::new(1, "2024-06-01", "", 4).validate().unwrap_err();
    assert_eq!(err, BookingError::Validation("time is required".into()));
}

#[test]
fn malformed_values_are_rejected() {
    assert!(AvailabilityQuery::new(1, "2024-13-01", "20:00", 4).validate().is_err());
    assert!(AvailabilityQuery::new(1, "01/06/2024", "20:00", 4).validate().is_err());
    assert!(AvailabilityQuery::new(1, "2024-06-01", "25:00", 4).validate().is_err());
    assert!(AvailabilityQuery::new(1, "2024-06-01", "8pm", 4).validate().is_err());
}

#[test]
fn zero_guests_is_rejected() {
    let err = AvailabilityQuery::new(1, "2024-06-01", "20:00", 0).validate().unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}

// =============================================================
// QuerySequencer
// =============================================================

#[test]
fn tickets_increase_monotonically() {
    let mut seq = QuerySequencer::default();
    let a = seq.issue();
    let b = seq.issue();
    let c = seq.issue();
    assert!(a < b && b < c);
    assert_eq!(seq.current(), c);
}

#[test]
fn only_latest_ticket_is_current() {
    let mut seq = QuerySequencer::default();
    let first = seq.issue();
    assert!(seq.is_current(first));
    let second = seq.issue();
    assert!(!seq.is_current(first));
    assert!(seq.is_current(second));
}

#[test]
fn late_response_for_older_ticket_is_stale() {
    let mut seq = QuerySequencer::default();
    let t1 = seq.issue();
    let t2 = seq.issue();
    // t2 resolves first, then t1 arrives late.
    assert!(seq.check(t2).is_ok());
    assert_eq!(seq.check(t1), Err(BookingError::StaleResponse { ticket: t1, current: t2 }));
}

#[test]
fn ticket_display() {
    assert_eq!(QueryTicket(12).to_string(), "#12");
}
