mod common;

use std::time::Duration;

use common::{fill_parent_step, setup_test_env};
use flowmatch::{
    cli::render::{calendar_grid, confirmation_text},
    domain::FlowKind,
    errors::{BookingError, SessionError},
    messages,
    presenter::DEFAULT_PHONE,
};
use insta::assert_snapshot;

fn reveal_results(session: &mut flowmatch::app::Session) {
    for step in 1..=3 {
        fill_parent_step(session, step);
        session.next(FlowKind::Parent).unwrap();
    }
    fill_parent_step(session, 4);
    session.submit(FlowKind::Parent).unwrap();
    session.advance(Duration::from_millis(300));
    assert!(session.results().is_revealed());
}

#[test]
fn calendar_lists_weekdays_and_hours() {
    let (mut session, _, _) = setup_test_env();
    let calendar = session.open_booking("יעל כהן").unwrap();
    assert_snapshot!(calendar_grid(calendar), @r"
    Calendar: יעל כהן
    ראשון: 09:00 ✓ 10:00 ✓ 11:00 ✓ 14:00 ✓ 15:00 ✓ 16:00 ✓
    שני: 09:00 ✓ 10:00 ✓ 11:00 ✓ 14:00 ✓ 15:00 ✓ 16:00 ✓
    שלישי: 09:00 ✓ 10:00 ✓ 11:00 ✓ 14:00 ✓ 15:00 ✓ 16:00 ✓
    רביעי: 09:00 ✓ 10:00 ✓ 11:00 ✓ 14:00 ✓ 15:00 ✓ 16:00 ✓
    חמישי: 09:00 ✓ 10:00 ✓ 11:00 ✓ 14:00 ✓ 15:00 ✓ 16:00 ✓
    ");
}

#[test]
fn booking_a_known_therapist_from_results() {
    let (mut session, _, _) = setup_test_env();
    reveal_results(&mut session);

    let therapist = session.results().card("match-1").unwrap().name.clone();
    session.open_booking(&therapist).unwrap();
    session.select_slot("שלישי", "11:00").unwrap();
    let confirmation = session.confirm_booking().unwrap();
    assert_snapshot!(confirmation_text(&confirmation), @r#"
    מטפל/ת: ד"ר מיכל לוי
    יום: שלישי
    שעה: 11:00
    טלפון: 050-1234567
    "#);

    assert_eq!(
        session.toasts().last().map(|toast| toast.message.clone()),
        Some(messages::booking_requested(&therapist))
    );
    session.advance(Duration::from_millis(2000));
    assert!(session
        .toasts()
        .iter()
        .any(|toast| toast.message == messages::BOOKING_EMAIL_SENT));
}

#[test]
fn unknown_therapist_books_with_default_phone() {
    let (mut session, _, _) = setup_test_env();
    session.open_booking("X").unwrap();
    session.select_slot("חמישי", "16:00").unwrap();
    let confirmation = session.confirm_booking().unwrap();
    assert_eq!(confirmation.phone, DEFAULT_PHONE);
    assert_eq!(confirmation.booking.therapist, "X");
}

#[test]
fn blank_therapist_cannot_open_a_calendar() {
    let (mut session, _, _) = setup_test_env();
    assert!(matches!(
        session.open_booking("  "),
        Err(SessionError::Booking(BookingError::UnknownTherapist(_)))
    ));
    assert!(session.booking().calendar().is_none());
}

#[test]
fn saved_matches_persist_with_the_session() {
    let (mut session, _, base) = setup_test_env();
    reveal_results(&mut session);
    assert!(session.toggle_saved_match("match-2").unwrap());
    assert!(session.toggle_details("match-2").unwrap());
    session.not_relevant("match-3").unwrap();
    assert_eq!(
        session.toasts().last().map(|toast| toast.message.as_str()),
        Some(messages::NOT_RELEVANT_FEEDBACK)
    );

    let reopened = common::open_session(&base);
    assert_eq!(reopened.state().saved_matches, vec!["match-2".to_string()]);
}
