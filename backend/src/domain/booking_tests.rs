//! Tests for stay ranges and booking outcomes.

use super::*;
use rstest::rstest;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

fn stay(a: u32, b: u32) -> StayDates {
    StayDates::new(day(a), day(b)).expect("valid stay")
}

fn booking(id: i32, check_in: u32, check_out: u32, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::new(id),
        customer_id: CustomerId::new(1),
        hotel_id: HotelId::new(1),
        room_id: RoomId::new(101),
        booking_date: day(1),
        check_in: day(check_in),
        check_out: day(check_out),
        status,
    }
}

#[rstest]
#[case(stay(3, 5), stay(4, 6), true)]
#[case(stay(3, 5), stay(1, 4), true)]
#[case(stay(3, 5), stay(3, 5), true)]
#[case(stay(3, 9), stay(4, 5), true)]
#[case(stay(3, 5), stay(5, 7), false)]
#[case(stay(3, 5), stay(1, 3), false)]
fn overlap_is_half_open(#[case] a: StayDates, #[case] b: StayDates, #[case] expected: bool) {
    assert_eq!(a.overlaps(b), expected);
    assert_eq!(b.overlaps(a), expected);
}

#[rstest]
#[case(5, 5)]
#[case(6, 5)]
fn check_out_must_follow_check_in(#[case] check_in: u32, #[case] check_out: u32) {
    let err = StayDates::new(day(check_in), day(check_out)).expect_err("inverted range");
    assert_eq!(err.message(), "Check-out must be after check-in");
}

#[rstest]
fn same_day_and_next_day_cancellation() {
    let today = day(10);
    assert!(!booking(1, 10, 12, BookingStatus::Pending).can_cancel(today));
    assert!(booking(2, 11, 12, BookingStatus::Pending).can_cancel(today));
}

#[rstest]
#[case(BookingStatus::Pending, 12, true)]
#[case(BookingStatus::Confirmed, 10, true)]
#[case(BookingStatus::Cancelled, 12, false)]
#[case(BookingStatus::Pending, 9, false)]
fn active_bookings(#[case] status: BookingStatus, #[case] check_out: u32, #[case] active: bool) {
    assert_eq!(booking(1, 8, check_out, status).is_active(day(10)), active);
}

#[rstest]
#[case("ERROR: Room has unresolved problems", StayRejection::UnresolvedProblem)]
#[case("customer has 5 or more active bookings", StayRejection::ActiveLimit)]
#[case("booking overlaps an existing reservation", StayRejection::Overlap)]
fn classifies_store_messages(#[case] text: &str, #[case] expected: StayRejection) {
    assert_eq!(StayRejection::classify(text), expected);
}

#[rstest]
fn unknown_store_messages_are_preserved() {
    let rejection = StayRejection::classify("deadlock detected");
    assert_eq!(rejection.message(), "Booking failed: deadlock detected");
}

#[rstest]
fn concurrent_write_losers_get_the_generic_failure() {
    let rejection = StayRejection::concurrent_write();
    assert!(matches!(rejection, StayRejection::Other(_)));
    assert_eq!(
        rejection.message(),
        format!("Booking failed: {CONCURRENT_WRITE_DETAIL}")
    );
    assert_ne!(rejection.message(), StayRejection::Overlap.message());
}

#[rstest]
fn rejection_messages() {
    assert_eq!(
        StayRejection::UnresolvedProblem.message(),
        "Cannot book this room because it has unresolved issues."
    );
    assert_eq!(
        StayRejection::ActiveLimit.message(),
        "You already have 5 or more active bookings."
    );
}

#[rstest]
fn history_lists_cancelled_last() {
    let entry = |b: Booking| CustomerBooking {
        booking: b,
        hotel_name: "Harbour Inn".to_owned(),
        hotel_address: "1 Bay St".to_owned(),
        cancellable: true,
    };
    let mut rows = vec![
        entry(booking(1, 3, 4, BookingStatus::Cancelled)),
        entry(booking(2, 20, 21, BookingStatus::Pending)),
        entry(booking(3, 15, 16, BookingStatus::Confirmed)),
    ];
    sort_customer_history(&mut rows);
    let ids: Vec<i32> = rows.iter().map(|r| r.booking.id.get()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
