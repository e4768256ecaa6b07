//! Tests for the customer portal service.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BookingRepositoryError, MockBookingRepository, MockHotelRepository, MockRentalRepository,
    MockRoomRepository,
};
use crate::domain::{
    Booking, CustomerId, CustomerPrincipal, EmployeeId, ErrorCode, HotelCategory, HotelChainId,
    Position, RoomCapacity, SearchFilters, StaffPrincipal, ViewType,
};
use crate::test_support::FixedClock;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

#[fixture]
fn ann() -> Principal {
    Principal::Customer(CustomerPrincipal {
        id: CustomerId::new(12),
        name: "Ann Lee".to_owned(),
    })
}

struct Mocks {
    rooms: MockRoomRepository,
    bookings: MockBookingRepository,
    rentals: MockRentalRepository,
    hotels: MockHotelRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            rooms: MockRoomRepository::new(),
            bookings: MockBookingRepository::new(),
            rentals: MockRentalRepository::new(),
            hotels: MockHotelRepository::new(),
        }
    }

    fn build(self) -> CustomerPortalService {
        CustomerPortalService::new(
            Arc::new(self.rooms),
            Arc::new(self.bookings),
            Arc::new(self.rentals),
            Arc::new(self.hotels),
            Arc::new(FixedClock::on(day(10))),
        )
    }
}

fn booking(id: i32, check_in: u32, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::new(id),
        customer_id: CustomerId::new(12),
        hotel_id: HotelId::new(1),
        room_id: RoomId::new(101),
        booking_date: day(1),
        check_in: day(check_in),
        check_out: day(check_in + 2),
        status,
    }
}

fn request() -> BookingRequest {
    BookingRequest {
        room_id: RoomId::new(101),
        hotel_id: HotelId::new(1),
        stay: StayDates::new(day(20), day(22)).expect("valid stay"),
    }
}

fn harbour_inn() -> Hotel {
    Hotel {
        id: HotelId::new(1),
        name: "Harbour Inn".to_owned(),
        address: "1 Bay St, Toronto, ON".to_owned(),
        chain_id: HotelChainId::new(1),
        chain_name: "Atlas".to_owned(),
        category: HotelCategory::Luxury,
        num_rooms: 20,
        rating: 4,
    }
}

#[rstest]
#[tokio::test]
async fn booking_is_pending_and_dated_today(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_create()
        .withf(|new, today| new.booking_date == day(10) && *today == day(10))
        .times(1)
        .returning(|new, _| {
            Ok(BookingOutcome::Booked(Booking {
                id: BookingId::new(5),
                customer_id: new.customer_id,
                hotel_id: new.hotel_id,
                room_id: new.room_id,
                booking_date: new.booking_date,
                check_in: new.stay.check_in(),
                check_out: new.stay.check_out(),
                status: BookingStatus::Pending,
            }))
        });
    mocks
        .hotels
        .expect_find_by_id()
        .returning(|_| Ok(Some(harbour_inn())));
    let confirmation = mocks.build().book(&ann, &request()).await.expect("booked");
    assert_eq!(confirmation.hotel_name, "Harbour Inn");
    assert_eq!(confirmation.booking.status, BookingStatus::Pending);
    assert_eq!(confirmation.booking.customer_id, CustomerId::new(12));
}

#[rstest]
#[tokio::test]
async fn unknown_hotel_name_falls_back(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_create()
        .returning(|_, _| Ok(BookingOutcome::Booked(booking(5, 20, BookingStatus::Pending))));
    mocks.hotels.expect_find_by_id().returning(|_| Ok(None));
    let confirmation = mocks.build().book(&ann, &request()).await.expect("booked");
    assert_eq!(confirmation.hotel_name, "Unknown Hotel");
}

#[rstest]
#[case(StayRejection::UnresolvedProblem, "Cannot book this room because it has unresolved issues.")]
#[case(StayRejection::ActiveLimit, "You already have 5 or more active bookings.")]
#[case(StayRejection::Overlap, "This room is no longer available for the selected dates.")]
#[tokio::test]
async fn guard_rejections_become_conflicts(
    ann: Principal,
    #[case] rejection: StayRejection,
    #[case] message: &str,
) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_create()
        .return_once(move |_, _| Ok(BookingOutcome::Rejected(rejection)));
    let err = mocks.build().book(&ann, &request()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn store_errors_are_classified_by_text(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks.bookings.expect_create().returning(|_, _| {
        Err(BookingRepositoryError::query(
            "P0001: Room has unresolved problems",
        ))
    });
    let err = mocks.build().book(&ann, &request()).await.expect_err("rejected");
    assert_eq!(
        err.message(),
        "Cannot book this room because it has unresolved issues."
    );
}

#[rstest]
#[tokio::test]
async fn unclassified_store_errors_stay_internal(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_create()
        .returning(|_, _| Err(BookingRepositoryError::query("syntax error")));
    let err = mocks.build().book(&ann, &request()).await.expect_err("failed");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn staff_cannot_book() {
    let staff = Principal::Employee(StaffPrincipal {
        id: EmployeeId::new(1),
        name: "Ada".to_owned(),
        position: Position::Admin,
        hotel_id: None,
    });
    let err = Mocks::new()
        .build()
        .book(&staff, &request())
        .await
        .expect_err("not a customer");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn same_day_cancellation_is_refused(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .returning(|_| Ok(Some(booking(3, 10, BookingStatus::Pending))));
    mocks.bookings.expect_cancel().times(0);
    let err = mocks
        .build()
        .cancel(&ann, BookingId::new(3))
        .await
        .expect_err("same day");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("cannot cancel"));
}

#[rstest]
#[tokio::test]
async fn next_day_cancellation_succeeds(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .returning(|_| Ok(Some(booking(3, 11, BookingStatus::Pending))));
    mocks
        .bookings
        .expect_cancel()
        .withf(|id| *id == BookingId::new(3))
        .times(1)
        .returning(|_| Ok(true));
    mocks
        .build()
        .cancel(&ann, BookingId::new(3))
        .await
        .expect("cancelled");
}

#[rstest]
#[tokio::test]
async fn other_customers_bookings_read_as_missing(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks.bookings.expect_find_by_id().returning(|_| {
        let mut other = booking(3, 20, BookingStatus::Pending);
        other.customer_id = CustomerId::new(99);
        Ok(Some(other))
    });
    let err = mocks
        .build()
        .cancel(&ann, BookingId::new(3))
        .await
        .expect_err("not owner");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

fn available(room: i32, price: f64) -> AvailableRoom {
    AvailableRoom {
        room_id: RoomId::new(room),
        hotel_id: HotelId::new(1),
        hotel_name: "Harbour Inn".to_owned(),
        hotel_address: "1 Bay St, Toronto".to_owned(),
        chain_name: "Atlas".to_owned(),
        rating: 4,
        category: HotelCategory::Luxury,
        capacity: RoomCapacity::Double,
        view_type: ViewType::Sea,
        extendable: false,
        price,
        amenities: Vec::new(),
        open_problem: None,
    }
}

#[rstest]
#[tokio::test]
async fn search_results_are_sorted(ann: Principal) {
    let mut mocks = Mocks::new();
    mocks
        .rooms
        .expect_search_available()
        .returning(|_| Ok(vec![available(1, 300.0), available(2, 100.0), available(3, 200.0)]));
    let criteria = SearchCriteria {
        stay: StayDates::new(day(20), day(22)).expect("valid stay"),
        filters: SearchFilters::default(),
    };
    let rows = mocks
        .build()
        .search(&ann, &criteria, SearchSort::PriceDesc)
        .await
        .expect("search");
    let ids: Vec<i32> = rows.iter().map(|r| r.room_id.get()).collect();
    assert_eq!(ids, vec![1, 3, 2]);
}
