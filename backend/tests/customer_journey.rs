//! End-to-end customer flows over the page routes: registration, login,
//! search, booking and the booking history.

#[path = "support/browser.rs"]
mod browser;

use std::sync::Arc;

use actix_web::http::StatusCode;
use chrono::NaiveDate;
use rstest::{fixture, rstest};
use serde_json::Value;

use ehotels::domain::{
    BookingStatus, HotelCategory, HotelId, Room, RoomCapacity, RoomId, RoomStatus, StayDates,
    ViewType,
};
use ehotels::test_support::MemoryStore;

use browser::{flash_messages, location, open};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

fn room(id: i32, hotel_id: HotelId) -> Room {
    Room {
        id: RoomId::new(id),
        hotel_id,
        capacity: RoomCapacity::Double,
        view_type: ViewType::Sea,
        extendable: false,
        price: 150.0,
        status: RoomStatus::Available,
    }
}

struct Hotel {
    store: Arc<MemoryStore>,
    hotel_id: HotelId,
}

#[fixture]
fn hotel() -> Hotel {
    let store = Arc::new(MemoryStore::new());
    let chain = store.add_chain("Harbour Group");
    let hotel_id = store.add_hotel(
        chain,
        "Harbour Lights",
        "3 Pier Lane, Halifax",
        HotelCategory::Resort,
        4,
    );
    store.add_room(room(301, hotel_id));
    Hotel { store, hotel_id }
}

fn customer_id_from(page: &Value) -> String {
    flash_messages(page)
        .iter()
        .find_map(|message| {
            message
                .split("Your customer ID is ")
                .nth(1)
                .and_then(|rest| rest.split(';').next())
                .map(str::to_owned)
        })
        .expect("registration flash carries the customer id")
}

#[rstest]
#[actix_web::test]
async fn registered_customer_books_a_room(hotel: Hotel) {
    let mut client = open(hotel.store.clone(), day(1)).await;

    let next = client
        .submit(
            "/auth/register",
            &[
                ("full_name", "Bea Park"),
                ("address", "4 Birch Road, Halifax"),
                ("id_type", "Passport"),
                ("id_number", "X998877"),
            ],
        )
        .await;
    assert_eq!(next, "/auth/login");
    let login_page = client.page("/auth/login").await;
    let customer_id = customer_id_from(&login_page);

    let landing = client
        .login(&[
            ("user_type", "customer"),
            ("full_name", "Bea Park"),
            ("user_id", customer_id.as_str()),
            ("password", "customer"),
        ])
        .await;
    assert_eq!(landing, "/customer/bookings");

    let search = client
        .page("/customer/search?checkin=2025-06-10&checkout=2025-06-12&area=Halifax")
        .await;
    let rooms = search["rooms"].as_array().expect("room list");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room_id"], 301);

    let hotel_id = hotel.hotel_id.to_string();
    let res = client
        .post(
            "/customer/book",
            &[
                ("room_id", "301"),
                ("hotel_id", hotel_id.as_str()),
                ("checkin", "2025-06-10"),
                ("checkout", "2025-06-12"),
            ],
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let confirmation: Value = actix_web::test::read_body_json(res).await;
    assert!(flash_messages(&confirmation).contains(&"Room booked successfully!".to_owned()));

    let history = client.page("/customer/bookings").await;
    assert_eq!(history["customer"], "Bea Park");
    let bookings = history["bookings"].as_array().expect("booking list");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["status"], "Pending");
    assert_eq!(bookings[0]["hotel_name"], "Harbour Lights");

    let again = client
        .page("/customer/search?checkin=2025-06-11&checkout=2025-06-13")
        .await;
    assert!(
        again["rooms"].as_array().is_some_and(Vec::is_empty),
        "the booked room is no longer offered for overlapping nights"
    );
}

#[rstest]
#[case("Ann Lee")]
#[case("ann lee")]
#[case("  ANN LEE ")]
#[actix_web::test]
async fn customer_names_match_case_insensitively(hotel: Hotel, #[case] typed: &str) {
    let ann = hotel.store.add_customer("Ann Lee", "P1234567", day(1));
    let mut client = open(hotel.store, day(1)).await;

    let user_id = ann.to_string();
    let landing = client
        .login(&[
            ("user_type", "customer"),
            ("full_name", typed),
            ("user_id", user_id.as_str()),
            ("password", "customer"),
        ])
        .await;
    assert_eq!(landing, "/customer/bookings");

    let home = client.page("/customer/bookings").await;
    assert_eq!(home["customer"], "Ann Lee");
    assert_eq!(flash_messages(&home), vec!["Welcome, Ann Lee!".to_owned()]);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_returns_to_login(hotel: Hotel) {
    let ann = hotel.store.add_customer("Ann Lee", "P1234567", day(1));
    let mut client = open(hotel.store, day(1)).await;

    let user_id = ann.to_string();
    let landing = client
        .login(&[
            ("user_type", "customer"),
            ("full_name", "Ann Lee"),
            ("user_id", user_id.as_str()),
            ("password", "wrong"),
        ])
        .await;
    assert_eq!(landing, "/auth/login");
    let page = client.page("/auth/login").await;
    assert_eq!(flash_messages(&page), vec!["Incorrect password.".to_owned()]);

    let res = client.get("/customer/bookings").await;
    assert_eq!(location(&res), "/auth/login", "no session was established");
}

#[rstest]
#[actix_web::test]
async fn booking_refused_while_room_is_taken(hotel: Hotel) {
    let ann = hotel.store.add_customer("Ann Lee", "P1234567", day(1));
    let other = hotel.store.add_customer("Cal Reid", "Q7654321", day(1));
    hotel.store.add_booking(
        other,
        RoomId::new(301),
        StayDates::new(day(10), day(14)).expect("valid stay"),
        BookingStatus::Confirmed,
    );
    let mut client = open(hotel.store, day(1)).await;
    let user_id = ann.to_string();
    client
        .login(&[
            ("user_type", "customer"),
            ("full_name", "Ann Lee"),
            ("user_id", user_id.as_str()),
            ("password", "customer"),
        ])
        .await;

    let hotel_id = hotel.hotel_id.to_string();
    let next = client
        .submit(
            "/customer/book",
            &[
                ("room_id", "301"),
                ("hotel_id", hotel_id.as_str()),
                ("checkin", "2025-06-12"),
                ("checkout", "2025-06-16"),
            ],
        )
        .await;
    assert_eq!(next, "/customer/search");

    let history = client.page("/customer/bookings").await;
    assert!(history["bookings"].as_array().is_some_and(Vec::is_empty));
}

#[rstest]
#[actix_web::test]
async fn staff_cannot_use_customer_pages(hotel: Hotel) {
    let clerk = hotel.store.add_employee(
        "Rita Reception",
        ehotels::domain::Position::Receptionist,
        hotel.hotel_id,
    );
    let mut client = open(hotel.store, day(1)).await;
    let user_id = clerk.to_string();
    let landing = client
        .login(&[
            ("user_type", "employee"),
            ("full_name", "Rita Reception"),
            ("user_id", user_id.as_str()),
            ("password", "employee"),
            ("position", "Receptionist"),
        ])
        .await;
    assert_eq!(landing, "/employee/dashboard");

    let res = client.get("/customer/bookings").await;
    assert_eq!(location(&res), "/auth/login");
}

#[rstest]
#[actix_web::test]
async fn catalogue_is_public(hotel: Hotel) {
    let mut client = open(hotel.store, day(1)).await;
    let page = client.page("/customer/hotels?sort=rating").await;
    let hotels = page["hotels"].as_array().expect("hotel list");
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0]["name"], "Harbour Lights");
}
