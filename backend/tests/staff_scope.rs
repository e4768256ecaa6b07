//! Staff flows over the page routes: hotel scoping for Managers, booking
//! conversion at the desk and Admin-only hotel deletion.

#[path = "support/browser.rs"]
mod browser;

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use serde_json::Value;

use ehotels::domain::{
    BookingId, BookingStatus, EmployeeId, HotelCategory, HotelId, Position, Room, RoomCapacity,
    RoomId, RoomStatus, StayDates, ViewType,
};
use ehotels::test_support::MemoryStore;

use browser::{flash_messages, open};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

fn room(id: i32, hotel_id: HotelId) -> Room {
    Room {
        id: RoomId::new(id),
        hotel_id,
        capacity: RoomCapacity::Single,
        view_type: ViewType::Plain,
        extendable: false,
        price: 99.0,
        status: RoomStatus::Available,
    }
}

struct Chain {
    store: Arc<MemoryStore>,
    home: HotelId,
    away: HotelId,
    empty: HotelId,
    home_booking: BookingId,
    away_booking: BookingId,
    manager: EmployeeId,
    admin: EmployeeId,
}

#[fixture]
fn chain() -> Chain {
    let store = Arc::new(MemoryStore::new());
    let chain = store.add_chain("Northern Stays");
    let home = store.add_hotel(
        chain,
        "Aurora Grand",
        "12 King Street, Toronto",
        HotelCategory::Luxury,
        5,
    );
    let away = store.add_hotel(
        chain,
        "Harbour Lights",
        "3 Pier Lane, Halifax",
        HotelCategory::Resort,
        4,
    );
    let empty = store.add_hotel(
        chain,
        "Summit Lodge",
        "40 Alpine Way, Banff",
        HotelCategory::Resort,
        3,
    );
    store.add_room(room(101, home));
    store.add_room(room(201, away));
    let ann = store.add_customer("Ann Lee", "P1234567", day(1));
    let stay = StayDates::new(day(1), day(3)).expect("valid stay");
    let home_booking = store.add_booking(ann, RoomId::new(101), stay, BookingStatus::Pending);
    let away_booking = store.add_booking(ann, RoomId::new(201), stay, BookingStatus::Pending);
    let manager = store.add_employee("Mark Manager", Position::Manager, home);
    let admin = store.add_employee("Ada Admin", Position::Admin, home);
    Chain {
        store,
        home,
        away,
        empty,
        home_booking,
        away_booking,
        manager,
        admin,
    }
}

fn staff_login<'a>(
    name: &'a str,
    id: &'a str,
    position: &'a str,
    password: &'a str,
) -> [(&'static str, &'a str); 5] {
    [
        ("user_type", "employee"),
        ("full_name", name),
        ("user_id", id),
        ("password", password),
        ("position", position),
    ]
}

fn ids(page: &Value, key: &str) -> Vec<i64> {
    page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item[key].as_i64()).collect())
        .unwrap_or_default()
}

#[rstest]
#[actix_web::test]
async fn managers_are_confined_to_their_hotel(chain: Chain) {
    let mut client = open(chain.store.clone(), day(1)).await;
    let manager_id = chain.manager.to_string();
    let landing = client
        .login(&staff_login("Mark Manager", &manager_id, "Manager", "employee"))
        .await;
    assert_eq!(landing, "/employee/dashboard");

    let dashboard = client.page("/employee/dashboard").await;
    let listed: Vec<&Value> = dashboard["bookings"]
        .as_array()
        .expect("booking list")
        .iter()
        .collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["hotel_name"], "Aurora Grand");

    let rooms = client.page("/employee/rooms").await;
    assert_eq!(ids(&rooms, "id"), vec![101]);

    let away = chain.away.to_string();
    let next = client
        .submit(
            "/employee/rooms/edit/201",
            &[
                ("hotel_id", away.as_str()),
                ("capacity", "single"),
                ("view_type", "none"),
                ("price", "80"),
                ("status", "Available"),
            ],
        )
        .await;
    assert_eq!(next, "/employee/dashboard");
    let refused = client.page("/employee/dashboard").await;
    assert_eq!(
        flash_messages(&refused),
        vec!["You can only edit rooms from your own hotel.".to_owned()]
    );

    let away_booking = chain.away_booking.to_string();
    let next = client
        .submit(
            "/employee/convert-booking",
            &[("booking_id", away_booking.as_str())],
        )
        .await;
    assert_eq!(next, "/employee/dashboard");
    assert!(chain.store.rentals().is_empty());

    let next = client
        .submit(&format!("/employee/hotels/delete/{}", chain.empty), &[])
        .await;
    assert_eq!(next, "/employee/dashboard", "hotel management is Admin-only");
}

#[rstest]
#[actix_web::test]
async fn desk_converts_a_booking_in_scope(chain: Chain) {
    let mut client = open(chain.store.clone(), day(1)).await;
    let manager_id = chain.manager.to_string();
    client
        .login(&staff_login("Mark Manager", &manager_id, "Manager", "employee"))
        .await;
    client.page("/employee/dashboard").await;

    let booking = chain.home_booking.to_string();
    let next = client
        .submit("/employee/convert-booking", &[("booking_id", booking.as_str())])
        .await;
    assert_eq!(next, "/employee/dashboard");

    let rentals = chain.store.rentals();
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0].room_id, RoomId::new(101));
    let dashboard = client.page("/employee/dashboard").await;
    let message = format!(
        "Booking #{} converted to rental #{}.",
        chain.home_booking, rentals[0].id
    );
    assert_eq!(flash_messages(&dashboard), vec![message]);
    assert!(
        dashboard["bookings"].as_array().is_some_and(Vec::is_empty),
        "converted bookings leave the dashboard"
    );
}

#[rstest]
#[actix_web::test]
async fn desk_lists_render_for_the_managers_hotel(chain: Chain) {
    let mut client = open(chain.store.clone(), day(1)).await;
    let manager_id = chain.manager.to_string();
    client
        .login(&staff_login("Mark Manager", &manager_id, "Manager", "employee"))
        .await;
    client.page("/employee/dashboard").await;

    let bookings = client.page("/employee/bookings?sort=checkin_asc").await;
    assert_eq!(bookings["sort"], "checkin_asc");
    assert_eq!(
        ids(&bookings, "id"),
        vec![i64::from(chain.home_booking.get())]
    );

    let booking = chain.home_booking.to_string();
    client
        .submit("/employee/convert-booking", &[("booking_id", booking.as_str())])
        .await;
    let rentals = client.page("/employee/rentals?sort=payment").await;
    let stored = chain.store.rentals();
    assert_eq!(ids(&rentals, "id"), vec![i64::from(stored[0].id.get())]);
}

#[rstest]
#[actix_web::test]
async fn hotels_with_bookings_survive_deletion(chain: Chain) {
    let mut client = open(chain.store.clone(), day(1)).await;
    let admin_id = chain.admin.to_string();
    client
        .login(&staff_login("Ada Admin", &admin_id, "Admin", "admin"))
        .await;
    client.page("/employee/dashboard").await;

    let next = client
        .submit(&format!("/employee/hotels/delete/{}", chain.home), &[])
        .await;
    assert_eq!(next, "/employee/hotels");
    let page = client.page("/employee/hotels").await;
    assert_eq!(
        flash_messages(&page),
        vec!["Cannot delete the hotel because it has existing bookings.".to_owned()]
    );
    assert!(ids(&page, "id").contains(&i64::from(chain.home.get())));

    let next = client
        .submit(&format!("/employee/hotels/delete/{}", chain.empty), &[])
        .await;
    assert_eq!(next, "/employee/hotels");
    let page = client.page("/employee/hotels").await;
    assert_eq!(
        flash_messages(&page),
        vec![format!("Hotel #{} deleted.", chain.empty)]
    );
    assert!(!ids(&page, "id").contains(&i64::from(chain.empty.get())));
}

#[rstest]
#[actix_web::test]
async fn wrong_position_is_refused(chain: Chain) {
    let mut client = open(chain.store, day(1)).await;
    let manager_id = chain.manager.to_string();
    let landing = client
        .login(&staff_login("Mark Manager", &manager_id, "Admin", "admin"))
        .await;
    assert_eq!(landing, "/auth/login");
}
