//! Demonstration dataset for fresh databases.
//!
//! Loads a few chains, hotels across several cities, their rooms and
//! amenities, one employee per position and a sample customer, all in a
//! single transaction. A database that already holds a chain is left alone.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::info;

use crate::domain::{HotelCategory, Position, RoomCapacity, RoomStatus, ViewType};

use super::models::{CustomerValues, EmployeeValues, HotelValues, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{customer, employee, hotel, hotel_chain, room, room_amenity};

/// Seeding failure.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed connection failed: {0}")]
    Connection(#[from] PoolError),
    #[error("seed query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Rows written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub chains: usize,
    pub hotels: usize,
    pub rooms: usize,
    pub employees: usize,
    pub customers: usize,
}

/// What [`seed_demo_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(SeedSummary),
    AlreadyPopulated,
}

struct DemoRoom {
    id: i32,
    capacity: RoomCapacity,
    view: ViewType,
    extendable: bool,
    price: f64,
    amenities: &'static [&'static str],
}

struct DemoHotel {
    name: &'static str,
    address: &'static str,
    chain: usize,
    category: HotelCategory,
    rating: i32,
    rooms: &'static [DemoRoom],
}

const CHAINS: [&str; 3] = ["Northern Stays", "Harbour Group", "Summit Hotels"];

const HOTELS: &[DemoHotel] = &[
    DemoHotel {
        name: "Aurora Grand",
        address: "12 King Street, Toronto",
        chain: 0,
        category: HotelCategory::Luxury,
        rating: 5,
        rooms: &[
            DemoRoom {
                id: 101,
                capacity: RoomCapacity::Single,
                view: ViewType::Plain,
                extendable: false,
                price: 120.0,
                amenities: &["TV", "WiFi"],
            },
            DemoRoom {
                id: 102,
                capacity: RoomCapacity::Double,
                view: ViewType::Mountain,
                extendable: true,
                price: 180.0,
                amenities: &["TV", "WiFi", "Minibar"],
            },
            DemoRoom {
                id: 103,
                capacity: RoomCapacity::Suite,
                view: ViewType::Both,
                extendable: false,
                price: 420.0,
                amenities: &["Jacuzzi", "Minibar", "WiFi"],
            },
        ],
    },
    DemoHotel {
        name: "Aurora Lakeside",
        address: "8 Shore Road, Ottawa",
        chain: 0,
        category: HotelCategory::Boutique,
        rating: 4,
        rooms: &[
            DemoRoom {
                id: 201,
                capacity: RoomCapacity::Double,
                view: ViewType::Sea,
                extendable: false,
                price: 150.0,
                amenities: &["WiFi"],
            },
            DemoRoom {
                id: 202,
                capacity: RoomCapacity::Family,
                view: ViewType::Plain,
                extendable: true,
                price: 210.0,
                amenities: &["TV", "Kitchenette"],
            },
        ],
    },
    DemoHotel {
        name: "Harbour Lights",
        address: "3 Pier Lane, Halifax",
        chain: 1,
        category: HotelCategory::Resort,
        rating: 4,
        rooms: &[
            DemoRoom {
                id: 301,
                capacity: RoomCapacity::Triple,
                view: ViewType::Sea,
                extendable: true,
                price: 190.0,
                amenities: &["Balcony", "WiFi"],
            },
            DemoRoom {
                id: 302,
                capacity: RoomCapacity::Single,
                view: ViewType::Sea,
                extendable: false,
                price: 95.0,
                amenities: &["WiFi"],
            },
        ],
    },
    DemoHotel {
        name: "Summit Lodge",
        address: "40 Alpine Way, Banff",
        chain: 2,
        category: HotelCategory::Resort,
        rating: 3,
        rooms: &[DemoRoom {
            id: 401,
            capacity: RoomCapacity::Double,
            view: ViewType::Mountain,
            extendable: true,
            price: 160.0,
            amenities: &["Fireplace", "TV"],
        }],
    },
];

/// Staff as (name, address, position, ssn, hotel index).
const EMPLOYEES: [(&str, &str, Position, &str, usize); 3] = [
    ("Ada Admin", "1 Queen Street, Toronto", Position::Admin, "100-200-300", 0),
    ("Mark Manager", "9 Bay Street, Toronto", Position::Manager, "100-200-301", 0),
    ("Rita Reception", "5 Bank Street, Ottawa", Position::Receptionist, "100-200-302", 1),
];

/// Load the demonstration dataset unless the database already has chains.
///
/// # Errors
///
/// Returns [`SeedError`] when the pool or any insert fails; nothing is
/// written in that case.
pub async fn seed_demo_data(pool: &DbPool, today: NaiveDate) -> Result<SeedOutcome, SeedError> {
    let mut conn = pool.get().await?;
    let outcome = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let existing: i64 = hotel_chain::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedOutcome::AlreadyPopulated);
                }
                insert_all(conn, today).await.map(SeedOutcome::Seeded)
            }
            .scope_boxed()
        })
        .await?;
    match outcome {
        SeedOutcome::Seeded(summary) => info!(?summary, "demo data loaded"),
        SeedOutcome::AlreadyPopulated => info!("database already populated; seed skipped"),
    }
    Ok(outcome)
}

async fn insert_all(conn: &mut AsyncPgConnection, today: NaiveDate) -> QueryResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut chain_ids = Vec::with_capacity(CHAINS.len());
    for name in CHAINS {
        let id = diesel::insert_into(hotel_chain::table)
            .values(hotel_chain::chain_name.eq(name))
            .returning(hotel_chain::hotel_chain_id)
            .get_result::<i32>(conn)
            .await?;
        chain_ids.push(id);
    }
    summary.chains = chain_ids.len();

    let mut hotel_ids = Vec::with_capacity(HOTELS.len());
    for demo in HOTELS {
        let chain_id = chain_ids
            .get(demo.chain)
            .copied()
            .ok_or(diesel::result::Error::NotFound)?;
        let num_rooms = i32::try_from(demo.rooms.len()).unwrap_or(i32::MAX);
        let hotel_id = diesel::insert_into(hotel::table)
            .values(&HotelValues {
                hotel_name: demo.name,
                address: demo.address,
                hotel_chain_id: chain_id,
                category: demo.category.as_str(),
                num_rooms,
                rating: demo.rating,
            })
            .returning(hotel::hotel_id)
            .get_result::<i32>(conn)
            .await?;
        hotel_ids.push(hotel_id);
        summary.rooms += insert_rooms(conn, hotel_id, demo.rooms).await?;
    }
    summary.hotels = hotel_ids.len();

    for (full_name, address, position, ssn, hotel_index) in EMPLOYEES {
        let hotel_id = hotel_ids
            .get(hotel_index)
            .copied()
            .ok_or(diesel::result::Error::NotFound)?;
        diesel::insert_into(employee::table)
            .values(&EmployeeValues {
                full_name,
                address,
                position: position.as_str(),
                ssn,
                hotel_id,
            })
            .execute(conn)
            .await?;
        summary.employees += 1;
    }

    summary.customers = diesel::insert_into(customer::table)
        .values(&CustomerValues {
            full_name: "Ann Lee",
            address: "22 Elm Avenue, Toronto",
            id_type: "Passport",
            id_number: "P1234567",
            registration_date: today,
        })
        .execute(conn)
        .await?;

    Ok(summary)
}

async fn insert_rooms(
    conn: &mut AsyncPgConnection,
    hotel_id: i32,
    rooms: &[DemoRoom],
) -> QueryResult<usize> {
    for demo in rooms {
        diesel::insert_into(room::table)
            .values(&RoomRow {
                room_id: demo.id,
                hotel_id,
                capacity: demo.capacity.as_str().to_owned(),
                view_type: demo.view.as_str().to_owned(),
                extendable: demo.extendable,
                price: demo.price,
                status: RoomStatus::Available.as_str().to_owned(),
            })
            .execute(conn)
            .await?;
        for amenity in demo.amenities {
            diesel::insert_into(room_amenity::table)
                .values((
                    room_amenity::hotel_id.eq(hotel_id),
                    room_amenity::room_id.eq(demo.id),
                    room_amenity::amenity.eq(*amenity),
                ))
                .execute(conn)
                .await?;
        }
    }
    Ok(rooms.len())
}
