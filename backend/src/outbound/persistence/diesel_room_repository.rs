//! PostgreSQL-backed `RoomRepository` implementation using Diesel ORM.
//!
//! Availability search filters rooms and hotels in SQL, then drops rooms held
//! during the stay and attaches amenities and the latest open problem. All of
//! it reads from one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{RoomRepository, RoomRepositoryError};
use crate::domain::{
    AvailableRoom, HotelScope, Room, RoomDraft, RoomId, RoomSort, RoomStatus, SearchCriteria,
    UnknownVariant,
};

use super::diesel_basic_error_mapping::{
    ConstraintKind, map_basic_pool_error, map_constrained_diesel_error,
};
use super::diesel_helpers::contains_pattern;
use super::diesel_stay_guards::taken_rooms;
use super::models::{HotelRow, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{hotel, hotel_chain, room, room_amenity, room_problem};

/// Capacity ordinal, smallest class first.
const CAPACITY_TIER_SQL: &str = "CASE capacity WHEN 'single' THEN 1 WHEN 'double' THEN 2 \
     WHEN 'triple' THEN 3 WHEN 'family' THEN 4 ELSE 5 END";

/// Diesel-backed implementation of the room repository port.
#[derive(Clone)]
pub struct DieselRoomRepository {
    pool: DbPool,
}

impl DieselRoomRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RoomRepositoryError {
    map_basic_pool_error(error, RoomRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoomRepositoryError {
    map_constrained_diesel_error(
        error,
        RoomRepositoryError::query,
        RoomRepositoryError::connection,
        |kind| {
            RoomRepositoryError::constraint(match kind {
                ConstraintKind::Duplicate => "A room with this number already exists.",
                ConstraintKind::StillReferenced => "This room still has bookings or rentals.",
                ConstraintKind::MissingReference => "Hotel not found.",
                ConstraintKind::Check => "The room details were rejected.",
            })
        },
    )
}

fn decode_error(error: UnknownVariant) -> RoomRepositoryError {
    RoomRepositoryError::query(error.to_string())
}

fn row_from_draft(draft: &RoomDraft) -> RoomRow {
    RoomRow {
        room_id: draft.id().get(),
        hotel_id: draft.hotel_id().get(),
        capacity: draft.capacity().as_str().to_owned(),
        view_type: draft.view_type().as_str().to_owned(),
        extendable: draft.extendable(),
        price: draft.price(),
        status: draft.status().as_str().to_owned(),
    }
}

/// Candidate row before availability filtering.
type Candidate = (RoomRow, HotelRow, String);

/// Open problem text per room, latest report first.
async fn open_problems(
    conn: &mut diesel_async::AsyncPgConnection,
    rooms: &[i32],
) -> QueryResult<HashMap<i32, String>> {
    let rows: Vec<(i32, String)> = room_problem::table
        .filter(room_problem::room_id.eq_any(rooms))
        .filter(room_problem::resolved.eq(false))
        .order((
            room_problem::report_date.desc(),
            room_problem::problem_id.desc(),
        ))
        .select((room_problem::room_id, room_problem::problem))
        .load(conn)
        .await?;
    let mut latest = HashMap::new();
    for (room_id, problem) in rows {
        latest.entry(room_id).or_insert(problem);
    }
    Ok(latest)
}

/// Amenity names per room, alphabetical.
async fn amenities(
    conn: &mut diesel_async::AsyncPgConnection,
    rooms: &[i32],
) -> QueryResult<HashMap<i32, Vec<String>>> {
    let rows: Vec<(i32, String)> = room_amenity::table
        .filter(room_amenity::room_id.eq_any(rooms))
        .order((room_amenity::room_id, room_amenity::amenity))
        .select((room_amenity::room_id, room_amenity::amenity))
        .load(conn)
        .await?;
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (room_id, amenity) in rows {
        grouped.entry(room_id).or_default().push(amenity);
    }
    Ok(grouped)
}

fn to_available(
    (room_row, hotel_row, chain_name): Candidate,
    amenities: &mut HashMap<i32, Vec<String>>,
    problems: &mut HashMap<i32, String>,
) -> Result<AvailableRoom, UnknownVariant> {
    let key = room_row.room_id;
    let room = Room::try_from(room_row)?;
    let hotel = hotel_row.into_hotel(chain_name)?;
    Ok(AvailableRoom {
        room_id: room.id,
        hotel_id: hotel.id,
        hotel_name: hotel.name,
        hotel_address: hotel.address,
        chain_name: hotel.chain_name,
        rating: hotel.rating,
        category: hotel.category,
        capacity: room.capacity,
        view_type: room.view_type,
        extendable: room.extendable,
        price: room.price,
        amenities: amenities.remove(&key).unwrap_or_default(),
        open_problem: problems.remove(&key),
    })
}

#[async_trait]
impl RoomRepository for DieselRoomRepository {
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = room::table
            .find(id.get())
            .select(RoomRow::as_select())
            .first::<RoomRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Room::try_from).transpose().map_err(decode_error)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: RoomSort,
    ) -> Result<Vec<Room>, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = room::table.select(RoomRow::as_select()).into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(room::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            RoomSort::RoomIdAsc => query,
            RoomSort::RoomIdDesc => query.order(room::room_id.desc()),
            RoomSort::PriceAsc => query.order(room::price.asc()),
            RoomSort::PriceDesc => query.order(room::price.desc()),
            RoomSort::Capacity => query.order(sql::<Integer>(CAPACITY_TIER_SQL).asc()),
            RoomSort::Status => query.order(room::status.asc()),
            RoomSort::ViewType => query.order(room::view_type.asc()),
        };
        let rows = query
            .then_order_by(room::room_id.asc())
            .load::<RoomRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(Room::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error)
    }

    async fn insert(&self, draft: &RoomDraft) -> Result<Room, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(room::table)
            .values(&row_from_draft(draft))
            .returning(RoomRow::as_returning())
            .get_result::<RoomRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Room::try_from(row).map_err(decode_error)
    }

    async fn update(
        &self,
        id: RoomId,
        draft: &RoomDraft,
    ) -> Result<Option<Room>, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Renumbering cascades to amenities, problems, bookings and rentals.
        let row = diesel::update(room::table.find(id.get()))
            .set(&row_from_draft(draft))
            .returning(RoomRow::as_returning())
            .get_result::<RoomRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Room::try_from).transpose().map_err(decode_error)
    }

    async fn delete(&self, id: RoomId) -> Result<bool, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(room::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn search_available(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AvailableRoom>, RoomRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let filters = criteria.filters.clone();
        let stay = criteria.stay;

        let (candidates, mut amenity_map, mut problem_map) = conn
            .transaction(|conn| {
                async move {
                    let mut query = room::table
                        .inner_join(hotel::table.inner_join(hotel_chain::table))
                        .filter(room::status.eq(RoomStatus::Available.as_str()))
                        .select((
                            RoomRow::as_select(),
                            HotelRow::as_select(),
                            hotel_chain::chain_name,
                        ))
                        .order(room::room_id)
                        .into_boxed();
                    if let Some(capacity) = filters.capacity {
                        query = query.filter(room::capacity.eq(capacity.as_str()));
                    }
                    if let Some(view) = filters.view_type {
                        query = query.filter(room::view_type.eq(view.as_str()));
                    }
                    if let Some(max_price) = filters.max_price {
                        query = query.filter(room::price.le(max_price));
                    }
                    if let Some(area) = filters.area.as_deref() {
                        query = query.filter(hotel::address.ilike(contains_pattern(area)));
                    }
                    if let Some(chain) = filters.chain.as_deref() {
                        query = query.filter(hotel_chain::chain_name.ilike(contains_pattern(chain)));
                    }
                    if let Some(category) = filters.category {
                        query = query.filter(hotel::category.eq(category.as_str()));
                    }
                    if let Some(min_rooms) = filters.min_rooms {
                        query = query.filter(hotel::num_rooms.ge(min_rooms));
                    }
                    let rows: Vec<Candidate> = query.load(conn).await?;

                    let keys: Vec<i32> = rows.iter().map(|(row, _, _)| row.room_id).collect();
                    let taken = taken_rooms(conn, &keys, stay).await?;
                    let free: Vec<Candidate> = rows
                        .into_iter()
                        .filter(|(row, _, _)| !taken.contains(&row.room_id))
                        .collect();
                    let free_keys: Vec<i32> = free.iter().map(|(row, _, _)| row.room_id).collect();
                    let amenity_map = amenities(conn, &free_keys).await?;
                    let problem_map = open_problems(conn, &free_keys).await?;
                    Ok::<_, diesel::result::Error>((free, amenity_map, problem_map))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        candidates
            .into_iter()
            .map(|candidate| to_available(candidate, &mut amenity_map, &mut problem_map))
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error)
    }
}
