//! Availability guards shared by search, booking and walk-in adapters.
//!
//! Stays are half-open: two stays overlap when each starts before the other
//! ends. Cancelled bookings never hold a room; every rental does.

use std::collections::HashSet;

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{BookingStatus, StayDates};

use super::schema::{booking, rental, room, room_problem};

/// Whether room `room_id` belongs to hotel `hotel_id`.
pub async fn room_in_hotel(
    conn: &mut AsyncPgConnection,
    room_id: i32,
    hotel_id: i32,
) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        room::table
            .filter(room::room_id.eq(room_id))
            .filter(room::hotel_id.eq(hotel_id)),
    ))
    .get_result(conn)
    .await
}

/// Whether the room has any unresolved problem report.
pub async fn has_unresolved_problem(conn: &mut AsyncPgConnection, room_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        room_problem::table
            .filter(room_problem::room_id.eq(room_id))
            .filter(room_problem::resolved.eq(false)),
    ))
    .get_result(conn)
    .await
}

/// Non-cancelled bookings of a customer that end on or after `today`.
pub async fn active_booking_count(
    conn: &mut AsyncPgConnection,
    customer_id: i32,
    today: NaiveDate,
) -> QueryResult<i64> {
    booking::table
        .filter(booking::customer_id.eq(customer_id))
        .filter(booking::status.ne(BookingStatus::Cancelled.as_str()))
        .filter(booking::check_out_date.ge(today))
        .count()
        .get_result(conn)
        .await
}

/// Whether any booking or rental holds the room for a night of `stay`.
pub async fn room_is_taken(
    conn: &mut AsyncPgConnection,
    room_id: i32,
    stay: StayDates,
) -> QueryResult<bool> {
    Ok(!taken_rooms(conn, &[room_id], stay).await?.is_empty())
}

/// Subset of `candidates` held by a booking or rental during `stay`.
pub async fn taken_rooms(
    conn: &mut AsyncPgConnection,
    candidates: &[i32],
    stay: StayDates,
) -> QueryResult<HashSet<i32>> {
    if candidates.is_empty() {
        return Ok(HashSet::new());
    }
    let booked: Vec<i32> = booking::table
        .filter(booking::room_id.eq_any(candidates))
        .filter(booking::status.ne(BookingStatus::Cancelled.as_str()))
        .filter(booking::check_in_date.lt(stay.check_out()))
        .filter(booking::check_out_date.gt(stay.check_in()))
        .select(booking::room_id)
        .load(conn)
        .await?;
    let rented: Vec<i32> = rental::table
        .filter(rental::room_id.eq_any(candidates))
        .filter(rental::check_in_date.lt(stay.check_out()))
        .filter(rental::check_out_date.gt(stay.check_in()))
        .select(rental::room_id)
        .load(conn)
        .await?;
    Ok(booked.into_iter().chain(rented).collect())
}
