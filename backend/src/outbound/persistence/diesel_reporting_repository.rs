//! Read-only reporting adapter over the two aggregate views.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReportingRepository, ReportingRepositoryError};
use crate::domain::{AvailableRoomsPerCity, HotelCapacity, HotelId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AvailableRoomsPerCityRow, HotelCapacityRow};
use super::pool::{DbPool, PoolError};
use super::schema::{view_available_rooms_per_city, view_total_capacity_per_hotel};

/// Diesel-backed implementation of the reporting port.
#[derive(Clone)]
pub struct DieselReportingRepository {
    pool: DbPool,
}

impl DieselReportingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReportingRepositoryError {
    map_basic_pool_error(error, ReportingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReportingRepositoryError {
    map_basic_diesel_error(
        error,
        ReportingRepositoryError::query,
        ReportingRepositoryError::connection,
    )
}

#[async_trait]
impl ReportingRepository for DieselReportingRepository {
    async fn available_rooms_per_city(
        &self,
    ) -> Result<Vec<AvailableRoomsPerCity>, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AvailableRoomsPerCityRow> = view_available_rooms_per_city::table
            .order(view_available_rooms_per_city::city)
            .select(AvailableRoomsPerCityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| AvailableRoomsPerCity {
                city: row.city,
                available_rooms: row.available_rooms,
            })
            .collect())
    }

    async fn total_capacity_per_hotel(
        &self,
    ) -> Result<Vec<HotelCapacity>, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HotelCapacityRow> = view_total_capacity_per_hotel::table
            .order(view_total_capacity_per_hotel::hotel_id)
            .select(HotelCapacityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| HotelCapacity {
                hotel_id: HotelId::new(row.hotel_id),
                hotel_name: row.hotel_name,
                total_capacity: row.total_capacity,
            })
            .collect())
    }
}
