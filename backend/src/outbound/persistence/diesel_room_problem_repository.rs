//! PostgreSQL-backed `RoomProblemRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RoomProblemRepository, RoomProblemRepositoryError};
use crate::domain::{HotelScope, ProblemId, ProblemSort, RoomProblem, RoomProblemDraft};

use super::diesel_basic_error_mapping::{
    ConstraintKind, map_basic_pool_error, map_constrained_diesel_error,
};
use super::models::{NewRoomProblemRow, RoomProblemEdit, RoomProblemRow};
use super::pool::{DbPool, PoolError};
use super::schema::{hotel, room_problem};

/// Diesel-backed implementation of the room problem repository port.
#[derive(Clone)]
pub struct DieselRoomProblemRepository {
    pool: DbPool,
}

impl DieselRoomProblemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RoomProblemRepositoryError {
    map_basic_pool_error(error, RoomProblemRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoomProblemRepositoryError {
    map_constrained_diesel_error(
        error,
        RoomProblemRepositoryError::query,
        RoomProblemRepositoryError::connection,
        |kind| {
            RoomProblemRepositoryError::constraint(match kind {
                ConstraintKind::MissingReference => "Hotel or room not found.",
                _ => "The problem report was rejected.",
            })
        },
    )
}

async fn load_problem(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<RoomProblem>> {
    let row = room_problem::table
        .inner_join(hotel::table)
        .filter(room_problem::problem_id.eq(id))
        .select((RoomProblemRow::as_select(), hotel::hotel_name))
        .first::<(RoomProblemRow, String)>(conn)
        .await
        .optional()?;
    Ok(row.map(|(row, hotel_name)| row.into_problem(hotel_name)))
}

#[async_trait]
impl RoomProblemRepository for DieselRoomProblemRepository {
    async fn find_by_id(
        &self,
        id: ProblemId,
    ) -> Result<Option<RoomProblem>, RoomProblemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_problem(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: ProblemSort,
    ) -> Result<Vec<RoomProblem>, RoomProblemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = room_problem::table
            .inner_join(hotel::table)
            .select((RoomProblemRow::as_select(), hotel::hotel_name))
            .into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(room_problem::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            ProblemSort::ReportDesc => query.order(room_problem::report_date.desc()),
            ProblemSort::ReportAsc => query.order(room_problem::report_date.asc()),
            ProblemSort::RoomId => query.order(room_problem::room_id.asc()),
            ProblemSort::HotelName => query.order(hotel::hotel_name.asc()),
            ProblemSort::Status => query.order(room_problem::resolved.asc()),
        };
        let rows: Vec<(RoomProblemRow, String)> = query
            .then_order_by(room_problem::problem_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(row, hotel_name)| row.into_problem(hotel_name))
            .collect())
    }

    async fn insert(
        &self,
        draft: &RoomProblemDraft,
    ) -> Result<RoomProblem, RoomProblemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = diesel::insert_into(room_problem::table)
            .values(&NewRoomProblemRow {
                hotel_id: draft.hotel_id().get(),
                room_id: draft.room_id().get(),
                problem: draft.problem(),
                report_date: draft.report_date(),
                resolved: draft.resolved(),
            })
            .returning(room_problem::problem_id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_problem(&mut conn, id)
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| RoomProblemRepositoryError::query("inserted problem vanished"))
    }

    async fn update(
        &self,
        id: ProblemId,
        draft: &RoomProblemDraft,
    ) -> Result<Option<RoomProblem>, RoomProblemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(room_problem::table.find(id.get()))
            .set(&RoomProblemEdit {
                problem: draft.problem(),
                report_date: draft.report_date(),
                resolved: draft.resolved(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if changed == 0 {
            return Ok(None);
        }
        load_problem(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: ProblemId) -> Result<bool, RoomProblemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(room_problem::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
