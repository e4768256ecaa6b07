//! PostgreSQL-backed `EmployeeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeDraft, EmployeeId, EmployeeSort, HotelScope};

use super::diesel_basic_error_mapping::{
    ConstraintKind, map_basic_pool_error, map_constrained_diesel_error,
};
use super::diesel_helpers::lower;
use super::models::{EmployeeRow, EmployeeValues};
use super::pool::{DbPool, PoolError};
use super::schema::employee;

/// Diesel-backed implementation of the employee repository port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeeRepositoryError {
    map_basic_pool_error(error, EmployeeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    map_constrained_diesel_error(
        error,
        EmployeeRepositoryError::query,
        EmployeeRepositoryError::connection,
        |kind| {
            EmployeeRepositoryError::constraint(match kind {
                ConstraintKind::StillReferenced => "This employee still has registered rentals.",
                ConstraintKind::Duplicate => "An employee with this SSN already exists.",
                ConstraintKind::MissingReference => "Hotel not found.",
                ConstraintKind::Check => "The employee details were rejected.",
            })
        },
    )
}

fn row_to_employee(row: EmployeeRow) -> Result<Employee, EmployeeRepositoryError> {
    Employee::try_from(row).map_err(|err| EmployeeRepositoryError::query(err.to_string()))
}

fn values(draft: &EmployeeDraft) -> EmployeeValues<'_> {
    EmployeeValues {
        full_name: draft.full_name(),
        address: draft.address(),
        position: draft.position().as_str(),
        ssn: draft.ssn(),
        hotel_id: draft.hotel_id().get(),
    }
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn find_by_login(
        &self,
        full_name: &str,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = employee::table
            .filter(employee::employee_id.eq(id.get()))
            .filter(lower(employee::full_name).eq(full_name.to_lowercase()))
            .select(EmployeeRow::as_select())
            .first::<EmployeeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn find_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = employee::table
            .find(id.get())
            .select(EmployeeRow::as_select())
            .first::<EmployeeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: EmployeeSort,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = employee::table
            .select(EmployeeRow::as_select())
            .into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(employee::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            EmployeeSort::Id => query,
            EmployeeSort::Name => query.order(employee::full_name.asc()),
            EmployeeSort::Address => query.order(employee::address.asc()),
            EmployeeSort::Position => query.order(employee::position.asc()),
            EmployeeSort::Ssn => query.order(employee::ssn.asc()),
            EmployeeSort::Hotel => query.order(employee::hotel_id.asc()),
        };
        let rows = query
            .then_order_by(employee::employee_id.asc())
            .load::<EmployeeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_employee).collect()
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(employee::table)
            .values(&values(draft))
            .returning(EmployeeRow::as_returning())
            .get_result::<EmployeeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_employee(row)
    }

    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(employee::table.find(id.get()))
            .set(&values(draft))
            .returning(EmployeeRow::as_returning())
            .get_result::<EmployeeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(employee::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
