//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDraft, CustomerId, CustomerSort};

use super::diesel_basic_error_mapping::{
    ConstraintKind, map_basic_pool_error, map_constrained_diesel_error,
};
use super::diesel_helpers::lower;
use super::models::{CustomerRow, CustomerValues};
use super::pool::{DbPool, PoolError};
use super::schema::customer;

/// Diesel-backed implementation of the customer repository port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerRepositoryError {
    map_basic_pool_error(error, CustomerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CustomerRepositoryError {
    map_constrained_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
        |kind| {
            CustomerRepositoryError::constraint(match kind {
                ConstraintKind::StillReferenced => "This customer still has bookings or rentals.",
                ConstraintKind::Duplicate => "This customer already exists.",
                ConstraintKind::MissingReference | ConstraintKind::Check => {
                    "The customer details were rejected."
                }
            })
        },
    )
}

fn values(draft: &CustomerDraft) -> CustomerValues<'_> {
    CustomerValues {
        full_name: draft.full_name(),
        address: draft.address(),
        id_type: draft.id_type(),
        id_number: draft.id_number(),
        registration_date: draft.registration_date(),
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn find_by_login(
        &self,
        full_name: &str,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = customer::table
            .filter(customer::customer_id.eq(id.get()))
            .filter(lower(customer::full_name).eq(full_name.to_lowercase()))
            .select(CustomerRow::as_select())
            .first::<CustomerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Customer::from))
    }

    async fn exists_with_identity(
        &self,
        full_name: &str,
        id_number: &str,
    ) -> Result<bool, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            customer::table
                .filter(lower(customer::full_name).eq(full_name.to_lowercase()))
                .filter(customer::id_number.eq(id_number)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = customer::table
            .find(id.get())
            .select(CustomerRow::as_select())
            .first::<CustomerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Customer::from))
    }

    async fn list(&self, sort: CustomerSort) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = customer::table.select(CustomerRow::as_select()).into_boxed();
        let query = match sort {
            CustomerSort::Id => query,
            CustomerSort::FullName => query.order(customer::full_name.asc()),
            CustomerSort::Registered => query.order(customer::registration_date.desc()),
            CustomerSort::IdType => query.order(customer::id_type.asc()),
        };
        let rows: Vec<CustomerRow> = query
            .then_order_by(customer::customer_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn insert(&self, draft: &CustomerDraft) -> Result<Customer, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(customer::table)
            .values(&values(draft))
            .returning(CustomerRow::as_returning())
            .get_result::<CustomerRow>(&mut conn)
            .await
            .map(Customer::from)
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(customer::table.find(id.get()))
            .set(&values(draft))
            .returning(CustomerRow::as_returning())
            .get_result::<CustomerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Customer::from))
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(customer::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
