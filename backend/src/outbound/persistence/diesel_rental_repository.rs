//! PostgreSQL-backed `RentalRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{RentalRepository, RentalRepositoryError};
use crate::domain::{
    ArchivedRental, CustomerId, CustomerRental, HotelScope, Payment, ReconciliationReport, Rental,
    RentalArchiveSort, RentalId, RentalListing, RentalOutcome, RentalSort, RentalStatus, RoomId,
    StayRejection, UnknownVariant, WalkIn,
};

use super::diesel_basic_error_mapping::{
    ConstraintKind, is_serialization_failure, map_basic_pool_error, map_constrained_diesel_error,
};
use super::diesel_stay_guards::room_is_taken;
use super::models::{NewRentalArchiveRow, NewRentalRow, RentalArchiveRow, RentalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{customer, employee, hotel, rental, rental_archive};

/// Diesel-backed implementation of the rental repository port.
#[derive(Clone)]
pub struct DieselRentalRepository {
    pool: DbPool,
}

impl DieselRentalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RentalRepositoryError {
    map_basic_pool_error(error, RentalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RentalRepositoryError {
    map_constrained_diesel_error(
        error,
        RentalRepositoryError::query,
        RentalRepositoryError::connection,
        |kind| {
            RentalRepositoryError::constraint(match kind {
                ConstraintKind::MissingReference => {
                    "The customer, room or employee no longer exists."
                }
                ConstraintKind::Check => "The rental details were rejected.",
                ConstraintKind::Duplicate | ConstraintKind::StillReferenced => {
                    "This rental conflicts with existing records."
                }
            })
        },
    )
}

fn decode_error(error: UnknownVariant) -> RentalRepositoryError {
    RentalRepositoryError::query(error.to_string())
}

fn to_listing(
    (row, customer_name, hotel_name): (RentalRow, String, String),
) -> Result<RentalListing, UnknownVariant> {
    let rental = Rental::try_from(row)?;
    Ok(RentalListing {
        id: rental.id,
        customer_name,
        hotel_id: rental.hotel_id,
        hotel_name,
        room_id: rental.room_id,
        check_in: rental.check_in,
        check_out: rental.check_out,
        status: rental.status,
        payment_amount: rental.payment_amount,
        payment_method: rental.payment_method,
    })
}

/// Turn the guarded walk-in insert's result into a rental outcome.
fn settle_walk_in(
    result: Result<Option<RentalRow>, diesel::result::Error>,
    room: RoomId,
) -> Result<RentalOutcome, RentalRepositoryError> {
    match result {
        Ok(Some(row)) => Rental::try_from(row)
            .map(RentalOutcome::Rented)
            .map_err(decode_error),
        Ok(None) => Ok(RentalOutcome::Rejected(StayRejection::Overlap)),
        Err(error) if is_serialization_failure(&error) => {
            warn!(%room, "walk-in lost a serialisation race");
            Ok(RentalOutcome::Rejected(StayRejection::concurrent_write()))
        }
        Err(error) => Err(map_diesel_error(error)),
    }
}

#[async_trait]
impl RentalRepository for DieselRentalRepository {
    async fn create_walk_in(&self, walk_in: &WalkIn) -> Result<RentalOutcome, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let walk_in = walk_in.clone();
        let room_id = walk_in.room_id;
        let result = conn
            .build_transaction()
            .serializable()
            .run(|conn| {
                async move {
                    if room_is_taken(conn, walk_in.room_id.get(), walk_in.stay).await? {
                        return Ok(None);
                    }
                    let row = diesel::insert_into(rental::table)
                        .values(&NewRentalRow {
                            customer_id: walk_in.customer_id.get(),
                            hotel_id: walk_in.hotel_id.get(),
                            room_id: walk_in.room_id.get(),
                            employee_id: walk_in.employee_id.get(),
                            booking_id: None,
                            check_in_date: walk_in.stay.check_in(),
                            check_out_date: walk_in.stay.check_out(),
                            status: RentalStatus::Completed.as_str(),
                            payment_amount: walk_in.payment.amount(),
                            payment_date: Some(walk_in.today),
                            payment_method: walk_in.payment.method(),
                        })
                        .returning(RentalRow::as_returning())
                        .get_result::<RentalRow>(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some(row))
                }
                .scope_boxed()
            })
            .await;

        settle_walk_in(result, room_id)
    }

    async fn find_by_id(&self, id: RentalId) -> Result<Option<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = rental::table
            .find(id.get())
            .select(RentalRow::as_select())
            .first::<RentalRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Rental::try_from).transpose().map_err(decode_error)
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerRental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(RentalRow, String, String)> = rental::table
            .inner_join(hotel::table)
            .filter(rental::customer_id.eq(customer_id.get()))
            .order((rental::check_in_date.desc(), rental::rental_id.desc()))
            .select((RentalRow::as_select(), hotel::hotel_name, hotel::address))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, hotel_name, hotel_address)| {
                Ok(CustomerRental {
                    rental: Rental::try_from(row)?,
                    hotel_name,
                    hotel_address,
                })
            })
            .collect::<Result<Vec<_>, UnknownVariant>>()
            .map_err(decode_error)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: RentalSort,
    ) -> Result<Vec<RentalListing>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = rental::table
            .inner_join(customer::table)
            .inner_join(hotel::table)
            .select((RentalRow::as_select(), customer::full_name, hotel::hotel_name))
            .into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(rental::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            RentalSort::CheckInDesc => query.order(rental::check_in_date.desc()),
            RentalSort::CheckInAsc => query.order(rental::check_in_date.asc()),
            RentalSort::Customer => query.order(customer::full_name.asc()),
            RentalSort::Hotel => query.order(hotel::hotel_name.asc()),
            RentalSort::Status => query.order(rental::status.asc()),
            RentalSort::Payment => query.order(rental::payment_amount.desc()),
            RentalSort::PaymentAsc => query.order(rental::payment_amount.asc()),
        };
        let rows: Vec<(RentalRow, String, String)> = query
            .then_order_by(rental::rental_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(to_listing)
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error)
    }

    async fn record_payment(
        &self,
        id: RentalId,
        payment: &Payment,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(rental::table.find(id.get()))
            .set((
                rental::payment_amount.eq(payment.amount()),
                rental::payment_method.eq(payment.method()),
                rental::payment_date.eq(Some(today)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn delete_and_archive(
        &self,
        id: RentalId,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = id.get();
        conn.transaction(|conn| {
            async move {
                let Some((row, customer_name, hotel_name, employee_name)) = rental::table
                    .inner_join(customer::table)
                    .inner_join(hotel::table)
                    .inner_join(employee::table)
                    .filter(rental::rental_id.eq(key))
                    .select((
                        RentalRow::as_select(),
                        customer::full_name,
                        hotel::hotel_name,
                        employee::full_name,
                    ))
                    .first::<(RentalRow, String, String, String)>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(false);
                };
                diesel::insert_into(rental_archive::table)
                    .values(&NewRentalArchiveRow {
                        rental_id: row.rental_id,
                        customer_name: &customer_name,
                        hotel_id: row.hotel_id,
                        hotel_name: &hotel_name,
                        room_id: row.room_id,
                        employee_name: &employee_name,
                        check_in_date: row.check_in_date,
                        check_out_date: row.check_out_date,
                        status: &row.status,
                        payment_amount: row.payment_amount,
                        payment_date: row.payment_date,
                        payment_method: &row.payment_method,
                        archive_date: today,
                    })
                    .execute(conn)
                    .await?;
                diesel::delete(rental::table.find(key)).execute(conn).await?;
                Ok::<_, diesel::result::Error>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_archive(
        &self,
        scope: HotelScope,
        sort: RentalArchiveSort,
    ) -> Result<Vec<ArchivedRental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = rental_archive::table
            .select(RentalArchiveRow::as_select())
            .into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(rental_archive::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            RentalArchiveSort::ArchiveDateDesc => {
                query.order(rental_archive::archive_date.desc())
            }
            RentalArchiveSort::ArchiveDateAsc => {
                query.order(rental_archive::archive_date.asc())
            }
            RentalArchiveSort::CheckIn => query.order(rental_archive::check_in_date.asc()),
            RentalArchiveSort::Customer => query.order(rental_archive::customer_name.asc()),
            RentalArchiveSort::Hotel => query.order(rental_archive::hotel_name.asc()),
            RentalArchiveSort::Employee => query.order(rental_archive::employee_name.asc()),
        };
        let rows = query
            .then_order_by(rental_archive::archive_id.asc())
            .load::<RentalArchiveRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(ArchivedRental::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error)
    }

    async fn reconcile_statuses(
        &self,
        today: NaiveDate,
    ) -> Result<ReconciliationReport, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let completed = RentalStatus::Completed.as_str();
        conn.transaction(|conn| {
            async move {
                let completed_rows = diesel::update(
                    rental::table
                        .filter(rental::status.ne(completed))
                        .filter(rental::check_out_date.lt(today)),
                )
                .set(rental::status.eq(completed))
                .execute(conn)
                .await?;
                let ongoing_rows = diesel::update(
                    rental::table
                        .filter(rental::status.ne(completed))
                        .filter(rental::check_in_date.le(today))
                        .filter(rental::check_out_date.ge(today)),
                )
                .set(rental::status.eq(RentalStatus::Ongoing.as_str()))
                .execute(conn)
                .await?;
                Ok::<_, diesel::result::Error>(ReconciliationReport {
                    completed: completed_rows,
                    ongoing: ongoing_rows,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    use super::super::diesel_basic_error_mapping::fixtures::database_error;
    use super::*;

    #[rstest]
    fn serialisation_losers_get_the_generic_failure() {
        let lost = database_error(
            DatabaseErrorKind::SerializationFailure,
            "could not serialize access due to concurrent update",
        );
        let outcome = settle_walk_in(Err(lost), RoomId::new(101)).expect("settled");
        assert_eq!(
            outcome,
            RentalOutcome::Rejected(StayRejection::concurrent_write())
        );
    }

    #[rstest]
    fn a_held_room_is_an_overlap() {
        let outcome = settle_walk_in(Ok(None), RoomId::new(101)).expect("settled");
        assert_eq!(outcome, RentalOutcome::Rejected(StayRejection::Overlap));
    }
}
