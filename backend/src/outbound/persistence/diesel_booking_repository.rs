//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Booking creation checks its guards and inserts inside one `SERIALIZABLE`
//! transaction, so two concurrent requests for the same nights cannot both
//! succeed. The loser sees a serialisation failure and gets the generic
//! failure rejection.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::{AsSelect, InnerJoin, IntoBoxed, Select, exists, not};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    ArchivedBooking, Booking, BookingArchiveSort, BookingId, BookingListing, BookingOutcome,
    BookingSort, BookingStatus, Conversion, CustomerBooking, CustomerId, EmployeeId, HotelScope,
    MAX_ACTIVE_BOOKINGS, NewBooking, PENDING_PAYMENT_METHOD, Rental, RentalStatus, RoomId,
    StayRejection, UnknownVariant,
};

use super::diesel_basic_error_mapping::{
    ConstraintKind, is_serialization_failure, map_basic_pool_error, map_constrained_diesel_error,
    raised_message,
};
use super::diesel_stay_guards::{
    active_booking_count, has_unresolved_problem, room_in_hotel, room_is_taken,
};
use super::models::{
    BookingArchiveRow, BookingRow, NewBookingArchiveRow, NewBookingRow, NewRentalRow, RentalRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{booking, booking_archive, customer, hotel, rental};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_basic_pool_error(error, BookingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    if let Some(message) = raised_message(&error) {
        return BookingRepositoryError::query(message);
    }
    map_constrained_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
        |kind| {
            BookingRepositoryError::constraint(match kind {
                ConstraintKind::Duplicate => "This booking has already been converted.",
                ConstraintKind::StillReferenced => "This booking is still referenced.",
                ConstraintKind::MissingReference => "The customer, hotel or room no longer exists.",
                ConstraintKind::Check => "The booking dates were rejected.",
            })
        },
    )
}

fn decode_error(error: UnknownVariant) -> BookingRepositoryError {
    BookingRepositoryError::query(error.to_string())
}

/// Listing row: booking with customer and hotel names.
type ListingRow = (BookingRow, String, String);

fn to_listing((row, customer_name, hotel_name): ListingRow) -> Result<BookingListing, UnknownVariant> {
    let booking = Booking::try_from(row)?;
    Ok(BookingListing {
        id: booking.id,
        customer_id: booking.customer_id,
        customer_name,
        hotel_id: booking.hotel_id,
        hotel_name,
        room_id: booking.room_id,
        booking_date: booking.booking_date,
        check_in: booking.check_in,
        check_out: booking.check_out,
        status: booking.status,
    })
}

/// Turn the guarded insert's result into a booking outcome.
fn settle_create(
    result: Result<Result<BookingRow, StayRejection>, diesel::result::Error>,
    room: RoomId,
) -> Result<BookingOutcome, BookingRepositoryError> {
    match result {
        Ok(Ok(row)) => Booking::try_from(row)
            .map(BookingOutcome::Booked)
            .map_err(decode_error),
        Ok(Err(rejection)) => Ok(BookingOutcome::Rejected(rejection)),
        Err(error) if is_serialization_failure(&error) => {
            warn!(%room, "booking lost a serialisation race");
            Ok(BookingOutcome::Rejected(StayRejection::concurrent_write()))
        }
        Err(error) => Err(map_diesel_error(error)),
    }
}

/// Result of the conversion transaction before row decoding.
enum ConversionRow {
    Converted(RentalRow),
    NotFound,
    Cancelled,
    AlreadyConverted,
}

/// Booking joined with its customer and hotel, boxed so filters and
/// orderings can be chosen at runtime.
type BoxedListing<'a> = IntoBoxed<
    'a,
    Select<
        InnerJoin<InnerJoin<booking::table, customer::table>, hotel::table>,
        (AsSelect<BookingRow, Pg>, customer::full_name, hotel::hotel_name),
    >,
    Pg,
>;

fn listing_query<'a>(scope: HotelScope) -> BoxedListing<'a> {
    let mut query = booking::table
        .inner_join(customer::table)
        .inner_join(hotel::table)
        .select((
            BookingRow::as_select(),
            customer::full_name,
            hotel::hotel_name,
        ))
        .into_boxed();
    if let Some(hotel_id) = scope.hotel() {
        query = query.filter(booking::hotel_id.eq(hotel_id.get()));
    }
    query
}

fn order_listings(query: BoxedListing<'_>, sort: BookingSort) -> BoxedListing<'_> {
    let query = match sort {
        BookingSort::CheckInDesc => query.order(booking::check_in_date.desc()),
        BookingSort::CheckInAsc => query.order(booking::check_in_date.asc()),
        BookingSort::BookingDate => query.order(booking::booking_date.desc()),
        BookingSort::Customer => query.order(customer::full_name.asc()),
        BookingSort::Hotel => query.order(hotel::hotel_name.asc()),
        BookingSort::Status => query.order(booking::status.asc()),
    };
    query.then_order_by(booking::booking_id.asc())
}

fn decode_listings(
    rows: Vec<ListingRow>,
) -> Result<Vec<BookingListing>, BookingRepositoryError> {
    rows.into_iter()
        .map(to_listing)
        .collect::<Result<Vec<_>, _>>()
        .map_err(decode_error)
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn create(
        &self,
        request: &NewBooking,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let requested_room = request.room_id;
        let request = request.clone();
        let result = conn
            .build_transaction()
            .serializable()
            .run(|conn| {
                async move {
                    let room_id = request.room_id.get();
                    if !room_in_hotel(conn, room_id, request.hotel_id.get()).await? {
                        return Ok(Err(StayRejection::Other(
                            "the room does not belong to the selected hotel".to_owned(),
                        )));
                    }
                    if has_unresolved_problem(conn, room_id).await? {
                        return Ok(Err(StayRejection::UnresolvedProblem));
                    }
                    let active =
                        active_booking_count(conn, request.customer_id.get(), today).await?;
                    if active >= MAX_ACTIVE_BOOKINGS {
                        return Ok(Err(StayRejection::ActiveLimit));
                    }
                    if room_is_taken(conn, room_id, request.stay).await? {
                        return Ok(Err(StayRejection::Overlap));
                    }
                    let row = diesel::insert_into(booking::table)
                        .values(&NewBookingRow {
                            customer_id: request.customer_id.get(),
                            hotel_id: request.hotel_id.get(),
                            room_id,
                            booking_date: request.booking_date,
                            check_in_date: request.stay.check_in(),
                            check_out_date: request.stay.check_out(),
                            status: BookingStatus::Pending.as_str(),
                        })
                        .returning(BookingRow::as_returning())
                        .get_result::<BookingRow>(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Ok(row))
                }
                .scope_boxed()
            })
            .await;

        settle_create(result, requested_room)
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = booking::table
            .find(id.get())
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Booking::try_from).transpose().map_err(decode_error)
    }

    async fn cancel(&self, id: BookingId) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(booking::table.find(id.get()))
            .set(booking::status.eq(BookingStatus::Cancelled.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<Vec<CustomerBooking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(BookingRow, String, String)> = booking::table
            .inner_join(hotel::table)
            .filter(booking::customer_id.eq(customer_id.get()))
            .select((BookingRow::as_select(), hotel::hotel_name, hotel::address))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, hotel_name, hotel_address)| {
                let booking = Booking::try_from(row)?;
                let cancellable =
                    booking.status != BookingStatus::Cancelled && booking.can_cancel(today);
                Ok(CustomerBooking {
                    booking,
                    hotel_name,
                    hotel_address,
                    cancellable,
                })
            })
            .collect::<Result<Vec<_>, UnknownVariant>>()
            .map_err(decode_error)
    }

    async fn upcoming_unconverted(
        &self,
        scope: HotelScope,
        today: NaiveDate,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let converted = rental::table
            .filter(rental::booking_id.eq(booking::booking_id.nullable()))
            .select(rental::rental_id);
        let rows: Vec<ListingRow> = listing_query(scope)
            .filter(booking::status.eq_any([
                BookingStatus::Pending.as_str(),
                BookingStatus::CheckedIn.as_str(),
            ]))
            .filter(booking::check_in_date.ge(today))
            .filter(not(exists(converted)))
            .order((booking::check_in_date.asc(), booking::booking_id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_listings(rows)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: BookingSort,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ListingRow> = order_listings(listing_query(scope), sort)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_listings(rows)
    }

    async fn convert_to_rental(
        &self,
        id: BookingId,
        employee_id: EmployeeId,
        today: NaiveDate,
    ) -> Result<Conversion, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = id.get();
        let outcome = conn
            .transaction(|conn| {
                async move {
                    let Some(row) = booking::table
                        .find(key)
                        .select(BookingRow::as_select())
                        .for_update()
                        .first::<BookingRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(ConversionRow::NotFound);
                    };
                    if row.status == BookingStatus::Cancelled.as_str() {
                        return Ok(ConversionRow::Cancelled);
                    }
                    let converted = diesel::select(exists(
                        rental::table.filter(rental::booking_id.eq(key)),
                    ))
                    .get_result::<bool>(conn)
                    .await?;
                    if converted {
                        return Ok(ConversionRow::AlreadyConverted);
                    }
                    diesel::update(booking::table.find(key))
                        .set(booking::status.eq(BookingStatus::CheckedIn.as_str()))
                        .execute(conn)
                        .await?;
                    let rental_row = diesel::insert_into(rental::table)
                        .values(&NewRentalRow {
                            customer_id: row.customer_id,
                            hotel_id: row.hotel_id,
                            room_id: row.room_id,
                            employee_id: employee_id.get(),
                            booking_id: Some(key),
                            check_in_date: row.check_in_date,
                            check_out_date: row.check_out_date,
                            status: RentalStatus::Ongoing.as_str(),
                            payment_amount: 0.0,
                            payment_date: Some(today),
                            payment_method: PENDING_PAYMENT_METHOD,
                        })
                        .returning(RentalRow::as_returning())
                        .get_result::<RentalRow>(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(ConversionRow::Converted(rental_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            ConversionRow::Converted(row) => Rental::try_from(row)
                .map(Conversion::Converted)
                .map_err(decode_error),
            ConversionRow::NotFound => Ok(Conversion::NotFound),
            ConversionRow::Cancelled => Ok(Conversion::Cancelled),
            ConversionRow::AlreadyConverted => Ok(Conversion::AlreadyConverted),
        }
    }

    async fn delete_and_archive(
        &self,
        id: BookingId,
        today: NaiveDate,
    ) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = id.get();
        conn.transaction(|conn| {
            async move {
                let Some((row, customer_name, hotel_name)) = booking::table
                    .inner_join(customer::table)
                    .inner_join(hotel::table)
                    .filter(booking::booking_id.eq(key))
                    .select((
                        BookingRow::as_select(),
                        customer::full_name,
                        hotel::hotel_name,
                    ))
                    .first::<ListingRow>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(false);
                };
                diesel::insert_into(booking_archive::table)
                    .values(&NewBookingArchiveRow {
                        booking_id: row.booking_id,
                        customer_name: &customer_name,
                        hotel_id: row.hotel_id,
                        hotel_name: &hotel_name,
                        room_id: row.room_id,
                        booking_date: row.booking_date,
                        check_in_date: row.check_in_date,
                        check_out_date: row.check_out_date,
                        status: &row.status,
                        archive_date: today,
                    })
                    .execute(conn)
                    .await?;
                diesel::delete(booking::table.find(key)).execute(conn).await?;
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
        sort: BookingArchiveSort,
    ) -> Result<Vec<ArchivedBooking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = booking_archive::table
            .select(BookingArchiveRow::as_select())
            .into_boxed();
        if let Some(hotel_id) = scope.hotel() {
            query = query.filter(booking_archive::hotel_id.eq(hotel_id.get()));
        }
        query = match sort {
            BookingArchiveSort::ArchiveDateDesc => {
                query.order(booking_archive::archive_date.desc())
            }
            BookingArchiveSort::ArchiveDateAsc => {
                query.order(booking_archive::archive_date.asc())
            }
            BookingArchiveSort::BookingDate => query.order(booking_archive::booking_date.asc()),
            BookingArchiveSort::CheckIn => query.order(booking_archive::check_in_date.asc()),
            BookingArchiveSort::Customer => query.order(booking_archive::customer_name.asc()),
            BookingArchiveSort::Hotel => query.order(booking_archive::hotel_name.asc()),
        };
        let rows = query
            .then_order_by(booking_archive::archive_id.asc())
            .load::<BookingArchiveRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(ArchivedBooking::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error)
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    use super::super::diesel_basic_error_mapping::fixtures::database_error;
    use super::*;

    #[rstest]
    #[case("Room has unresolved problems", StayRejection::UnresolvedProblem)]
    #[case("customer has 5 or more active bookings", StayRejection::ActiveLimit)]
    #[case("booking overlaps an existing reservation", StayRejection::Overlap)]
    fn trigger_text_survives_for_classification(
        #[case] raised: &'static str,
        #[case] expected: StayRejection,
    ) {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::Unknown, raised));
        assert_eq!(StayRejection::classify(&mapped.to_string()), expected);
    }

    #[rstest]
    fn serialisation_losers_get_the_generic_failure() {
        let lost = database_error(
            DatabaseErrorKind::SerializationFailure,
            "could not serialize access due to read/write dependencies among transactions",
        );
        let outcome = settle_create(Err(lost), RoomId::new(101)).expect("settled");
        assert_eq!(
            outcome,
            BookingOutcome::Rejected(StayRejection::concurrent_write())
        );
    }

    #[rstest]
    fn guard_refusals_pass_through() {
        let outcome =
            settle_create(Ok(Err(StayRejection::Overlap)), RoomId::new(101)).expect("settled");
        assert_eq!(outcome, BookingOutcome::Rejected(StayRejection::Overlap));
    }

    #[rstest]
    fn integrity_errors_keep_their_fixed_text() {
        let mapped = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"rental_booking_id_key\"",
        ));
        assert_eq!(
            mapped,
            BookingRepositoryError::constraint("This booking has already been converted.")
        );
    }
}
