//! Port abstraction for booking persistence, conversion and archival.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    ArchivedBooking, Booking, BookingArchiveSort, BookingId, BookingListing, BookingOutcome,
    BookingSort, Conversion, CustomerBooking, CustomerId, EmployeeId, HotelScope, NewBooking,
};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "booking constraint violated: {message}",
    }
}

map_port_error_into_domain!(BookingRepositoryError, "booking repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a Pending booking after checking every guard.
    ///
    /// Guards and insert share one serialisable transaction: unresolved
    /// problems on the room, the customer's active booking count as of
    /// `today`, and overlap with non-cancelled bookings and rentals.
    async fn create(
        &self,
        booking: &NewBooking,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingRepositoryError>;

    /// Fetch a booking by key.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Mark a booking Cancelled; `false` when the key is unknown.
    async fn cancel(&self, id: BookingId) -> Result<bool, BookingRepositoryError>;

    /// Bookings of one customer with hotel details, unordered.
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<Vec<CustomerBooking>, BookingRepositoryError>;

    /// Upcoming Pending or Checked-in bookings with no rental, by check-in.
    async fn upcoming_unconverted(
        &self,
        scope: HotelScope,
        today: NaiveDate,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError>;

    /// Bookings within `scope` in the requested order.
    async fn list(
        &self,
        scope: HotelScope,
        sort: BookingSort,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError>;

    /// Check the booking in and insert its rental in one transaction.
    async fn convert_to_rental(
        &self,
        id: BookingId,
        employee_id: EmployeeId,
        today: NaiveDate,
    ) -> Result<Conversion, BookingRepositoryError>;

    /// Copy a booking into the archive and delete it in one transaction.
    ///
    /// Returns `false` when the key is unknown.
    async fn delete_and_archive(
        &self,
        id: BookingId,
        today: NaiveDate,
    ) -> Result<bool, BookingRepositoryError>;

    /// Archived bookings within `scope` in the requested order.
    async fn list_archive(
        &self,
        scope: HotelScope,
        sort: BookingArchiveSort,
    ) -> Result<Vec<ArchivedBooking>, BookingRepositoryError>;
}
