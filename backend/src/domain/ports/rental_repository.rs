//! Port abstraction for rental persistence, payments and reconciliation.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    ArchivedRental, CustomerId, CustomerRental, HotelScope, Payment, ReconciliationReport, Rental,
    RentalArchiveSort, RentalId, RentalListing, RentalOutcome, RentalSort, WalkIn,
};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by rental repository adapters.
    pub enum RentalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rental repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rental repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "rental constraint violated: {message}",
    }
}

map_port_error_into_domain!(RentalRepositoryError, "rental repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Insert a Completed walk-in rental unless the stay overlaps another
    /// booking or rental of the room.
    async fn create_walk_in(&self, walk_in: &WalkIn) -> Result<RentalOutcome, RentalRepositoryError>;

    /// Fetch a rental by key.
    async fn find_by_id(&self, id: RentalId) -> Result<Option<Rental>, RentalRepositoryError>;

    /// Rentals of one customer with hotel details, latest check-in first.
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerRental>, RentalRepositoryError>;

    /// Rentals within `scope` in the requested order.
    async fn list(
        &self,
        scope: HotelScope,
        sort: RentalSort,
    ) -> Result<Vec<RentalListing>, RentalRepositoryError>;

    /// Overwrite the payment fields; `false` when the key is unknown.
    async fn record_payment(
        &self,
        id: RentalId,
        payment: &Payment,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError>;

    /// Copy a rental into the archive and delete it in one transaction.
    ///
    /// Returns `false` when the key is unknown.
    async fn delete_and_archive(
        &self,
        id: RentalId,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError>;

    /// Archived rentals within `scope` in the requested order.
    async fn list_archive(
        &self,
        scope: HotelScope,
        sort: RentalArchiveSort,
    ) -> Result<Vec<ArchivedRental>, RentalRepositoryError>;

    /// Move rental statuses forward for `today`.
    async fn reconcile_statuses(
        &self,
        today: NaiveDate,
    ) -> Result<ReconciliationReport, RentalRepositoryError>;
}
