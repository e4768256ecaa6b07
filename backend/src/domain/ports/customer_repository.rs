//! Port abstraction for customer persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Customer, CustomerDraft, CustomerId, CustomerSort};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "customer repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "customer constraint violated: {message}",
    }
}

map_port_error_into_domain!(CustomerRepositoryError, "customer repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a customer by key whose name matches case-insensitively.
    async fn find_by_login(
        &self,
        full_name: &str,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Whether a customer with this case-insensitive name and exact identity
    /// number already exists.
    async fn exists_with_identity(
        &self,
        full_name: &str,
        id_number: &str,
    ) -> Result<bool, CustomerRepositoryError>;

    /// Fetch a customer by key.
    async fn find_by_id(&self, id: CustomerId)
    -> Result<Option<Customer>, CustomerRepositoryError>;

    /// List every customer in the requested order.
    async fn list(&self, sort: CustomerSort) -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// Insert a customer and return the stored row.
    async fn insert(&self, draft: &CustomerDraft) -> Result<Customer, CustomerRepositoryError>;

    /// Overwrite a customer; `None` when the key is unknown.
    async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Delete a customer; `false` when the key is unknown.
    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError>;
}
