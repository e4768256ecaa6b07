//! Port abstraction for hotel and chain persistence.
use async_trait::async_trait;

use crate::domain::{
    CatalogueSort, Hotel, HotelChain, HotelChainId, HotelDeletion, HotelDraft, HotelId, HotelSort,
};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by hotel repository adapters.
    pub enum HotelRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "hotel repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "hotel repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "hotel constraint violated: {message}",
    }
}

map_port_error_into_domain!(HotelRepositoryError, "hotel repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// List every chain by name.
    async fn list_chains(&self) -> Result<Vec<HotelChain>, HotelRepositoryError>;

    /// Whether a chain with this key exists.
    async fn chain_exists(&self, id: HotelChainId) -> Result<bool, HotelRepositoryError>;

    /// Fetch a hotel by key.
    async fn find_by_id(&self, id: HotelId) -> Result<Option<Hotel>, HotelRepositoryError>;

    /// List hotels for the management screen.
    async fn list(&self, sort: HotelSort) -> Result<Vec<Hotel>, HotelRepositoryError>;

    /// List hotels for the public catalogue.
    async fn catalogue(&self, sort: CatalogueSort) -> Result<Vec<Hotel>, HotelRepositoryError>;

    /// Insert a hotel and return the stored row.
    async fn insert(&self, draft: &HotelDraft) -> Result<Hotel, HotelRepositoryError>;

    /// Overwrite a hotel; `None` when the key is unknown.
    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError>;

    /// Delete a hotel unless a booking references it.
    ///
    /// The check and the delete run in one transaction.
    async fn delete_if_unbooked(&self, id: HotelId) -> Result<HotelDeletion, HotelRepositoryError>;
}
