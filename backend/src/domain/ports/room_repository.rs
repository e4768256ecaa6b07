//! Port abstraction for room persistence and availability search.
use async_trait::async_trait;

use crate::domain::{AvailableRoom, HotelScope, Room, RoomDraft, RoomId, RoomSort, SearchCriteria};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by room repository adapters.
    pub enum RoomRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "room repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "room repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "room constraint violated: {message}",
    }
}

map_port_error_into_domain!(RoomRepositoryError, "room repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Fetch a room by its globally unique number.
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RoomRepositoryError>;

    /// List rooms within `scope` in the requested order.
    async fn list(&self, scope: HotelScope, sort: RoomSort)
    -> Result<Vec<Room>, RoomRepositoryError>;

    /// Insert a room and return the stored row.
    async fn insert(&self, draft: &RoomDraft) -> Result<Room, RoomRepositoryError>;

    /// Overwrite room `id`, possibly renumbering it; `None` when unknown.
    async fn update(&self, id: RoomId, draft: &RoomDraft)
    -> Result<Option<Room>, RoomRepositoryError>;

    /// Delete a room; `false` when the number is unknown.
    async fn delete(&self, id: RoomId) -> Result<bool, RoomRepositoryError>;

    /// Available rooms matching `criteria` that are free for the whole stay.
    ///
    /// Results carry amenities and the latest unresolved problem. Ordering is
    /// left to the caller.
    async fn search_available(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AvailableRoom>, RoomRepositoryError>;
}
