//! Port abstraction for room problem reports.
use async_trait::async_trait;

use crate::domain::{HotelScope, ProblemId, ProblemSort, RoomProblem, RoomProblemDraft};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by room problem repository adapters.
    pub enum RoomProblemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "room problem repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "room problem repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "room problem constraint violated: {message}",
    }
}

map_port_error_into_domain!(RoomProblemRepositoryError, "room problem repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomProblemRepository: Send + Sync {
    /// Fetch a report by key.
    async fn find_by_id(&self, id: ProblemId)
    -> Result<Option<RoomProblem>, RoomProblemRepositoryError>;

    /// Reports within `scope` in the requested order.
    async fn list(
        &self,
        scope: HotelScope,
        sort: ProblemSort,
    ) -> Result<Vec<RoomProblem>, RoomProblemRepositoryError>;

    /// Insert a report and return the stored row.
    async fn insert(
        &self,
        draft: &RoomProblemDraft,
    ) -> Result<RoomProblem, RoomProblemRepositoryError>;

    /// Overwrite the text, date and resolved flag; `None` when unknown.
    async fn update(
        &self,
        id: ProblemId,
        draft: &RoomProblemDraft,
    ) -> Result<Option<RoomProblem>, RoomProblemRepositoryError>;

    /// Delete a report; `false` when the key is unknown.
    async fn delete(&self, id: ProblemId) -> Result<bool, RoomProblemRepositoryError>;
}
