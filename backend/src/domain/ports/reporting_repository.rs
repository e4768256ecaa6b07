//! Port abstraction for the aggregate reporting views.
use async_trait::async_trait;

use crate::domain::{AvailableRoomsPerCity, HotelCapacity};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by reporting adapters.
    pub enum ReportingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reporting connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "reporting query failed: {message}",
        /// Unused by read-only views; present for a uniform mapping.
        Constraint { message: String } => "reporting constraint violated: {message}",
    }
}

map_port_error_into_domain!(ReportingRepositoryError, "reporting repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Rows of the available-rooms-per-city view.
    async fn available_rooms_per_city(
        &self,
    ) -> Result<Vec<AvailableRoomsPerCity>, ReportingRepositoryError>;

    /// Rows of the total-capacity-per-hotel view.
    async fn total_capacity_per_hotel(&self) -> Result<Vec<HotelCapacity>, ReportingRepositoryError>;
}

/// Fixture implementation returning empty views.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReportingRepository;

#[async_trait]
impl ReportingRepository for FixtureReportingRepository {
    async fn available_rooms_per_city(
        &self,
    ) -> Result<Vec<AvailableRoomsPerCity>, ReportingRepositoryError> {
        Ok(Vec::new())
    }

    async fn total_capacity_per_hotel(&self) -> Result<Vec<HotelCapacity>, ReportingRepositoryError> {
        Ok(Vec::new())
    }
}
