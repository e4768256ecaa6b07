//! Public aggregate views.

use std::sync::Arc;

use super::ports::ReportingRepository;
use super::{AvailableRoomsPerCity, Error, HotelCapacity};

/// Projects the two reporting views; no principal is required.
#[derive(Clone)]
pub struct ReportingService {
    reports: Arc<dyn ReportingRepository>,
}

impl ReportingService {
    /// Create the service.
    pub fn new(reports: Arc<dyn ReportingRepository>) -> Self {
        Self { reports }
    }

    /// Available rooms grouped by city.
    pub async fn available_rooms_per_city(&self) -> Result<Vec<AvailableRoomsPerCity>, Error> {
        Ok(self.reports.available_rooms_per_city().await?)
    }

    /// Summed room capacity per hotel.
    pub async fn total_capacity_per_hotel(&self) -> Result<Vec<HotelCapacity>, Error> {
        Ok(self.reports.total_capacity_per_hotel().await?)
    }
}
