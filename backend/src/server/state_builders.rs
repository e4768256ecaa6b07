//! Builders wiring the Diesel adapters into the HTTP state.

use std::sync::Arc;

use ehotels::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCustomerRepository, DieselEmployeeRepository,
    DieselHotelRepository, DieselRentalRepository, DieselReportingRepository,
    DieselRoomProblemRepository, DieselRoomRepository,
};
use ehotels::inbound::http::state::HttpStatePorts;

/// One adapter per port, all sharing `pool`.
pub(crate) fn build_ports(pool: &DbPool) -> HttpStatePorts {
    HttpStatePorts {
        customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
        employees: Arc::new(DieselEmployeeRepository::new(pool.clone())),
        hotels: Arc::new(DieselHotelRepository::new(pool.clone())),
        rooms: Arc::new(DieselRoomRepository::new(pool.clone())),
        bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
        rentals: Arc::new(DieselRentalRepository::new(pool.clone())),
        problems: Arc::new(DieselRoomProblemRepository::new(pool.clone())),
        reports: Arc::new(DieselReportingRepository::new(pool.clone())),
    }
}
