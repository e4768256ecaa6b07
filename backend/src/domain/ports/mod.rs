//! Repository ports at the edge of the domain.
//!
//! Services depend on these traits only. Adapters map their failures into
//! the per-port error enums, which convert into the domain [`Error`] with
//! `?`.
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::{define_port_error, map_port_error_into_domain};

mod booking_repository;
mod customer_repository;
mod employee_repository;
mod hotel_repository;
mod rental_repository;
mod reporting_repository;
mod room_problem_repository;
mod room_repository;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{EmployeeRepository, EmployeeRepositoryError};
#[cfg(test)]
pub use hotel_repository::MockHotelRepository;
pub use hotel_repository::{HotelRepository, HotelRepositoryError};
#[cfg(test)]
pub use rental_repository::MockRentalRepository;
pub use rental_repository::{RentalRepository, RentalRepositoryError};
#[cfg(test)]
pub use reporting_repository::MockReportingRepository;
pub use reporting_repository::{
    FixtureReportingRepository, ReportingRepository, ReportingRepositoryError,
};
#[cfg(test)]
pub use room_problem_repository::MockRoomProblemRepository;
pub use room_problem_repository::{RoomProblemRepository, RoomProblemRepositoryError};
#[cfg(test)]
pub use room_repository::MockRoomRepository;
pub use room_repository::{RoomRepository, RoomRepositoryError};
