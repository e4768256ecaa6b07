//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! `diesel-async` connections from a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between rows and domain types
//!   and enforce the stay guards inside transactions. Authorisation and
//!   validation stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel failures map onto each port's error enum, with
//!   integrity violations carrying a user-facing message.

mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_customer_repository;
mod diesel_demo_seed;
mod diesel_employee_repository;
mod diesel_helpers;
mod diesel_hotel_repository;
mod diesel_rental_repository;
mod diesel_reporting_repository;
mod diesel_room_problem_repository;
mod diesel_room_repository;
mod diesel_stay_guards;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_demo_seed::{SeedError, SeedOutcome, SeedSummary, seed_demo_data};
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use diesel_hotel_repository::DieselHotelRepository;
pub use diesel_rental_repository::DieselRentalRepository;
pub use diesel_reporting_repository::DieselReportingRepository;
pub use diesel_room_problem_repository::DieselRoomProblemRepository;
pub use diesel_room_repository::DieselRoomRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
