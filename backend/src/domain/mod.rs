//! Domain primitives, aggregates and services.
//!
//! Purpose: Define the strongly typed hotel entities, the authorisation
//! rules that scope staff to their hotel, and the services that inbound
//! adapters call with an explicit [`Principal`]. Services depend on the
//! repository traits in [`ports`] only.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Principal / StaffPrincipal / HotelScope: who is acting, and where.
//! - Entities and drafts for customers, employees, hotels, rooms, bookings,
//!   rentals, room problems and the archives.
//! - One service per screen family, from `AuthService` to
//!   `ReportingService`, plus the `RentalReconciler` job.

use chrono::NaiveDate;
use mockable::Clock;

pub mod error;
pub mod ports;

mod archive;
mod auth_service;
mod booking;
mod customer;
mod customer_admin_service;
mod customer_portal;
mod employee;
mod field;
mod front_desk;
mod hotel;
mod hotel_admin_service;
mod ids;
mod principal;
mod rental;
mod rental_reconciler;
mod reporting;
mod reporting_service;
mod room;
mod room_admin_service;
mod room_problem;
mod room_problem_service;
mod search;
mod sort_key;
mod staff_service;
mod trace_id;
mod vocabulary;

pub use self::archive::{ArchivedBooking, ArchivedRental, BookingArchiveSort, RentalArchiveSort};
pub use self::auth_service::{
    AuthService, LoginRequest, RegistrationRequest, UserType, expected_password,
};
pub use self::booking::{
    Booking, BookingConfirmation, BookingListing, BookingOutcome, BookingSort,
    CONCURRENT_WRITE_DETAIL, CustomerBooking, MAX_ACTIVE_BOOKINGS, NewBooking, StayDates,
    StayRejection, sort_customer_history,
};
pub use self::customer::{Customer, CustomerDraft, CustomerSort};
pub use self::customer_admin_service::CustomerAdminService;
pub use self::customer_portal::{BookingRequest, CustomerPortalService};
pub use self::employee::{
    Employee, EmployeeDraft, EmployeeSort, check_assignment, check_deletion, may_edit,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::front_desk::{FrontDeskPorts, FrontDeskService, RentForm, WalkInRequest};
pub use self::hotel::{CatalogueSort, Hotel, HotelChain, HotelDeletion, HotelDraft, HotelSort};
pub use self::hotel_admin_service::HotelAdminService;
pub use self::ids::{
    BookingId, CustomerId, EmployeeId, HotelChainId, HotelId, ProblemId, RentalId, RoomId,
};
pub use self::principal::{CustomerPrincipal, HotelScope, Principal, StaffPrincipal};
pub use self::rental::{
    Conversion, CustomerRental, PENDING_PAYMENT_METHOD, Payment, ReconciliationReport, Rental,
    RentalConfirmation, RentalListing, RentalOutcome, RentalSort, WalkIn,
};
pub use self::rental_reconciler::RentalReconciler;
pub use self::reporting::{AvailableRoomsPerCity, HotelCapacity};
pub use self::reporting_service::ReportingService;
pub use self::room::{Room, RoomDraft, RoomSort};
pub use self::room_admin_service::RoomAdminService;
pub use self::room_problem::{ProblemSort, RoomProblem, RoomProblemDraft};
pub use self::room_problem_service::{ProblemEdit, ProblemForm, ProblemReport, RoomProblemService};
pub use self::search::{AvailableRoom, SearchCriteria, SearchFilters, SearchSort};
pub use self::staff_service::StaffService;
pub use self::trace_id::TraceId;
pub use self::vocabulary::{
    BookingStatus, HotelCategory, Position, RentalStatus, RoomCapacity, RoomStatus,
    UnknownVariant, ViewType,
};

/// Calendar date the services treat as "today".
pub(crate) fn today(clock: &dyn Clock) -> NaiveDate {
    clock.utc().date_naive()
}
