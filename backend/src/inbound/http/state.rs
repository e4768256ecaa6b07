//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BookingRepository, CustomerRepository, EmployeeRepository, HotelRepository,
    RentalRepository, ReportingRepository, RoomProblemRepository, RoomRepository,
};
use crate::domain::{
    AuthService, CustomerAdminService, CustomerPortalService, FrontDeskPorts, FrontDeskService,
    HotelAdminService, RentalReconciler, ReportingService, RoomAdminService, RoomProblemService,
    StaffService,
};

/// Parameter object bundling every repository port the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub customers: Arc<dyn CustomerRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub rentals: Arc<dyn RentalRepository>,
    pub problems: Arc<dyn RoomProblemRepository>,
    pub reports: Arc<dyn ReportingRepository>,
}

impl HttpStatePorts {
    /// Use one store for every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CustomerRepository
            + EmployeeRepository
            + HotelRepository
            + RoomRepository
            + BookingRepository
            + RentalRepository
            + RoomProblemRepository
            + ReportingRepository
            + 'static,
    {
        Self {
            customers: store.clone(),
            employees: store.clone(),
            hotels: store.clone(),
            rooms: store.clone(),
            bookings: store.clone(),
            rentals: store.clone(),
            problems: store.clone(),
            reports: store,
        }
    }

    /// Background reconciler over the rental port.
    pub fn reconciler(&self, clock: Arc<dyn Clock>) -> RentalReconciler {
        RentalReconciler::new(self.rentals.clone(), clock)
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub portal: CustomerPortalService,
    pub front_desk: FrontDeskService,
    pub customers: CustomerAdminService,
    pub staff: StaffService,
    pub hotels: HotelAdminService,
    pub rooms: RoomAdminService,
    pub problems: RoomProblemService,
    pub reporting: ReportingService,
}

impl HttpState {
    /// Build every service over the given ports and clock.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            customers,
            employees,
            hotels,
            rooms,
            bookings,
            rentals,
            problems,
            reports,
        } = ports;
        Self {
            auth: AuthService::new(customers.clone(), employees.clone(), clock.clone()),
            portal: CustomerPortalService::new(
                rooms.clone(),
                bookings.clone(),
                rentals.clone(),
                hotels.clone(),
                clock.clone(),
            ),
            front_desk: FrontDeskService::new(
                FrontDeskPorts {
                    bookings,
                    rentals,
                    customers: customers.clone(),
                    rooms: rooms.clone(),
                    hotels: hotels.clone(),
                },
                clock.clone(),
            ),
            customers: CustomerAdminService::new(customers),
            staff: StaffService::new(employees),
            hotels: HotelAdminService::new(hotels),
            rooms: RoomAdminService::new(rooms.clone()),
            problems: RoomProblemService::new(problems, rooms, clock),
            reporting: ReportingService::new(reports),
        }
    }
}
