//! In-memory store implementing every repository port.
//!
//! Mirrors the guards and joins of the Diesel adapters closely enough to
//! drive the HTTP stack end to end without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CustomerRepository, CustomerRepositoryError,
    EmployeeRepository, EmployeeRepositoryError, HotelRepository, HotelRepositoryError,
    RentalRepository, RentalRepositoryError, ReportingRepository, ReportingRepositoryError,
    RoomProblemRepository, RoomProblemRepositoryError, RoomRepository, RoomRepositoryError,
};
use crate::domain::{
    ArchivedBooking, ArchivedRental, AvailableRoom, AvailableRoomsPerCity, Booking,
    BookingArchiveSort, BookingId, BookingListing, BookingOutcome, BookingSort, BookingStatus,
    CatalogueSort, Conversion, Customer, CustomerBooking, CustomerDraft, CustomerId,
    CustomerRental, CustomerSort, Employee, EmployeeDraft, EmployeeId, EmployeeSort, Hotel,
    HotelCapacity, HotelCategory, HotelChain, HotelChainId, HotelDeletion, HotelDraft, HotelId,
    HotelScope, HotelSort, MAX_ACTIVE_BOOKINGS, NewBooking, PENDING_PAYMENT_METHOD, Payment,
    Position, ProblemId, ProblemSort, ReconciliationReport, Rental, RentalArchiveSort, RentalId,
    RentalListing, RentalOutcome, RentalSort, RentalStatus, Room, RoomDraft, RoomId, RoomProblem,
    RoomProblemDraft, RoomSort, RoomStatus, SearchCriteria, StayDates, StayRejection, WalkIn,
};

#[derive(Default)]
struct Tables {
    next_id: i32,
    chains: BTreeMap<HotelChainId, String>,
    hotels: BTreeMap<HotelId, HotelRow>,
    rooms: BTreeMap<RoomId, Room>,
    amenities: Vec<(RoomId, String)>,
    customers: BTreeMap<CustomerId, Customer>,
    employees: BTreeMap<EmployeeId, Employee>,
    bookings: BTreeMap<BookingId, Booking>,
    rentals: BTreeMap<RentalId, Rental>,
    problems: BTreeMap<ProblemId, ProblemRow>,
    booking_archive: Vec<ArchivedBooking>,
    rental_archive: Vec<ArchivedRental>,
}

#[derive(Clone)]
struct HotelRow {
    name: String,
    address: String,
    chain_id: HotelChainId,
    category: HotelCategory,
    num_rooms: i32,
    rating: i32,
}

#[derive(Clone)]
struct ProblemRow {
    hotel_id: HotelId,
    room_id: RoomId,
    problem: String,
    report_date: NaiveDate,
    resolved: bool,
}

impl Tables {
    fn allocate(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn hotel(&self, id: HotelId) -> Option<Hotel> {
        self.hotels.get(&id).map(|row| Hotel {
            id,
            name: row.name.clone(),
            address: row.address.clone(),
            chain_id: row.chain_id,
            chain_name: self.chains.get(&row.chain_id).cloned().unwrap_or_default(),
            category: row.category,
            num_rooms: row.num_rooms,
            rating: row.rating,
        })
    }

    fn hotel_name(&self, id: HotelId) -> String {
        self.hotels
            .get(&id)
            .map(|row| row.name.clone())
            .unwrap_or_default()
    }

    fn customer_name(&self, id: CustomerId) -> String {
        self.customers
            .get(&id)
            .map(|row| row.full_name.clone())
            .unwrap_or_default()
    }

    fn problem(&self, id: ProblemId) -> Option<RoomProblem> {
        self.problems.get(&id).map(|row| RoomProblem {
            id,
            hotel_id: row.hotel_id,
            hotel_name: self.hotel_name(row.hotel_id),
            room_id: row.room_id,
            problem: row.problem.clone(),
            report_date: row.report_date,
            resolved: row.resolved,
        })
    }

    fn booking_listing(&self, booking: &Booking) -> BookingListing {
        BookingListing {
            id: booking.id,
            customer_id: booking.customer_id,
            customer_name: self.customer_name(booking.customer_id),
            hotel_id: booking.hotel_id,
            hotel_name: self.hotel_name(booking.hotel_id),
            room_id: booking.room_id,
            booking_date: booking.booking_date,
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status,
        }
    }

    fn rental_listing(&self, rental: &Rental) -> RentalListing {
        RentalListing {
            id: rental.id,
            customer_name: self.customer_name(rental.customer_id),
            hotel_id: rental.hotel_id,
            hotel_name: self.hotel_name(rental.hotel_id),
            room_id: rental.room_id,
            check_in: rental.check_in,
            check_out: rental.check_out,
            status: rental.status,
            payment_amount: rental.payment_amount,
            payment_method: rental.payment_method.clone(),
        }
    }

    fn has_unresolved_problem(&self, room_id: RoomId) -> bool {
        self.problems
            .values()
            .any(|row| row.room_id == room_id && !row.resolved)
    }

    fn latest_open_problem(&self, room_id: RoomId) -> Option<String> {
        self.problems
            .iter()
            .filter(|(_, row)| row.room_id == room_id && !row.resolved)
            .max_by_key(|(id, row)| (row.report_date, **id))
            .map(|(_, row)| row.problem.clone())
    }

    fn room_is_taken(&self, room_id: RoomId, stay: StayDates) -> bool {
        let booked = self.bookings.values().any(|booking| {
            booking.room_id == room_id
                && booking.status.blocks_room()
                && stay_of(booking.check_in, booking.check_out).is_some_and(|s| s.overlaps(stay))
        });
        let rented = self.rentals.values().any(|rental| {
            rental.room_id == room_id
                && stay_of(rental.check_in, rental.check_out).is_some_and(|s| s.overlaps(stay))
        });
        booked || rented
    }

    fn room_in_hotel(&self, room_id: RoomId, hotel_id: HotelId) -> bool {
        self.rooms
            .get(&room_id)
            .is_some_and(|room| room.hotel_id == hotel_id)
    }

    fn amenities_of(&self, room_id: RoomId) -> Vec<String> {
        let mut names: Vec<String> = self
            .amenities
            .iter()
            .filter(|(room, _)| *room == room_id)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}

fn stay_of(check_in: NaiveDate, check_out: NaiveDate) -> Option<StayDates> {
    StayDates::new(check_in, check_out).ok()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn city_of(address: &str) -> String {
    address
        .rsplit(',')
        .next()
        .unwrap_or(address)
        .trim()
        .to_owned()
}

/// Shared in-memory database.
///
/// Cloneable handles are obtained by wrapping the store in an `Arc`; every
/// port trait is implemented on the store itself.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a hotel chain.
    pub fn add_chain(&self, name: &str) -> HotelChainId {
        let mut tables = self.tables();
        let id = HotelChainId::new(tables.allocate());
        tables.chains.insert(id, name.to_owned());
        id
    }

    /// Add a hotel to `chain`.
    pub fn add_hotel(
        &self,
        chain: HotelChainId,
        name: &str,
        address: &str,
        category: HotelCategory,
        rating: i32,
    ) -> HotelId {
        let mut tables = self.tables();
        let id = HotelId::new(tables.allocate());
        tables.hotels.insert(
            id,
            HotelRow {
                name: name.to_owned(),
                address: address.to_owned(),
                chain_id: chain,
                category,
                num_rooms: 0,
                rating,
            },
        );
        id
    }

    /// Add a room and bump the hotel's room count.
    pub fn add_room(&self, room: Room) {
        let mut tables = self.tables();
        if let Some(hotel) = tables.hotels.get_mut(&room.hotel_id) {
            hotel.num_rooms += 1;
        }
        tables.rooms.insert(room.id, room);
    }

    /// Attach an amenity to a room.
    pub fn add_amenity(&self, room: RoomId, amenity: &str) {
        self.tables().amenities.push((room, amenity.to_owned()));
    }

    /// Add a customer registered on `registered`.
    pub fn add_customer(&self, full_name: &str, id_number: &str, registered: NaiveDate) -> CustomerId {
        let mut tables = self.tables();
        let id = CustomerId::new(tables.allocate());
        tables.customers.insert(
            id,
            Customer {
                id,
                full_name: full_name.to_owned(),
                address: "1 Elm St".to_owned(),
                id_type: "passport".to_owned(),
                id_number: id_number.to_owned(),
                registration_date: registered,
            },
        );
        id
    }

    /// Add an employee of `hotel`.
    pub fn add_employee(&self, full_name: &str, position: Position, hotel: HotelId) -> EmployeeId {
        let mut tables = self.tables();
        let id = EmployeeId::new(tables.allocate());
        tables.employees.insert(
            id,
            Employee {
                id,
                full_name: full_name.to_owned(),
                address: "2 Oak Ave".to_owned(),
                position,
                ssn: format!("SSN-{id}"),
                hotel_id: hotel,
            },
        );
        id
    }

    /// Add a booking in any status, bypassing the guards.
    pub fn add_booking(
        &self,
        customer: CustomerId,
        room: RoomId,
        stay: StayDates,
        status: BookingStatus,
    ) -> BookingId {
        let mut tables = self.tables();
        let id = BookingId::new(tables.allocate());
        let hotel_id = tables
            .rooms
            .get(&room)
            .map_or(HotelId::new(0), |row| row.hotel_id);
        tables.bookings.insert(
            id,
            Booking {
                id,
                customer_id: customer,
                hotel_id,
                room_id: room,
                booking_date: stay.check_in(),
                check_in: stay.check_in(),
                check_out: stay.check_out(),
                status,
            },
        );
        id
    }

    /// Add a problem report.
    pub fn add_problem(&self, room: RoomId, problem: &str, reported: NaiveDate, resolved: bool) -> ProblemId {
        let mut tables = self.tables();
        let id = ProblemId::new(tables.allocate());
        let hotel_id = tables
            .rooms
            .get(&room)
            .map_or(HotelId::new(0), |row| row.hotel_id);
        tables.problems.insert(
            id,
            ProblemRow {
                hotel_id,
                room_id: room,
                problem: problem.to_owned(),
                report_date: reported,
                resolved,
            },
        );
        id
    }

    /// Snapshot of one booking.
    #[must_use]
    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        self.tables().bookings.get(&id).cloned()
    }

    /// Snapshot of one rental.
    #[must_use]
    pub fn rental(&self, id: RentalId) -> Option<Rental> {
        self.tables().rentals.get(&id).cloned()
    }

    /// Every rental, in key order.
    #[must_use]
    pub fn rentals(&self) -> Vec<Rental> {
        self.tables().rentals.values().cloned().collect()
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn find_by_login(
        &self,
        full_name: &str,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(self
            .tables()
            .customers
            .get(&id)
            .filter(|row| row.full_name.to_lowercase() == full_name.to_lowercase())
            .cloned())
    }

    async fn exists_with_identity(
        &self,
        full_name: &str,
        id_number: &str,
    ) -> Result<bool, CustomerRepositoryError> {
        Ok(self.tables().customers.values().any(|row| {
            row.full_name.to_lowercase() == full_name.to_lowercase() && row.id_number == id_number
        }))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(self.tables().customers.get(&id).cloned())
    }

    async fn list(&self, sort: CustomerSort) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let mut rows: Vec<Customer> = self.tables().customers.values().cloned().collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn insert(&self, draft: &CustomerDraft) -> Result<Customer, CustomerRepositoryError> {
        let mut tables = self.tables();
        let id = CustomerId::new(tables.allocate());
        let customer = customer_from(id, draft);
        tables.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.customers.get_mut(&id) else {
            return Ok(None);
        };
        *row = customer_from(id, draft);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError> {
        let mut tables = self.tables();
        let referenced = tables.bookings.values().any(|row| row.customer_id == id)
            || tables.rentals.values().any(|row| row.customer_id == id);
        if referenced {
            return Err(CustomerRepositoryError::constraint(
                "This customer still has bookings or rentals.",
            ));
        }
        Ok(tables.customers.remove(&id).is_some())
    }
}

fn customer_from(id: CustomerId, draft: &CustomerDraft) -> Customer {
    Customer {
        id,
        full_name: draft.full_name().to_owned(),
        address: draft.address().to_owned(),
        id_type: draft.id_type().to_owned(),
        id_number: draft.id_number().to_owned(),
        registration_date: draft.registration_date(),
    }
}

fn employee_from(id: EmployeeId, draft: &EmployeeDraft) -> Employee {
    Employee {
        id,
        full_name: draft.full_name().to_owned(),
        address: draft.address().to_owned(),
        position: draft.position(),
        ssn: draft.ssn().to_owned(),
        hotel_id: draft.hotel_id(),
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn find_by_login(
        &self,
        full_name: &str,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self
            .tables()
            .employees
            .get(&id)
            .filter(|row| row.full_name.to_lowercase() == full_name.to_lowercase())
            .cloned())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.tables().employees.get(&id).cloned())
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: EmployeeSort,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut rows: Vec<Employee> = self
            .tables()
            .employees
            .values()
            .filter(|row| scope.contains(row.hotel_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError> {
        let mut tables = self.tables();
        if !tables.hotels.contains_key(&draft.hotel_id()) {
            return Err(EmployeeRepositoryError::constraint("Hotel not found."));
        }
        let id = EmployeeId::new(tables.allocate());
        let employee = employee_from(id, draft);
        tables.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut tables = self.tables();
        if !tables.hotels.contains_key(&draft.hotel_id()) {
            return Err(EmployeeRepositoryError::constraint("Hotel not found."));
        }
        let Some(row) = tables.employees.get_mut(&id) else {
            return Ok(None);
        };
        *row = employee_from(id, draft);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut tables = self.tables();
        if tables.rentals.values().any(|row| row.employee_id == id) {
            return Err(EmployeeRepositoryError::constraint(
                "This employee still has registered rentals.",
            ));
        }
        Ok(tables.employees.remove(&id).is_some())
    }
}

fn hotel_row(draft: &HotelDraft) -> HotelRow {
    HotelRow {
        name: draft.name().to_owned(),
        address: draft.address().to_owned(),
        chain_id: draft.chain_id(),
        category: draft.category(),
        num_rooms: draft.num_rooms(),
        rating: draft.rating(),
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn list_chains(&self) -> Result<Vec<HotelChain>, HotelRepositoryError> {
        let mut chains: Vec<HotelChain> = self
            .tables()
            .chains
            .iter()
            .map(|(id, name)| HotelChain {
                id: *id,
                name: name.clone(),
            })
            .collect();
        chains.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(chains)
    }

    async fn chain_exists(&self, id: HotelChainId) -> Result<bool, HotelRepositoryError> {
        Ok(self.tables().chains.contains_key(&id))
    }

    async fn find_by_id(&self, id: HotelId) -> Result<Option<Hotel>, HotelRepositoryError> {
        Ok(self.tables().hotel(id))
    }

    async fn list(&self, sort: HotelSort) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<Hotel> = tables.hotels.keys().filter_map(|id| tables.hotel(*id)).collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn catalogue(&self, sort: CatalogueSort) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<Hotel> = tables.hotels.keys().filter_map(|id| tables.hotel(*id)).collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn insert(&self, draft: &HotelDraft) -> Result<Hotel, HotelRepositoryError> {
        let mut tables = self.tables();
        let id = HotelId::new(tables.allocate());
        tables.hotels.insert(id, hotel_row(draft));
        tables
            .hotel(id)
            .ok_or_else(|| HotelRepositoryError::query("inserted hotel vanished"))
    }

    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.hotels.get_mut(&id) else {
            return Ok(None);
        };
        *row = hotel_row(draft);
        Ok(tables.hotel(id))
    }

    async fn delete_if_unbooked(&self, id: HotelId) -> Result<HotelDeletion, HotelRepositoryError> {
        let mut tables = self.tables();
        if !tables.hotels.contains_key(&id) {
            return Ok(HotelDeletion::NotFound);
        }
        if tables.bookings.values().any(|row| row.hotel_id == id) {
            return Ok(HotelDeletion::HasBookings);
        }
        if tables.rentals.values().any(|row| row.hotel_id == id) {
            return Err(HotelRepositoryError::constraint(
                "This hotel still has rentals.",
            ));
        }
        tables.hotels.remove(&id);
        tables.employees.retain(|_, row| row.hotel_id != id);
        tables.problems.retain(|_, row| row.hotel_id != id);
        let removed: Vec<RoomId> = tables
            .rooms
            .values()
            .filter(|room| room.hotel_id == id)
            .map(|room| room.id)
            .collect();
        tables.rooms.retain(|_, room| room.hotel_id != id);
        tables.amenities.retain(|(room, _)| !removed.contains(room));
        Ok(HotelDeletion::Deleted)
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RoomRepositoryError> {
        Ok(self.tables().rooms.get(&id).cloned())
    }

    async fn list(&self, scope: HotelScope, sort: RoomSort) -> Result<Vec<Room>, RoomRepositoryError> {
        let mut rows: Vec<Room> = self
            .tables()
            .rooms
            .values()
            .filter(|room| scope.contains(room.hotel_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn insert(&self, draft: &RoomDraft) -> Result<Room, RoomRepositoryError> {
        let mut tables = self.tables();
        if tables.rooms.contains_key(&draft.id()) {
            return Err(RoomRepositoryError::constraint(
                "A room with this number already exists.",
            ));
        }
        if !tables.hotels.contains_key(&draft.hotel_id()) {
            return Err(RoomRepositoryError::constraint("Hotel not found."));
        }
        let room = draft.clone().into_room();
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn update(&self, id: RoomId, draft: &RoomDraft) -> Result<Option<Room>, RoomRepositoryError> {
        let mut tables = self.tables();
        if !tables.rooms.contains_key(&id) {
            return Ok(None);
        }
        if draft.id() != id && tables.rooms.contains_key(&draft.id()) {
            return Err(RoomRepositoryError::constraint(
                "A room with this number already exists.",
            ));
        }
        if !tables.hotels.contains_key(&draft.hotel_id()) {
            return Err(RoomRepositoryError::constraint("Hotel not found."));
        }
        tables.rooms.remove(&id);
        let room = draft.clone().into_room();
        tables.rooms.insert(room.id, room.clone());
        Ok(Some(room))
    }

    async fn delete(&self, id: RoomId) -> Result<bool, RoomRepositoryError> {
        let mut tables = self.tables();
        let referenced = tables.bookings.values().any(|row| row.room_id == id)
            || tables.rentals.values().any(|row| row.room_id == id);
        if referenced {
            return Err(RoomRepositoryError::constraint(
                "This room still has bookings or rentals.",
            ));
        }
        tables.amenities.retain(|(room, _)| *room != id);
        tables.problems.retain(|_, row| row.room_id != id);
        Ok(tables.rooms.remove(&id).is_some())
    }

    async fn search_available(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AvailableRoom>, RoomRepositoryError> {
        let tables = self.tables();
        let filters = &criteria.filters;
        let rows = tables
            .rooms
            .values()
            .filter(|room| room.status == RoomStatus::Available)
            .filter(|room| filters.capacity.is_none_or(|capacity| room.capacity == capacity))
            .filter(|room| filters.view_type.is_none_or(|view| room.view_type == view))
            .filter(|room| filters.max_price.is_none_or(|max| room.price <= max))
            .filter(|room| !tables.room_is_taken(room.id, criteria.stay))
            .filter_map(|room| tables.hotel(room.hotel_id).map(|hotel| (room, hotel)))
            .filter(|(_, hotel)| {
                filters
                    .area
                    .as_deref()
                    .is_none_or(|area| contains_ci(&hotel.address, area))
                    && filters
                        .chain
                        .as_deref()
                        .is_none_or(|chain| contains_ci(&hotel.chain_name, chain))
                    && filters.category.is_none_or(|category| hotel.category == category)
                    && filters.min_rooms.is_none_or(|min| hotel.num_rooms >= min)
            })
            .map(|(room, hotel)| AvailableRoom {
                room_id: room.id,
                hotel_id: hotel.id,
                hotel_name: hotel.name,
                hotel_address: hotel.address,
                chain_name: hotel.chain_name,
                rating: hotel.rating,
                category: hotel.category,
                capacity: room.capacity,
                view_type: room.view_type,
                extendable: room.extendable,
                price: room.price,
                amenities: tables.amenities_of(room.id),
                open_problem: tables.latest_open_problem(room.id),
            })
            .collect();
        Ok(rows)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(
        &self,
        booking: &NewBooking,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingRepositoryError> {
        let mut tables = self.tables();
        if !tables.room_in_hotel(booking.room_id, booking.hotel_id) {
            return Ok(BookingOutcome::Rejected(StayRejection::Other(
                "the room does not belong to the selected hotel".to_owned(),
            )));
        }
        if tables.has_unresolved_problem(booking.room_id) {
            return Ok(BookingOutcome::Rejected(StayRejection::UnresolvedProblem));
        }
        let active = tables
            .bookings
            .values()
            .filter(|row| row.customer_id == booking.customer_id && row.is_active(today))
            .count();
        if i64::try_from(active).unwrap_or(i64::MAX) >= MAX_ACTIVE_BOOKINGS {
            return Ok(BookingOutcome::Rejected(StayRejection::ActiveLimit));
        }
        if tables.room_is_taken(booking.room_id, booking.stay) {
            return Ok(BookingOutcome::Rejected(StayRejection::Overlap));
        }
        let id = BookingId::new(tables.allocate());
        let stored = Booking {
            id,
            customer_id: booking.customer_id,
            hotel_id: booking.hotel_id,
            room_id: booking.room_id,
            booking_date: booking.booking_date,
            check_in: booking.stay.check_in(),
            check_out: booking.stay.check_out(),
            status: BookingStatus::Pending,
        };
        tables.bookings.insert(id, stored.clone());
        Ok(BookingOutcome::Booked(stored))
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self.tables().bookings.get(&id).cloned())
    }

    async fn cancel(&self, id: BookingId) -> Result<bool, BookingRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.bookings.get_mut(&id) else {
            return Ok(false);
        };
        row.status = BookingStatus::Cancelled;
        Ok(true)
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<Vec<CustomerBooking>, BookingRepositoryError> {
        let tables = self.tables();
        Ok(tables
            .bookings
            .values()
            .filter(|row| row.customer_id == customer_id)
            .map(|row| {
                let hotel = tables.hotels.get(&row.hotel_id);
                CustomerBooking {
                    booking: row.clone(),
                    hotel_name: hotel.map(|h| h.name.clone()).unwrap_or_default(),
                    hotel_address: hotel.map(|h| h.address.clone()).unwrap_or_default(),
                    cancellable: row.status != BookingStatus::Cancelled && row.can_cancel(today),
                }
            })
            .collect())
    }

    async fn upcoming_unconverted(
        &self,
        scope: HotelScope,
        today: NaiveDate,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<BookingListing> = tables
            .bookings
            .values()
            .filter(|row| scope.contains(row.hotel_id))
            .filter(|row| matches!(row.status, BookingStatus::Pending | BookingStatus::CheckedIn))
            .filter(|row| row.check_in >= today)
            .filter(|row| {
                !tables
                    .rentals
                    .values()
                    .any(|rental| rental.booking_id == Some(row.id))
            })
            .map(|row| tables.booking_listing(row))
            .collect();
        rows.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: BookingSort,
    ) -> Result<Vec<BookingListing>, BookingRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<BookingListing> = tables
            .bookings
            .values()
            .filter(|row| scope.contains(row.hotel_id))
            .map(|row| tables.booking_listing(row))
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn convert_to_rental(
        &self,
        id: BookingId,
        employee_id: EmployeeId,
        today: NaiveDate,
    ) -> Result<Conversion, BookingRepositoryError> {
        let mut tables = self.tables();
        let Some(booking) = tables.bookings.get(&id).cloned() else {
            return Ok(Conversion::NotFound);
        };
        if booking.status == BookingStatus::Cancelled {
            return Ok(Conversion::Cancelled);
        }
        if tables.rentals.values().any(|row| row.booking_id == Some(id)) {
            return Ok(Conversion::AlreadyConverted);
        }
        let rental_id = RentalId::new(tables.allocate());
        let rental = Rental {
            id: rental_id,
            customer_id: booking.customer_id,
            hotel_id: booking.hotel_id,
            room_id: booking.room_id,
            employee_id,
            booking_id: Some(id),
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: RentalStatus::Ongoing,
            payment_amount: 0.0,
            payment_date: Some(today),
            payment_method: PENDING_PAYMENT_METHOD.to_owned(),
        };
        if let Some(row) = tables.bookings.get_mut(&id) {
            row.status = BookingStatus::CheckedIn;
        }
        tables.rentals.insert(rental_id, rental.clone());
        Ok(Conversion::Converted(rental))
    }

    async fn delete_and_archive(
        &self,
        id: BookingId,
        today: NaiveDate,
    ) -> Result<bool, BookingRepositoryError> {
        let mut tables = self.tables();
        let Some(booking) = tables.bookings.get(&id).cloned() else {
            return Ok(false);
        };
        let archive_id = tables.allocate();
        let archived = ArchivedBooking {
            archive_id,
            booking_id: id,
            customer_name: tables.customer_name(booking.customer_id),
            hotel_id: booking.hotel_id,
            hotel_name: tables.hotel_name(booking.hotel_id),
            room_id: booking.room_id,
            booking_date: booking.booking_date,
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status,
            archive_date: today,
        };
        tables.booking_archive.push(archived);
        for rental in tables.rentals.values_mut() {
            if rental.booking_id == Some(id) {
                rental.booking_id = None;
            }
        }
        tables.bookings.remove(&id);
        Ok(true)
    }

    async fn list_archive(
        &self,
        scope: HotelScope,
        sort: BookingArchiveSort,
    ) -> Result<Vec<ArchivedBooking>, BookingRepositoryError> {
        let mut rows: Vec<ArchivedBooking> = self
            .tables()
            .booking_archive
            .iter()
            .filter(|row| scope.contains(row.hotel_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }
}

#[async_trait]
impl RentalRepository for MemoryStore {
    async fn create_walk_in(&self, walk_in: &WalkIn) -> Result<RentalOutcome, RentalRepositoryError> {
        let mut tables = self.tables();
        if tables.room_is_taken(walk_in.room_id, walk_in.stay) {
            return Ok(RentalOutcome::Rejected(StayRejection::Overlap));
        }
        let id = RentalId::new(tables.allocate());
        let rental = walk_in_rental(id, walk_in);
        tables.rentals.insert(id, rental.clone());
        Ok(RentalOutcome::Rented(rental))
    }

    async fn find_by_id(&self, id: RentalId) -> Result<Option<Rental>, RentalRepositoryError> {
        Ok(self.tables().rentals.get(&id).cloned())
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerRental>, RentalRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<CustomerRental> = tables
            .rentals
            .values()
            .filter(|row| row.customer_id == customer_id)
            .map(|row| {
                let hotel = tables.hotels.get(&row.hotel_id);
                CustomerRental {
                    rental: row.clone(),
                    hotel_name: hotel.map(|h| h.name.clone()).unwrap_or_default(),
                    hotel_address: hotel.map(|h| h.address.clone()).unwrap_or_default(),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.rental
                .check_in
                .cmp(&a.rental.check_in)
                .then(b.rental.id.cmp(&a.rental.id))
        });
        Ok(rows)
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: RentalSort,
    ) -> Result<Vec<RentalListing>, RentalRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<RentalListing> = tables
            .rentals
            .values()
            .filter(|row| scope.contains(row.hotel_id))
            .map(|row| tables.rental_listing(row))
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn record_payment(
        &self,
        id: RentalId,
        payment: &Payment,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.rentals.get_mut(&id) else {
            return Ok(false);
        };
        row.payment_amount = payment.amount();
        row.payment_method = payment.method().to_owned();
        row.payment_date = Some(today);
        Ok(true)
    }

    async fn delete_and_archive(
        &self,
        id: RentalId,
        today: NaiveDate,
    ) -> Result<bool, RentalRepositoryError> {
        let mut tables = self.tables();
        let Some(rental) = tables.rentals.get(&id).cloned() else {
            return Ok(false);
        };
        let archive_id = tables.allocate();
        let employee_name = tables
            .employees
            .get(&rental.employee_id)
            .map(|row| row.full_name.clone())
            .unwrap_or_default();
        let archived = ArchivedRental {
            archive_id,
            rental_id: id,
            customer_name: tables.customer_name(rental.customer_id),
            hotel_id: rental.hotel_id,
            hotel_name: tables.hotel_name(rental.hotel_id),
            room_id: rental.room_id,
            employee_name,
            check_in: rental.check_in,
            check_out: rental.check_out,
            status: rental.status,
            payment_amount: rental.payment_amount,
            payment_date: rental.payment_date,
            payment_method: rental.payment_method,
            archive_date: today,
        };
        tables.rental_archive.push(archived);
        tables.rentals.remove(&id);
        Ok(true)
    }

    async fn list_archive(
        &self,
        scope: HotelScope,
        sort: RentalArchiveSort,
    ) -> Result<Vec<ArchivedRental>, RentalRepositoryError> {
        let mut rows: Vec<ArchivedRental> = self
            .tables()
            .rental_archive
            .iter()
            .filter(|row| scope.contains(row.hotel_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn reconcile_statuses(
        &self,
        today: NaiveDate,
    ) -> Result<ReconciliationReport, RentalRepositoryError> {
        let mut report = ReconciliationReport::default();
        for rental in self.tables().rentals.values_mut() {
            match rental.reconciled_status(today) {
                Some(RentalStatus::Completed) => {
                    rental.status = RentalStatus::Completed;
                    report.completed += 1;
                }
                Some(RentalStatus::Ongoing) => {
                    rental.status = RentalStatus::Ongoing;
                    report.ongoing += 1;
                }
                None => {}
            }
        }
        Ok(report)
    }
}

fn walk_in_rental(id: RentalId, walk_in: &WalkIn) -> Rental {
    Rental {
        id,
        customer_id: walk_in.customer_id,
        hotel_id: walk_in.hotel_id,
        room_id: walk_in.room_id,
        employee_id: walk_in.employee_id,
        booking_id: None,
        check_in: walk_in.stay.check_in(),
        check_out: walk_in.stay.check_out(),
        status: RentalStatus::Completed,
        payment_amount: walk_in.payment.amount(),
        payment_date: Some(walk_in.today),
        payment_method: walk_in.payment.method().to_owned(),
    }
}

fn problem_row(draft: &RoomProblemDraft) -> ProblemRow {
    ProblemRow {
        hotel_id: draft.hotel_id(),
        room_id: draft.room_id(),
        problem: draft.problem().to_owned(),
        report_date: draft.report_date(),
        resolved: draft.resolved(),
    }
}

#[async_trait]
impl RoomProblemRepository for MemoryStore {
    async fn find_by_id(&self, id: ProblemId) -> Result<Option<RoomProblem>, RoomProblemRepositoryError> {
        Ok(self.tables().problem(id))
    }

    async fn list(
        &self,
        scope: HotelScope,
        sort: ProblemSort,
    ) -> Result<Vec<RoomProblem>, RoomProblemRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<RoomProblem> = tables
            .problems
            .keys()
            .filter_map(|id| tables.problem(*id))
            .filter(|row| scope.contains(row.hotel_id))
            .collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }

    async fn insert(&self, draft: &RoomProblemDraft) -> Result<RoomProblem, RoomProblemRepositoryError> {
        let mut tables = self.tables();
        let id = ProblemId::new(tables.allocate());
        tables.problems.insert(id, problem_row(draft));
        tables
            .problem(id)
            .ok_or_else(|| RoomProblemRepositoryError::query("inserted problem vanished"))
    }

    async fn update(
        &self,
        id: ProblemId,
        draft: &RoomProblemDraft,
    ) -> Result<Option<RoomProblem>, RoomProblemRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.problems.get_mut(&id) else {
            return Ok(None);
        };
        row.problem = draft.problem().to_owned();
        row.report_date = draft.report_date();
        row.resolved = draft.resolved();
        Ok(tables.problem(id))
    }

    async fn delete(&self, id: ProblemId) -> Result<bool, RoomProblemRepositoryError> {
        Ok(self.tables().problems.remove(&id).is_some())
    }
}

#[async_trait]
impl ReportingRepository for MemoryStore {
    async fn available_rooms_per_city(
        &self,
    ) -> Result<Vec<AvailableRoomsPerCity>, ReportingRepositoryError> {
        let tables = self.tables();
        let mut per_city: BTreeMap<String, i64> = BTreeMap::new();
        for room in tables.rooms.values() {
            if room.status != RoomStatus::Available {
                continue;
            }
            if let Some(hotel) = tables.hotels.get(&room.hotel_id) {
                *per_city.entry(city_of(&hotel.address)).or_default() += 1;
            }
        }
        Ok(per_city
            .into_iter()
            .map(|(city, available_rooms)| AvailableRoomsPerCity {
                city,
                available_rooms,
            })
            .collect())
    }

    async fn total_capacity_per_hotel(&self) -> Result<Vec<HotelCapacity>, ReportingRepositoryError> {
        let tables = self.tables();
        Ok(tables
            .hotels
            .iter()
            .map(|(id, hotel)| HotelCapacity {
                hotel_id: *id,
                hotel_name: hotel.name.clone(),
                total_capacity: tables
                    .rooms
                    .values()
                    .filter(|room| room.hotel_id == *id)
                    .map(|room| i64::from(room.capacity.tier()))
                    .sum(),
            })
            .collect())
    }
}
