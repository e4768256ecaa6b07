//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Vocabulary columns are stored as text and
//! parsed back through the domain enums on the way out.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{
    ArchivedBooking, ArchivedRental, Booking, BookingId, Customer, CustomerId, Employee,
    EmployeeId, Hotel, HotelChain, HotelChainId, HotelId, ProblemId, Rental, RentalId, Room,
    RoomId, RoomProblem, UnknownVariant,
};

use super::schema::{
    booking, booking_archive, customer, employee, hotel, hotel_chain, rental, rental_archive,
    room, room_problem, view_available_rooms_per_city, view_total_capacity_per_hotel,
};

// ---------------------------------------------------------------------------
// Chains and hotels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotel_chain)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelChainRow {
    pub hotel_chain_id: i32,
    pub chain_name: String,
}

impl From<HotelChainRow> for HotelChain {
    fn from(row: HotelChainRow) -> Self {
        Self {
            id: HotelChainId::new(row.hotel_chain_id),
            name: row.chain_name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotel)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelRow {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub address: String,
    pub hotel_chain_id: i32,
    pub category: String,
    pub num_rooms: i32,
    pub rating: i32,
}

impl HotelRow {
    /// Combine with the joined chain name.
    pub fn into_hotel(self, chain_name: String) -> Result<Hotel, UnknownVariant> {
        Ok(Hotel {
            id: HotelId::new(self.hotel_id),
            name: self.hotel_name,
            address: self.address,
            chain_id: HotelChainId::new(self.hotel_chain_id),
            chain_name,
            category: self.category.parse()?,
            num_rooms: self.num_rooms,
            rating: self.rating,
        })
    }
}

/// Insertable and changeset form of a hotel.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = hotel)]
pub(crate) struct HotelValues<'a> {
    pub hotel_name: &'a str,
    pub address: &'a str,
    pub hotel_chain_id: i32,
    pub category: &'a str,
    pub num_rooms: i32,
    pub rating: i32,
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// Room row; also used as insert values and changeset since the room number
/// is chosen by staff and may be changed on edit.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = room)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomRow {
    pub room_id: i32,
    pub hotel_id: i32,
    pub capacity: String,
    pub view_type: String,
    pub extendable: bool,
    pub price: f64,
    pub status: String,
}

impl TryFrom<RoomRow> for Room {
    type Error = UnknownVariant;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::new(row.room_id),
            hotel_id: HotelId::new(row.hotel_id),
            capacity: row.capacity.parse()?,
            view_type: row.view_type.parse()?,
            extendable: row.extendable,
            price: row.price,
            status: row.status.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub customer_id: i32,
    pub full_name: String,
    pub address: String,
    pub id_type: String,
    pub id_number: String,
    pub registration_date: NaiveDate,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.customer_id),
            full_name: row.full_name,
            address: row.address,
            id_type: row.id_type,
            id_number: row.id_number,
            registration_date: row.registration_date,
        }
    }
}

/// Insertable and changeset form of a customer.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = customer)]
pub(crate) struct CustomerValues<'a> {
    pub full_name: &'a str,
    pub address: &'a str,
    pub id_type: &'a str,
    pub id_number: &'a str,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employee)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub employee_id: i32,
    pub full_name: String,
    pub address: String,
    pub position: String,
    pub ssn: String,
    pub hotel_id: i32,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = UnknownVariant;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmployeeId::new(row.employee_id),
            full_name: row.full_name,
            address: row.address,
            position: row.position.parse()?,
            ssn: row.ssn,
            hotel_id: HotelId::new(row.hotel_id),
        })
    }
}

/// Insertable and changeset form of an employee.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employee)]
pub(crate) struct EmployeeValues<'a> {
    pub full_name: &'a str,
    pub address: &'a str,
    pub position: &'a str,
    pub ssn: &'a str,
    pub hotel_id: i32,
}

// ---------------------------------------------------------------------------
// Bookings and rentals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub booking_id: i32,
    pub customer_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub booking_date: NaiveDate,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = UnknownVariant;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::new(row.booking_id),
            customer_id: CustomerId::new(row.customer_id),
            hotel_id: HotelId::new(row.hotel_id),
            room_id: RoomId::new(row.room_id),
            booking_date: row.booking_date,
            check_in: row.check_in_date,
            check_out: row.check_out_date,
            status: row.status.parse()?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking)]
pub(crate) struct NewBookingRow<'a> {
    pub customer_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub booking_date: NaiveDate,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rental)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RentalRow {
    pub rental_id: i32,
    pub customer_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub employee_id: i32,
    pub booking_id: Option<i32>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
    pub payment_amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: String,
}

impl TryFrom<RentalRow> for Rental {
    type Error = UnknownVariant;

    fn try_from(row: RentalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RentalId::new(row.rental_id),
            customer_id: CustomerId::new(row.customer_id),
            hotel_id: HotelId::new(row.hotel_id),
            room_id: RoomId::new(row.room_id),
            employee_id: EmployeeId::new(row.employee_id),
            booking_id: row.booking_id.map(BookingId::new),
            check_in: row.check_in_date,
            check_out: row.check_out_date,
            status: row.status.parse()?,
            payment_amount: row.payment_amount,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rental)]
pub(crate) struct NewRentalRow<'a> {
    pub customer_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub employee_id: i32,
    pub booking_id: Option<i32>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: &'a str,
    pub payment_amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: &'a str,
}

// ---------------------------------------------------------------------------
// Room problems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = room_problem)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomProblemRow {
    pub problem_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub problem: String,
    pub report_date: NaiveDate,
    pub resolved: bool,
}

impl RoomProblemRow {
    /// Combine with the joined hotel name.
    pub fn into_problem(self, hotel_name: String) -> RoomProblem {
        RoomProblem {
            id: ProblemId::new(self.problem_id),
            hotel_id: HotelId::new(self.hotel_id),
            hotel_name,
            room_id: RoomId::new(self.room_id),
            problem: self.problem,
            report_date: self.report_date,
            resolved: self.resolved,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_problem)]
pub(crate) struct NewRoomProblemRow<'a> {
    pub hotel_id: i32,
    pub room_id: i32,
    pub problem: &'a str,
    pub report_date: NaiveDate,
    pub resolved: bool,
}

/// Editable fields of a problem report.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = room_problem)]
pub(crate) struct RoomProblemEdit<'a> {
    pub problem: &'a str,
    pub report_date: NaiveDate,
    pub resolved: bool,
}

// ---------------------------------------------------------------------------
// Archives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = booking_archive)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingArchiveRow {
    pub archive_id: i32,
    pub booking_id: i32,
    pub customer_name: String,
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_id: i32,
    pub booking_date: NaiveDate,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
    pub archive_date: NaiveDate,
}

impl TryFrom<BookingArchiveRow> for ArchivedBooking {
    type Error = UnknownVariant;

    fn try_from(row: BookingArchiveRow) -> Result<Self, Self::Error> {
        Ok(Self {
            archive_id: row.archive_id,
            booking_id: BookingId::new(row.booking_id),
            customer_name: row.customer_name,
            hotel_id: HotelId::new(row.hotel_id),
            hotel_name: row.hotel_name,
            room_id: RoomId::new(row.room_id),
            booking_date: row.booking_date,
            check_in: row.check_in_date,
            check_out: row.check_out_date,
            status: row.status.parse()?,
            archive_date: row.archive_date,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking_archive)]
pub(crate) struct NewBookingArchiveRow<'a> {
    pub booking_id: i32,
    pub customer_name: &'a str,
    pub hotel_id: i32,
    pub hotel_name: &'a str,
    pub room_id: i32,
    pub booking_date: NaiveDate,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: &'a str,
    pub archive_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rental_archive)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RentalArchiveRow {
    pub archive_id: i32,
    pub rental_id: i32,
    pub customer_name: String,
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_id: i32,
    pub employee_name: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
    pub payment_amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: String,
    pub archive_date: NaiveDate,
}

impl TryFrom<RentalArchiveRow> for ArchivedRental {
    type Error = UnknownVariant;

    fn try_from(row: RentalArchiveRow) -> Result<Self, Self::Error> {
        Ok(Self {
            archive_id: row.archive_id,
            rental_id: RentalId::new(row.rental_id),
            customer_name: row.customer_name,
            hotel_id: HotelId::new(row.hotel_id),
            hotel_name: row.hotel_name,
            room_id: RoomId::new(row.room_id),
            employee_name: row.employee_name,
            check_in: row.check_in_date,
            check_out: row.check_out_date,
            status: row.status.parse()?,
            payment_amount: row.payment_amount,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
            archive_date: row.archive_date,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rental_archive)]
pub(crate) struct NewRentalArchiveRow<'a> {
    pub rental_id: i32,
    pub customer_name: &'a str,
    pub hotel_id: i32,
    pub hotel_name: &'a str,
    pub room_id: i32,
    pub employee_name: &'a str,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: &'a str,
    pub payment_amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: &'a str,
    pub archive_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Reporting views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = view_available_rooms_per_city)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailableRoomsPerCityRow {
    pub city: String,
    pub available_rooms: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = view_total_capacity_per_hotel)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelCapacityRow {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub total_capacity: i64,
}
