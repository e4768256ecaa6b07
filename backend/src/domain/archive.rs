//! Snapshots of deleted bookings and rentals.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::sort_key::define_sort_key;
use super::{BookingId, BookingStatus, HotelId, RentalId, RentalStatus, RoomId};

/// Archived booking. Names are copied so the row outlives its references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedBooking {
    /// Archive row key.
    pub archive_id: i32,
    /// Key of the deleted booking.
    pub booking_id: BookingId,
    /// Customer name at archive time.
    pub customer_name: String,
    /// Hotel key at archive time.
    pub hotel_id: HotelId,
    /// Hotel name at archive time.
    pub hotel_name: String,
    /// Booked room.
    pub room_id: RoomId,
    /// Day the booking was made.
    pub booking_date: NaiveDate,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Status when deleted.
    pub status: BookingStatus,
    /// Day archived.
    pub archive_date: NaiveDate,
}

/// Archived rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchivedRental {
    /// Archive row key.
    pub archive_id: i32,
    /// Key of the deleted rental.
    pub rental_id: RentalId,
    /// Customer name at archive time.
    pub customer_name: String,
    /// Hotel key at archive time.
    pub hotel_id: HotelId,
    /// Hotel name at archive time.
    pub hotel_name: String,
    /// Rented room.
    pub room_id: RoomId,
    /// Registering employee's name.
    pub employee_name: String,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Status when deleted.
    pub status: RentalStatus,
    /// Amount paid.
    pub payment_amount: f64,
    /// Day of the last payment.
    pub payment_date: Option<NaiveDate>,
    /// Payment method label.
    pub payment_method: String,
    /// Day archived.
    pub archive_date: NaiveDate,
}

define_sort_key! {
    /// Orderings offered on the booking archive.
    pub enum BookingArchiveSort {
        /// Most recently archived first.
        ArchiveDateDesc => "archivedate_desc",
        /// Oldest archived first.
        ArchiveDateAsc => "archivedate_asc",
        /// By booking date.
        BookingDate => "bookingdate",
        /// By check-in.
        CheckIn => "checkin",
        /// By customer name.
        Customer => "customer",
        /// By hotel name.
        Hotel => "hotel",
    }
    default = ArchiveDateDesc;
}

impl BookingArchiveSort {
    /// Compare two archive rows; ties fall back to the archive key.
    #[must_use]
    pub fn compare(self, a: &ArchivedBooking, b: &ArchivedBooking) -> Ordering {
        let primary = match self {
            Self::ArchiveDateDesc => b.archive_date.cmp(&a.archive_date),
            Self::ArchiveDateAsc => a.archive_date.cmp(&b.archive_date),
            Self::BookingDate => a.booking_date.cmp(&b.booking_date),
            Self::CheckIn => a.check_in.cmp(&b.check_in),
            Self::Customer => a.customer_name.cmp(&b.customer_name),
            Self::Hotel => a.hotel_name.cmp(&b.hotel_name),
        };
        primary.then(a.archive_id.cmp(&b.archive_id))
    }
}

define_sort_key! {
    /// Orderings offered on the rental archive.
    pub enum RentalArchiveSort {
        /// Most recently archived first.
        ArchiveDateDesc => "archivedate_desc",
        /// Oldest archived first.
        ArchiveDateAsc => "archivedate_asc",
        /// By check-in.
        CheckIn => "checkin",
        /// By customer name.
        Customer => "customer",
        /// By hotel name.
        Hotel => "hotel",
        /// By registering employee.
        Employee => "employee",
    }
    default = ArchiveDateDesc;
}

impl RentalArchiveSort {
    /// Compare two archive rows; ties fall back to the archive key.
    #[must_use]
    pub fn compare(self, a: &ArchivedRental, b: &ArchivedRental) -> Ordering {
        let primary = match self {
            Self::ArchiveDateDesc => b.archive_date.cmp(&a.archive_date),
            Self::ArchiveDateAsc => a.archive_date.cmp(&b.archive_date),
            Self::CheckIn => a.check_in.cmp(&b.check_in),
            Self::Customer => a.customer_name.cmp(&b.customer_name),
            Self::Hotel => a.hotel_name.cmp(&b.hotel_name),
            Self::Employee => a.employee_name.cmp(&b.employee_name),
        };
        primary.then(a.archive_id.cmp(&b.archive_id))
    }
}
