//! Bookings, stay date ranges, and the outcome of a booking attempt.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::field::field_error;
use super::sort_key::define_sort_key;
use super::{BookingId, BookingStatus, CustomerId, Error, HotelId, RoomId};

/// Maximum number of active bookings a customer may hold.
pub const MAX_ACTIVE_BOOKINGS: i64 = 5;

/// Half-open stay range `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Build a range; check-out must fall strictly after check-in.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use ehotels::domain::StayDates;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date");
    /// assert!(StayDates::new(day(3), day(3)).is_err());
    /// let stay = StayDates::new(day(3), day(5)).expect("valid stay");
    /// assert!(!stay.overlaps(StayDates::new(day(5), day(7)).expect("valid stay")));
    /// ```
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, Error> {
        if check_in >= check_out {
            return Err(field_error(
                "checkout",
                "not_after_checkin",
                "Check-out must be after check-in",
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// First night.
    #[must_use]
    pub const fn check_in(self) -> NaiveDate {
        self.check_in
    }

    /// Departure day; not a night of the stay.
    #[must_use]
    pub const fn check_out(self) -> NaiveDate {
        self.check_out
    }

    /// Whether two stays share at least one night.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    /// Primary key.
    pub id: BookingId,
    /// Booking customer.
    pub customer_id: CustomerId,
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Booked room.
    pub room_id: RoomId,
    /// Day the booking was made.
    pub booking_date: NaiveDate,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Lifecycle status.
    pub status: BookingStatus,
}

impl Booking {
    /// Customers may cancel only before the check-in day.
    #[must_use]
    pub fn can_cancel(&self, today: NaiveDate) -> bool {
        self.check_in > today
    }

    /// Counts towards the active-booking limit on `today`.
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status.blocks_room() && self.check_out >= today
    }
}

/// Booking shown in the customer's history, with hotel details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerBooking {
    /// The booking row.
    #[serde(flatten)]
    pub booking: Booking,
    /// Hotel display name.
    pub hotel_name: String,
    /// Hotel address.
    pub hotel_address: String,
    /// Whether the customer may still cancel.
    pub cancellable: bool,
}

/// Booking as listed to staff, with customer and hotel names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingListing {
    /// Booking key.
    pub id: BookingId,
    /// Booking customer.
    pub customer_id: CustomerId,
    /// Customer name.
    pub customer_name: String,
    /// Hotel key.
    pub hotel_id: HotelId,
    /// Hotel name.
    pub hotel_name: String,
    /// Booked room.
    pub room_id: RoomId,
    /// Day the booking was made.
    pub booking_date: NaiveDate,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Lifecycle status.
    pub status: BookingStatus,
}

/// Booking about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Booking customer.
    pub customer_id: CustomerId,
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Room to book.
    pub room_id: RoomId,
    /// Stay range.
    pub stay: StayDates,
    /// Day the booking is made.
    pub booking_date: NaiveDate,
}

/// Reason a stay could not be reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StayRejection {
    /// Another booking or rental holds the room for some of the nights.
    Overlap,
    /// The customer already holds the maximum number of active bookings.
    ActiveLimit,
    /// The room has an unresolved problem report.
    UnresolvedProblem,
    /// Any other store failure, carrying its text.
    Other(String),
}

/// Detail reported when a concurrent write on the same room wins.
pub const CONCURRENT_WRITE_DETAIL: &str =
    "another request changed this room at the same time, please try again";

impl StayRejection {
    /// Rejection for the loser of a concurrent write on the same room.
    #[must_use]
    pub fn concurrent_write() -> Self {
        Self::Other(CONCURRENT_WRITE_DETAIL.to_owned())
    }

    /// Flash text shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Overlap => "This room is no longer available for the selected dates.".to_owned(),
            Self::ActiveLimit => "You already have 5 or more active bookings.".to_owned(),
            Self::UnresolvedProblem => {
                "Cannot book this room because it has unresolved issues.".to_owned()
            }
            Self::Other(detail) => format!("Booking failed: {detail}"),
        }
    }

    /// Map raw store error text onto a rejection.
    ///
    /// Used for failures raised by database-side rules, whose only signal is
    /// their message.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("unresolved problem") {
            Self::UnresolvedProblem
        } else if lowered.contains("5 or more active bookings") {
            Self::ActiveLimit
        } else if lowered.contains("overlap") || lowered.contains("already booked") {
            Self::Overlap
        } else {
            Self::Other(text.to_owned())
        }
    }
}

/// Outcome of a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The booking was stored as Pending.
    Booked(Booking),
    /// A guard refused the booking.
    Rejected(StayRejection),
}

/// Confirmation shown after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    /// The stored booking.
    pub booking: Booking,
    /// Hotel display name, or "Unknown Hotel".
    pub hotel_name: String,
}

/// Order the customer's history: cancelled bookings last, then by check-in.
pub fn sort_customer_history(rows: &mut [CustomerBooking]) {
    rows.sort_by(|a, b| {
        let a_cancelled = a.booking.status == BookingStatus::Cancelled;
        let b_cancelled = b.booking.status == BookingStatus::Cancelled;
        a_cancelled
            .cmp(&b_cancelled)
            .then(a.booking.check_in.cmp(&b.booking.check_in))
            .then(a.booking.id.cmp(&b.booking.id))
    });
}

define_sort_key! {
    /// Orderings offered on the staff booking list.
    pub enum BookingSort {
        /// Latest check-in first.
        CheckInDesc => "checkin_desc",
        /// Earliest check-in first.
        CheckInAsc => "checkin_asc",
        /// Most recently made first.
        BookingDate => "bookingdate",
        /// By customer name.
        Customer => "customer",
        /// By hotel name.
        Hotel => "hotel",
        /// By status label.
        Status => "status",
    }
    default = CheckInDesc;
}

impl BookingSort {
    /// Compare two listings; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &BookingListing, b: &BookingListing) -> Ordering {
        let primary = match self {
            Self::CheckInDesc => b.check_in.cmp(&a.check_in),
            Self::CheckInAsc => a.check_in.cmp(&b.check_in),
            Self::BookingDate => b.booking_date.cmp(&a.booking_date),
            Self::Customer => a.customer_name.cmp(&b.customer_name),
            Self::Hotel => a.hotel_name.cmp(&b.hotel_name),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
