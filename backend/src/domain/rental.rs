//! Rentals: stays in progress or finished, with their payments.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::booking::{StayDates, StayRejection};
use super::field::{field_error, required};
use super::sort_key::define_sort_key;
use super::{
    BookingId, CustomerId, EmployeeId, Error, HotelId, RentalId, RentalStatus, RoomId,
};

/// Payment method recorded when a booking is converted before payment.
pub const PENDING_PAYMENT_METHOD: &str = "Pending";

/// Persisted rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rental {
    /// Primary key.
    pub id: RentalId,
    /// Renting customer.
    pub customer_id: CustomerId,
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Rented room.
    pub room_id: RoomId,
    /// Employee who registered the rental.
    pub employee_id: EmployeeId,
    /// Booking this rental was converted from, if any.
    pub booking_id: Option<BookingId>,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Lifecycle status.
    pub status: RentalStatus,
    /// Amount paid so far.
    pub payment_amount: f64,
    /// Day of the last payment.
    pub payment_date: Option<NaiveDate>,
    /// Payment method label.
    pub payment_method: String,
}

impl Rental {
    /// Status the reconciler would assign on `today`, if it differs.
    ///
    /// Completed rentals are final. A rental whose departure day has passed
    /// completes; one whose range contains `today` is ongoing.
    #[must_use]
    pub fn reconciled_status(&self, today: NaiveDate) -> Option<RentalStatus> {
        if self.status == RentalStatus::Completed {
            return None;
        }
        if today > self.check_out {
            Some(RentalStatus::Completed)
        } else if self.check_in <= today {
            Some(RentalStatus::Ongoing)
        } else {
            None
        }
    }
}

/// Rental shown in the customer's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRental {
    /// The rental row.
    #[serde(flatten)]
    pub rental: Rental,
    /// Hotel display name.
    pub hotel_name: String,
    /// Hotel address.
    pub hotel_address: String,
}

/// Rental as listed to staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalListing {
    /// Rental key.
    pub id: RentalId,
    /// Customer name.
    pub customer_name: String,
    /// Hotel key.
    pub hotel_id: HotelId,
    /// Hotel name.
    pub hotel_name: String,
    /// Rented room.
    pub room_id: RoomId,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Lifecycle status.
    pub status: RentalStatus,
    /// Amount paid so far.
    pub payment_amount: f64,
    /// Payment method label.
    pub payment_method: String,
}

/// Validated payment details.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    amount: f64,
    method: String,
}

impl Payment {
    /// Require a finite, non-negative amount and a method label.
    pub fn new(amount: f64, method: &str) -> Result<Self, Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(field_error(
                "payment_amount",
                "invalid_amount",
                "Payment amount must be a valid number.",
            ));
        }
        Ok(Self {
            amount,
            method: required("payment_method", method)?,
        })
    }

    /// Amount paid.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Method label.
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Walk-in rental about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkIn {
    /// Renting customer.
    pub customer_id: CustomerId,
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Room to rent.
    pub room_id: RoomId,
    /// Registering employee.
    pub employee_id: EmployeeId,
    /// Stay range.
    pub stay: StayDates,
    /// Payment taken at the desk.
    pub payment: Payment,
    /// Day the rental is registered.
    pub today: NaiveDate,
}

/// Outcome of a walk-in rental attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RentalOutcome {
    /// The rental was stored.
    Rented(Rental),
    /// A guard refused it.
    Rejected(StayRejection),
}

/// Outcome of converting a booking into a rental.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// The booking is Checked-in and the rental stored.
    Converted(Rental),
    /// No such booking.
    NotFound,
    /// The booking was cancelled.
    Cancelled,
    /// A rental already exists for the booking.
    AlreadyConverted,
}

/// Confirmation shown after a walk-in rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalConfirmation {
    /// The stored rental.
    pub rental: Rental,
    /// Customer name as entered.
    pub customer_name: String,
    /// Hotel display name, or `Hotel #<id>` when unknown.
    pub hotel_name: String,
}

/// Rows changed by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Rentals moved to Completed.
    pub completed: usize,
    /// Rentals whose range contains today, set to Ongoing.
    pub ongoing: usize,
}

define_sort_key! {
    /// Orderings offered on the staff rental list.
    pub enum RentalSort {
        /// Latest check-in first.
        CheckInDesc => "checkin_desc",
        /// Earliest check-in first.
        CheckInAsc => "checkin_asc",
        /// By customer name.
        Customer => "customer",
        /// By hotel name.
        Hotel => "hotel",
        /// By status label.
        Status => "status",
        /// Largest payment first.
        Payment => "payment",
        /// Smallest payment first.
        PaymentAsc => "payment_asc",
    }
    default = CheckInDesc;
}

impl RentalSort {
    /// Compare two listings; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &RentalListing, b: &RentalListing) -> Ordering {
        let primary = match self {
            Self::CheckInDesc => b.check_in.cmp(&a.check_in),
            Self::CheckInAsc => a.check_in.cmp(&b.check_in),
            Self::Customer => a.customer_name.cmp(&b.customer_name),
            Self::Hotel => a.hotel_name.cmp(&b.hotel_name),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::Payment => b.payment_amount.total_cmp(&a.payment_amount),
            Self::PaymentAsc => a.payment_amount.total_cmp(&b.payment_amount),
        };
        primary.then(a.id.cmp(&b.id))
    }
}
