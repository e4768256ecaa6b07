//! Front-desk operations shared by every staff position.
//!
//! Covers the dashboard, booking conversion, walk-in rentals, booking and
//! rental lists, archival deletes, payments and the archives. Non-admins are
//! confined to their own hotel throughout.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::info;

use super::ports::{
    BookingRepository, CustomerRepository, HotelRepository, RentalRepository, RoomRepository,
};
use super::{
    ArchivedBooking, ArchivedRental, BookingArchiveSort, BookingId, BookingListing, BookingSort,
    Conversion, CustomerId, Error, HotelId, Payment, Rental, RentalArchiveSort,
    RentalConfirmation, RentalId, RentalListing, RentalOutcome, RentalReconciler, RentalSort,
    RoomId, StaffPrincipal, StayDates, StayRejection, WalkIn, today,
};

/// What the walk-in rental form needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentForm {
    /// Admins must name the hotel; everyone else rents in their own.
    pub requires_hotel_id: bool,
}

/// Submitted walk-in rental.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkInRequest {
    /// Customer key.
    pub customer_id: CustomerId,
    /// Customer name, checked case-insensitively against the key.
    pub customer_name: String,
    /// Room to rent.
    pub room_id: RoomId,
    /// Stay range.
    pub stay: StayDates,
    /// Payment taken at the desk.
    pub payment: Payment,
    /// Hotel; only read for Admins.
    pub hotel_id: Option<HotelId>,
}

/// Front-desk use cases.
#[derive(Clone)]
pub struct FrontDeskService {
    bookings: Arc<dyn BookingRepository>,
    rentals: Arc<dyn RentalRepository>,
    customers: Arc<dyn CustomerRepository>,
    rooms: Arc<dyn RoomRepository>,
    hotels: Arc<dyn HotelRepository>,
    reconciler: RentalReconciler,
    clock: Arc<dyn Clock>,
}

/// Repositories the front desk reads and writes.
#[derive(Clone)]
pub struct FrontDeskPorts {
    /// Booking store.
    pub bookings: Arc<dyn BookingRepository>,
    /// Rental store.
    pub rentals: Arc<dyn RentalRepository>,
    /// Customer store.
    pub customers: Arc<dyn CustomerRepository>,
    /// Room store.
    pub rooms: Arc<dyn RoomRepository>,
    /// Hotel store.
    pub hotels: Arc<dyn HotelRepository>,
}

impl FrontDeskService {
    /// Create the service.
    pub fn new(ports: FrontDeskPorts, clock: Arc<dyn Clock>) -> Self {
        let reconciler = RentalReconciler::new(ports.rentals.clone(), clock.clone());
        Self {
            bookings: ports.bookings,
            rentals: ports.rentals,
            customers: ports.customers,
            rooms: ports.rooms,
            hotels: ports.hotels,
            reconciler,
            clock,
        }
    }

    /// Upcoming bookings that still need converting, by check-in.
    pub async fn dashboard(&self, staff: &StaffPrincipal) -> Result<Vec<BookingListing>, Error> {
        Ok(self
            .bookings
            .upcoming_unconverted(staff.scope(), today(self.clock.as_ref()))
            .await?)
    }

    /// Check a booking in and open its rental.
    pub async fn convert_booking(
        &self,
        staff: &StaffPrincipal,
        booking_id: BookingId,
    ) -> Result<Rental, Error> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| Error::not_found("Booking not found."))?;
        staff.ensure_hotel(
            booking.hotel_id,
            "You are not authorized to convert bookings from other hotels.",
        )?;
        let conversion = self
            .bookings
            .convert_to_rental(booking_id, staff.id, today(self.clock.as_ref()))
            .await?;
        let rental = match conversion {
            Conversion::Converted(rental) => rental,
            Conversion::NotFound => return Err(Error::not_found("Booking not found.")),
            Conversion::Cancelled => {
                return Err(Error::conflict("Cancelled bookings cannot be converted."));
            }
            Conversion::AlreadyConverted => {
                return Err(Error::conflict(
                    "This booking has already been converted to a rental.",
                ));
            }
        };
        info!(%booking_id, rental_id = %rental.id, employee_id = %staff.id, "booking converted");
        self.reconciler.reconcile_after_write().await;
        Ok(rental)
    }

    /// Whether the walk-in form must ask for a hotel.
    #[must_use]
    pub fn rent_form(&self, staff: &StaffPrincipal) -> RentForm {
        RentForm {
            requires_hotel_id: staff.is_admin(),
        }
    }

    /// Register a walk-in rental.
    pub async fn rent_room(
        &self,
        staff: &StaffPrincipal,
        request: WalkInRequest,
    ) -> Result<RentalConfirmation, Error> {
        let hotel_id = if staff.is_admin() {
            request
                .hotel_id
                .ok_or_else(|| Error::invalid_request("Hotel ID is required for Admin."))?
        } else {
            staff.home_hotel()?
        };
        let customer = self
            .customers
            .find_by_login(request.customer_name.trim(), request.customer_id)
            .await?
            .ok_or_else(|| {
                Error::invalid_request("Customer ID and Name do not match any existing customer.")
            })?;
        self.rooms
            .find_by_id(request.room_id)
            .await?
            .filter(|room| room.hotel_id == hotel_id)
            .ok_or_else(|| Error::not_found("Room not found in this hotel."))?;

        let walk_in = WalkIn {
            customer_id: customer.id,
            hotel_id,
            room_id: request.room_id,
            employee_id: staff.id,
            stay: request.stay,
            payment: request.payment,
            today: today(self.clock.as_ref()),
        };
        let rental = match self.rentals.create_walk_in(&walk_in).await? {
            RentalOutcome::Rented(rental) => rental,
            RentalOutcome::Rejected(StayRejection::Other(detail)) => {
                return Err(Error::conflict(format!("Rental failed: {detail}")));
            }
            RentalOutcome::Rejected(rejection) => return Err(Error::conflict(rejection.message())),
        };
        info!(rental_id = %rental.id, %hotel_id, employee_id = %staff.id, "walk-in rental registered");
        self.reconciler.reconcile_after_write().await;

        let hotel_name = self
            .hotels
            .find_by_id(hotel_id)
            .await?
            .map_or_else(|| format!("Hotel #{hotel_id}"), |hotel| hotel.name);
        Ok(RentalConfirmation {
            rental,
            customer_name: request.customer_name.trim().to_owned(),
            hotel_name,
        })
    }

    /// Bookings visible to the employee.
    pub async fn bookings(
        &self,
        staff: &StaffPrincipal,
        sort: BookingSort,
    ) -> Result<Vec<BookingListing>, Error> {
        Ok(self.bookings.list(staff.scope(), sort).await?)
    }

    /// Rentals visible to the employee.
    pub async fn rentals(
        &self,
        staff: &StaffPrincipal,
        sort: RentalSort,
    ) -> Result<Vec<RentalListing>, Error> {
        Ok(self.rentals.list(staff.scope(), sort).await?)
    }

    /// Archive and delete a booking.
    pub async fn delete_booking(
        &self,
        staff: &StaffPrincipal,
        booking_id: BookingId,
    ) -> Result<(), Error> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| Error::not_found("Booking not found."))?;
        staff.ensure_hotel(booking.hotel_id, "You can only delete bookings from your own hotel.")?;
        if !self
            .bookings
            .delete_and_archive(booking_id, today(self.clock.as_ref()))
            .await?
        {
            return Err(Error::not_found("Booking not found."));
        }
        info!(%booking_id, employee_id = %staff.id, "booking archived and deleted");
        Ok(())
    }

    /// Archive and delete a rental.
    pub async fn delete_rental(
        &self,
        staff: &StaffPrincipal,
        rental_id: RentalId,
    ) -> Result<(), Error> {
        let rental = self.rental_in_scope(
            staff,
            rental_id,
            "You can only delete rentals from your own hotel.",
        )
        .await?;
        if !self
            .rentals
            .delete_and_archive(rental.id, today(self.clock.as_ref()))
            .await?
        {
            return Err(Error::not_found("Rental not found."));
        }
        info!(%rental_id, employee_id = %staff.id, "rental archived and deleted");
        Ok(())
    }

    /// Record a payment against a rental, dated today.
    pub async fn add_payment(
        &self,
        staff: &StaffPrincipal,
        rental_id: RentalId,
        payment: &Payment,
    ) -> Result<(), Error> {
        self.rental_in_scope(
            staff,
            rental_id,
            "You can only record payments for your own hotel.",
        )
        .await?;
        if !self
            .rentals
            .record_payment(rental_id, payment, today(self.clock.as_ref()))
            .await?
        {
            return Err(Error::not_found("Rental not found."));
        }
        info!(%rental_id, amount = payment.amount(), "payment recorded");
        self.reconciler.reconcile_after_write().await;
        Ok(())
    }

    async fn rental_in_scope(
        &self,
        staff: &StaffPrincipal,
        rental_id: RentalId,
        message: &str,
    ) -> Result<Rental, Error> {
        let rental = self
            .rentals
            .find_by_id(rental_id)
            .await?
            .ok_or_else(|| Error::not_found("Rental not found."))?;
        staff.ensure_hotel(rental.hotel_id, message)?;
        Ok(rental)
    }

    /// Archived bookings visible to the employee.
    pub async fn booking_archive(
        &self,
        staff: &StaffPrincipal,
        sort: BookingArchiveSort,
    ) -> Result<Vec<ArchivedBooking>, Error> {
        Ok(self.bookings.list_archive(staff.scope(), sort).await?)
    }

    /// Archived rentals visible to the employee.
    pub async fn rental_archive(
        &self,
        staff: &StaffPrincipal,
        sort: RentalArchiveSort,
    ) -> Result<Vec<ArchivedRental>, Error> {
        Ok(self.rentals.list_archive(staff.scope(), sort).await?)
    }
}

#[cfg(test)]
#[path = "front_desk_tests.rs"]
mod tests;
