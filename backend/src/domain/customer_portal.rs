//! Customer-facing use cases: search, booking, history and the catalogue.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::ports::{BookingRepository, HotelRepository, RentalRepository, RoomRepository};
use super::{
    AvailableRoom, BookingConfirmation, BookingId, BookingOutcome, BookingStatus, CatalogueSort,
    CustomerBooking, CustomerRental, Error, Hotel, HotelId, NewBooking, Principal, RoomId,
    SearchCriteria, SearchSort, StayDates, StayRejection, sort_customer_history, today,
};

/// Room and stay a customer asked to book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Room to book.
    pub room_id: RoomId,
    /// Hotel the room belongs to.
    pub hotel_id: HotelId,
    /// Requested stay.
    pub stay: StayDates,
}

/// Search, booking and history for logged-in customers.
#[derive(Clone)]
pub struct CustomerPortalService {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    rentals: Arc<dyn RentalRepository>,
    hotels: Arc<dyn HotelRepository>,
    clock: Arc<dyn Clock>,
}

impl CustomerPortalService {
    /// Create the service.
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        rentals: Arc<dyn RentalRepository>,
        hotels: Arc<dyn HotelRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            bookings,
            rentals,
            hotels,
            clock,
        }
    }

    /// Rooms free for the whole stay, in the requested order.
    pub async fn search(
        &self,
        principal: &Principal,
        criteria: &SearchCriteria,
        sort: SearchSort,
    ) -> Result<Vec<AvailableRoom>, Error> {
        principal.customer()?;
        let mut rooms = self.rooms.search_available(criteria).await?;
        sort.apply(&mut rooms);
        Ok(rooms)
    }

    /// Book a room as Pending, dated today.
    ///
    /// Guard refusals come back as `Conflict` errors whose details name the
    /// rejection.
    pub async fn book(
        &self,
        principal: &Principal,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, Error> {
        let customer = principal.customer()?;
        let today = today(self.clock.as_ref());
        let new_booking = NewBooking {
            customer_id: customer.id,
            hotel_id: request.hotel_id,
            room_id: request.room_id,
            stay: request.stay,
            booking_date: today,
        };
        match self.bookings.create(&new_booking, today).await {
            Ok(BookingOutcome::Booked(booking)) => {
                info!(booking_id = %booking.id, customer_id = %customer.id, "room booked");
                let hotel_name = self.hotel_name(request.hotel_id).await;
                Ok(BookingConfirmation {
                    booking,
                    hotel_name,
                })
            }
            Ok(BookingOutcome::Rejected(rejection)) => Err(rejection_error(&rejection)),
            Err(error) => {
                let rejection = StayRejection::classify(&error.to_string());
                if matches!(rejection, StayRejection::Other(_)) {
                    return Err(error.into());
                }
                Err(rejection_error(&rejection))
            }
        }
    }

    async fn hotel_name(&self, hotel_id: HotelId) -> String {
        match self.hotels.find_by_id(hotel_id).await {
            Ok(Some(hotel)) => hotel.name,
            Ok(None) => "Unknown Hotel".to_owned(),
            Err(error) => {
                warn!(%hotel_id, %error, "hotel lookup after booking failed");
                "Unknown Hotel".to_owned()
            }
        }
    }

    /// Cancel one of the customer's bookings before its check-in day.
    pub async fn cancel(&self, principal: &Principal, booking_id: BookingId) -> Result<(), Error> {
        let customer = principal.customer()?;
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .filter(|booking| booking.customer_id == customer.id)
            .ok_or_else(|| Error::not_found("Booking not found."))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(Error::conflict("This booking is already cancelled."));
        }
        if !booking.can_cancel(today(self.clock.as_ref())) {
            return Err(Error::conflict(
                "You cannot cancel a booking on or after its check-in date.",
            ));
        }
        if !self.bookings.cancel(booking_id).await? {
            return Err(Error::not_found("Booking not found."));
        }
        info!(%booking_id, customer_id = %customer.id, "booking cancelled");
        Ok(())
    }

    /// The customer's bookings, cancelled last, otherwise by check-in.
    pub async fn my_bookings(&self, principal: &Principal) -> Result<Vec<CustomerBooking>, Error> {
        let customer = principal.customer()?;
        let mut rows = self
            .bookings
            .list_for_customer(customer.id, today(self.clock.as_ref()))
            .await?;
        sort_customer_history(&mut rows);
        Ok(rows)
    }

    /// The customer's rentals, latest check-in first.
    pub async fn my_rentings(&self, principal: &Principal) -> Result<Vec<CustomerRental>, Error> {
        let customer = principal.customer()?;
        Ok(self.rentals.list_for_customer(customer.id).await?)
    }

    /// Public hotel catalogue.
    pub async fn catalogue(&self, sort: CatalogueSort) -> Result<Vec<Hotel>, Error> {
        Ok(self.hotels.catalogue(sort).await?)
    }
}

fn rejection_error(rejection: &StayRejection) -> Error {
    let kind = match rejection {
        StayRejection::Overlap => "overlap",
        StayRejection::ActiveLimit => "active_limit",
        StayRejection::UnresolvedProblem => "unresolved_problem",
        StayRejection::Other(_) => "other",
    };
    Error::conflict(rejection.message()).with_details(json!({ "rejection": kind }))
}

#[cfg(test)]
#[path = "customer_portal_tests.rs"]
mod tests;
