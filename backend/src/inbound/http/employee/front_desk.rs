//! Front-desk handlers: dashboard, check-in, walk-ins, bookings and rentals.
//!
//! ```text
//! GET  /employee/dashboard
//! POST /employee/convert-booking          booking_id
//! GET  /employee/rent-room
//! POST /employee/rent-room                customer_id, customer_name, room_id,
//!                                         checkin, checkout, payment_amount,
//!                                         payment_method, hotel_id
//! GET  /employee/bookings[?sort]
//! GET  /employee/bookings/archive[?sort]
//! POST /employee/bookings/delete/{id}
//! GET  /employee/rentals[?sort]
//! GET  /employee/rentals/archive[?sort]
//! POST /employee/rentals/delete/{id}
//! POST /employee/rentals/payment          rental_id, payment_amount, payment_method
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    BookingArchiveSort, BookingId, BookingListing, BookingSort, CustomerId, Error, HotelId,
    Payment, RentForm, RentalArchiveSort, RentalId, RentalSort, RoomId, StaffPrincipal,
    StayDates, WalkInRequest,
};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const RENT_PATH: &str = "/employee/rent-room";
const BOOKINGS_PATH: &str = "/employee/bookings";
const RENTALS_PATH: &str = "/employee/rentals";

#[derive(Serialize)]
struct DashboardView<'a> {
    employee: &'a StaffPrincipal,
    #[serde(rename = "bookings")]
    upcoming: Vec<BookingListing>,
}

/// Upcoming bookings awaiting check-in.
#[get("/employee/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let upcoming = state.front_desk.dashboard(&staff).await?;
        Ok(render(
            &session,
            &DashboardView {
                employee: &staff,
                upcoming,
            },
        ))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

/// Submitted check-in.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConvertForm {
    pub booking_id: String,
}

#[post("/employee/convert-booking")]
pub async fn convert_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ConvertForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let booking_id = BookingId::new(forms::int("booking_id", &form.booking_id)?);
        let rental = state.front_desk.convert_booking(&staff, booking_id).await?;
        redirect_with(
            &session,
            Flash::success(format!(
                "Booking #{booking_id} converted to rental #{}.",
                rental.id
            )),
            STAFF_HOME,
        )
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/rent-room")]
pub async fn rent_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let form: RentForm = state.front_desk.rent_form(&staff);
        Ok(render(&session, &form))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

/// Submitted walk-in rental.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RentRoomForm {
    pub customer_id: String,
    pub customer_name: String,
    pub room_id: String,
    pub checkin: String,
    pub checkout: String,
    pub payment_amount: String,
    pub payment_method: String,
    pub hotel_id: String,
}

impl RentRoomForm {
    fn parse(&self) -> Result<WalkInRequest, Error> {
        Ok(WalkInRequest {
            customer_id: CustomerId::new(forms::int("customer_id", &self.customer_id)?),
            customer_name: self.customer_name.clone(),
            room_id: RoomId::new(forms::int("room_id", &self.room_id)?),
            stay: StayDates::new(
                forms::date("checkin", &self.checkin)?,
                forms::date("checkout", &self.checkout)?,
            )?,
            payment: Payment::new(
                forms::number("payment_amount", &self.payment_amount)?,
                &self.payment_method,
            )?,
            hotel_id: forms::optional_int("hotel_id", &self.hotel_id)?.map(HotelId::new),
        })
    }
}

/// Register a walk-in rental and show the receipt.
#[post("/employee/rent-room")]
pub async fn rent_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RentRoomForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let confirmation = state.front_desk.rent_room(&staff, form.parse()?).await?;
        session.push_flash(Flash::success("Room rented successfully!"))?;
        Ok(render(&session, &confirmation))
    }
    .await;
    settle(&session, RENT_PATH, outcome)
}

#[get("/employee/bookings")]
pub async fn bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = BookingSort::from_key(query.key());
        let listed = state.front_desk.bookings(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, BookingSort::ALL, &listed)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/bookings/archive")]
pub async fn booking_archive(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = BookingArchiveSort::from_key(query.key());
        let archived = state.front_desk.booking_archive(&staff, sort).await?;
        Ok(render(
            &session,
            &ListView::new(sort, BookingArchiveSort::ALL, &archived),
        ))
    }
    .await;
    settle(&session, BOOKINGS_PATH, outcome)
}

/// Archive then delete a booking.
#[post("/employee/bookings/delete/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let booking_id = BookingId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.front_desk.delete_booking(&staff, booking_id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Booking #{booking_id} archived and deleted.")),
            BOOKINGS_PATH,
        )
    }
    .await;
    settle(&session, BOOKINGS_PATH, outcome)
}

#[get("/employee/rentals")]
pub async fn rentals(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = RentalSort::from_key(query.key());
        let listed = state.front_desk.rentals(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, RentalSort::ALL, &listed)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/rentals/archive")]
pub async fn rental_archive(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = RentalArchiveSort::from_key(query.key());
        let archived = state.front_desk.rental_archive(&staff, sort).await?;
        Ok(render(
            &session,
            &ListView::new(sort, RentalArchiveSort::ALL, &archived),
        ))
    }
    .await;
    settle(&session, RENTALS_PATH, outcome)
}

/// Archive then delete a rental.
#[post("/employee/rentals/delete/{id}")]
pub async fn delete_rental(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let rental_id = RentalId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.front_desk.delete_rental(&staff, rental_id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Rental #{rental_id} archived and deleted.")),
            RENTALS_PATH,
        )
    }
    .await;
    settle(&session, RENTALS_PATH, outcome)
}

/// Submitted payment against a rental.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub rental_id: String,
    pub payment_amount: String,
    pub payment_method: String,
}

impl PaymentForm {
    fn parse(&self) -> Result<(RentalId, Payment), Error> {
        let rental_id = RentalId::new(forms::int("rental_id", &self.rental_id)?);
        let payment = Payment::new(
            forms::number("payment_amount", &self.payment_amount)?,
            &self.payment_method,
        )?;
        Ok((rental_id, payment))
    }
}

#[post("/employee/rentals/payment")]
pub async fn add_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<PaymentForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let (rental_id, payment) = form.parse()?;
        state.front_desk.add_payment(&staff, rental_id, &payment).await?;
        redirect_with(
            &session,
            Flash::success(format!("Payment recorded for rental #{rental_id}.")),
            RENTALS_PATH,
        )
    }
    .await;
    settle(&session, RENTALS_PATH, outcome)
}
