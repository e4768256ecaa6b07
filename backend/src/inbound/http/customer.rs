//! Customer portal handlers: search, booking, cancellation and history.
//!
//! ```text
//! GET  /customer/search          checkin, checkout, capacity, area, chain,
//!                                category, price, minrooms, viewtype, sort
//! POST /customer/book            room_id, hotel_id, checkin, checkout
//! POST /customer/cancel-booking  booking_id
//! GET  /customer/bookings
//! GET  /customer/rentings
//! GET  /customer/hotels?sort
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AvailableRoom, BookingId, BookingRequest, CatalogueSort, Error, HotelCategory, HotelId,
    Principal, RoomCapacity, RoomId, SearchCriteria, SearchFilters, SearchSort, StayDates,
    ViewType,
};

use super::ApiResult;
use super::flash::Flash;
use super::forms::{self, SortQuery};
use super::respond::{CUSTOMER_HOME, redirect_with, render, settle};
use super::session::SessionContext;
use super::state::HttpState;

const SEARCH_PATH: &str = "/customer/search";

fn signed_in_customer(session: &SessionContext) -> Result<Principal, Error> {
    let principal = session.require_principal()?;
    principal.customer()?;
    Ok(principal)
}

/// Raw search query; echoed back so the form keeps its values.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchQuery {
    pub checkin: String,
    pub checkout: String,
    pub capacity: String,
    pub area: String,
    pub chain: String,
    pub category: String,
    #[serde(rename = "price")]
    pub max_price: String,
    #[serde(rename = "minrooms")]
    pub min_rooms: String,
    #[serde(rename = "viewtype")]
    pub view_type: String,
    pub sort: String,
}

impl SearchQuery {
    fn has_dates(&self) -> bool {
        !self.checkin.trim().is_empty() && !self.checkout.trim().is_empty()
    }

    fn stay(&self) -> Result<StayDates, Error> {
        StayDates::new(
            forms::date("checkin", &self.checkin)?,
            forms::date("checkout", &self.checkout)?,
        )
    }

    fn filters(&self) -> Result<SearchFilters, Error> {
        Ok(SearchFilters {
            capacity: forms::optional_choice::<RoomCapacity>("capacity", &self.capacity)?,
            area: forms::optional_text(&self.area),
            chain: forms::optional_text(&self.chain),
            category: forms::optional_choice::<HotelCategory>("category", &self.category)?,
            max_price: forms::optional_number("price", &self.max_price)?,
            min_rooms: forms::optional_int("minrooms", &self.min_rooms)?,
            view_type: forms::optional_choice::<ViewType>("viewtype", &self.view_type)?,
        })
    }
}

#[derive(Serialize)]
struct SearchView<'a> {
    query: &'a SearchQuery,
    sort: SearchSort,
    sort_options: &'static [SearchSort],
    capacities: &'static [RoomCapacity],
    categories: &'static [HotelCategory],
    view_types: &'static [ViewType],
    rooms: Vec<AvailableRoom>,
    error: Option<String>,
}

/// Availability search; without both dates the page is empty.
#[get("/customer/search")]
pub async fn search(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let principal = signed_in_customer(&session)?;
        let sort = SearchSort::from_key(Some(&query.sort));
        let mut view = SearchView {
            query: &query,
            sort,
            sort_options: SearchSort::ALL,
            capacities: RoomCapacity::ALL,
            categories: HotelCategory::ALL,
            view_types: ViewType::ALL,
            rooms: Vec::new(),
            error: None,
        };
        if query.has_dates() {
            match query.stay() {
                Ok(stay) => {
                    let criteria = SearchCriteria {
                        stay,
                        filters: query.filters()?,
                    };
                    view.rooms = state.portal.search(&principal, &criteria, sort).await?;
                }
                Err(error) => view.error = Some(error.message().to_owned()),
            }
        }
        Ok(render(&session, &view))
    }
    .await;
    settle(&session, SEARCH_PATH, outcome)
}

/// Submitted booking.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub room_id: String,
    pub hotel_id: String,
    pub checkin: String,
    pub checkout: String,
}

impl BookForm {
    fn parse(&self) -> Result<BookingRequest, Error> {
        Ok(BookingRequest {
            room_id: RoomId::new(forms::int("room_id", &self.room_id)?),
            hotel_id: HotelId::new(forms::int("hotel_id", &self.hotel_id)?),
            stay: StayDates::new(
                forms::date("checkin", &self.checkin)?,
                forms::date("checkout", &self.checkout)?,
            )?,
        })
    }
}

/// Book a room and show the confirmation.
#[post("/customer/book")]
pub async fn book(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<BookForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let principal = signed_in_customer(&session)?;
        let confirmation = state.portal.book(&principal, &form.parse()?).await?;
        session.push_flash(Flash::success("Room booked successfully!"))?;
        Ok(render(&session, &confirmation))
    }
    .await;
    settle(&session, SEARCH_PATH, outcome)
}

/// Submitted cancellation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CancelForm {
    pub booking_id: String,
}

#[post("/customer/cancel-booking")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CancelForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let principal = signed_in_customer(&session)?;
        let booking_id = BookingId::new(forms::int("booking_id", &form.booking_id)?);
        state.portal.cancel(&principal, booking_id).await?;
        redirect_with(
            &session,
            Flash::success("Booking cancelled successfully."),
            CUSTOMER_HOME,
        )
    }
    .await;
    settle(&session, CUSTOMER_HOME, outcome)
}

#[get("/customer/bookings")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let principal = signed_in_customer(&session)?;
        let bookings = state.portal.my_bookings(&principal).await?;
        Ok(render(
            &session,
            &serde_json::json!({ "customer": principal.name(), "bookings": bookings }),
        ))
    }
    .await;
    settle(&session, SEARCH_PATH, outcome)
}

#[get("/customer/rentings")]
pub async fn my_rentings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let principal = signed_in_customer(&session)?;
        let rentals = state.portal.my_rentings(&principal).await?;
        Ok(render(
            &session,
            &serde_json::json!({ "customer": principal.name(), "rentals": rentals }),
        ))
    }
    .await;
    settle(&session, CUSTOMER_HOME, outcome)
}

/// Public hotel catalogue.
#[get("/customer/hotels")]
pub async fn hotels(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let sort = CatalogueSort::from_key(query.key());
    let outcome = async {
        let listed = state.portal.catalogue(sort).await?;
        Ok(render(
            &session,
            &serde_json::json!({
                "sort": sort,
                "sort_options": CatalogueSort::ALL,
                "hotels": listed,
            }),
        ))
    }
    .await;
    settle(&session, CUSTOMER_HOME, outcome)
}
