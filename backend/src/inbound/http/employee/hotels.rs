//! Hotel management (Admin only).
//!
//! ```text
//! GET  /employee/hotels[?sort]
//! GET  /employee/hotels/add
//! POST /employee/hotels/add         hotel_name, address, chain_id, category,
//!                                   num_rooms, rating
//! GET  /employee/hotels/edit/{id}
//! POST /employee/hotels/edit/{id}
//! POST /employee/hotels/delete/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, Hotel, HotelCategory, HotelChain, HotelChainId, HotelDraft, HotelId, HotelSort,
};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle, settle_form};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const LIST_PATH: &str = "/employee/hotels";
const ADD_PATH: &str = "/employee/hotels/add";

fn edit_path(id: HotelId) -> String {
    format!("{LIST_PATH}/edit/{id}")
}

#[derive(Serialize)]
struct HotelFormView {
    hotel: Option<Hotel>,
    chains: Vec<HotelChain>,
    categories: &'static [HotelCategory],
}

/// Submitted hotel record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HotelForm {
    pub hotel_name: String,
    pub address: String,
    pub chain_id: String,
    pub category: String,
    pub num_rooms: String,
    pub rating: String,
}

impl HotelForm {
    fn parse(&self) -> Result<HotelDraft, Error> {
        HotelDraft::new(
            &self.hotel_name,
            &self.address,
            HotelChainId::new(forms::int("chain_id", &self.chain_id)?),
            forms::choice::<HotelCategory>("category", &self.category)?,
            forms::int("num_rooms", &self.num_rooms)?,
            forms::int("rating", &self.rating)?,
        )
    }
}

#[get("/employee/hotels")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = HotelSort::from_key(query.key());
        let hotels = state.hotels.list(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, HotelSort::ALL, &hotels)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/hotels/add")]
pub async fn add_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let chains = state.hotels.chains(&staff).await?;
        Ok(render(
            &session,
            &HotelFormView {
                hotel: None,
                chains,
                categories: HotelCategory::ALL,
            },
        ))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/hotels/add")]
pub async fn add(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<HotelForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let hotel = state.hotels.create(&staff, &form.parse()?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Hotel \"{}\" added.", hotel.name)),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, ADD_PATH, outcome)
}

#[get("/employee/hotels/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = HotelId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let hotel = state.hotels.get(&staff, id).await?;
        let chains = state.hotels.chains(&staff).await?;
        Ok(render(
            &session,
            &HotelFormView {
                hotel: Some(hotel),
                chains,
                categories: HotelCategory::ALL,
            },
        ))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/hotels/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<HotelForm>,
) -> ApiResult<HttpResponse> {
    let id = HotelId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.hotels.update(&staff, id, &form.parse()?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Hotel #{id} updated.")),
            LIST_PATH,
        )
    }
    .await;
    settle_form(&session, &edit_path(id), LIST_PATH, outcome)
}

/// Refused while bookings or rentals still reference the hotel.
#[post("/employee/hotels/delete/{id}")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = HotelId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.hotels.delete(&staff, id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Hotel #{id} deleted.")),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn form() -> HotelForm {
        HotelForm {
            hotel_name: "Harbour View".to_owned(),
            address: "9 Quay Rd, Halifax".to_owned(),
            chain_id: "1".to_owned(),
            category: "Resort".to_owned(),
            num_rooms: "40".to_owned(),
            rating: "4".to_owned(),
        }
    }

    #[test]
    fn well_formed_hotels_parse() {
        form().parse().expect("valid form");
    }

    #[rstest]
    #[case(HotelForm { category: "Motel".to_owned(), ..form() })]
    #[case(HotelForm { num_rooms: "forty".to_owned(), ..form() })]
    #[case(HotelForm { chain_id: String::new(), ..form() })]
    #[case(HotelForm { hotel_name: " ".to_owned(), ..form() })]
    fn malformed_hotels_are_invalid(#[case] submitted: HotelForm) {
        let err = submitted.parse().expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
