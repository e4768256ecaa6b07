//! Room management (Admin, or Manager within their hotel).
//!
//! ```text
//! GET  /employee/rooms[?sort]
//! GET  /employee/rooms/add
//! POST /employee/rooms/add         room_id, hotel_id, capacity, view_type,
//!                                  extendable, price, status
//! GET  /employee/rooms/edit/{id}
//! POST /employee/rooms/edit/{id}   as above; the room number comes from the path
//! POST /employee/rooms/delete/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, HotelId, Room, RoomCapacity, RoomDraft, RoomId, RoomSort, RoomStatus, StaffPrincipal,
    ViewType,
};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle, settle_form};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const LIST_PATH: &str = "/employee/rooms";
const ADD_PATH: &str = "/employee/rooms/add";

fn edit_path(id: RoomId) -> String {
    format!("{LIST_PATH}/edit/{id}")
}

#[derive(Serialize)]
struct RoomFormView {
    room: Option<Room>,
    hotel_id: Option<HotelId>,
    capacities: &'static [RoomCapacity],
    view_types: &'static [ViewType],
    statuses: &'static [RoomStatus],
}

impl RoomFormView {
    fn new(room: Option<Room>, hotel_id: Option<HotelId>) -> Self {
        Self {
            room,
            hotel_id,
            capacities: RoomCapacity::ALL,
            view_types: ViewType::ALL,
            statuses: RoomStatus::ALL,
        }
    }
}

/// Submitted room record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomForm {
    pub room_id: String,
    pub hotel_id: String,
    pub capacity: String,
    pub view_type: String,
    pub extendable: String,
    pub price: String,
    pub status: String,
}

impl RoomForm {
    /// `fixed_id` pins the room number when editing.
    fn parse(&self, staff: &StaffPrincipal, fixed_id: Option<RoomId>) -> Result<RoomDraft, Error> {
        let id = match fixed_id {
            Some(id) => id,
            None => RoomId::new(forms::int("room_id", &self.room_id)?),
        };
        let hotel_id = forms::optional_int("hotel_id", &self.hotel_id)?
            .map(HotelId::new)
            .or_else(|| staff.hotel_id.filter(|_| !staff.is_admin()))
            .ok_or_else(|| Error::invalid_request("Hotel ID is required."))?;
        RoomDraft::new(
            id,
            hotel_id,
            forms::choice::<RoomCapacity>("capacity", &self.capacity)?,
            forms::choice::<ViewType>("view_type", &self.view_type)?,
            forms::flag(&self.extendable),
            forms::number("price", &self.price)?,
            forms::choice::<RoomStatus>("status", &self.status)?,
        )
    }
}

#[get("/employee/rooms")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = RoomSort::from_key(query.key());
        let rooms = state.rooms.list(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, RoomSort::ALL, &rooms)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/rooms/add")]
pub async fn add_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        staff.require_management()?;
        let hotel_id = staff.hotel_id.filter(|_| !staff.is_admin());
        Ok(render(&session, &RoomFormView::new(None, hotel_id)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[post("/employee/rooms/add")]
pub async fn add(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RoomForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let room = state.rooms.create(&staff, &form.parse(&staff, None)?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Room {} added.", room.id)),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, ADD_PATH, outcome)
}

#[get("/employee/rooms/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = RoomId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let room = state.rooms.get(&staff, id).await?;
        let hotel_id = Some(room.hotel_id);
        Ok(render(&session, &RoomFormView::new(Some(room), hotel_id)))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/rooms/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<RoomForm>,
) -> ApiResult<HttpResponse> {
    let id = RoomId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let draft = form.parse(&staff, Some(id))?;
        state.rooms.update(&staff, id, &draft).await?;
        redirect_with(
            &session,
            Flash::success(format!("Room {id} updated.")),
            LIST_PATH,
        )
    }
    .await;
    settle_form(&session, &edit_path(id), LIST_PATH, outcome)
}

#[post("/employee/rooms/delete/{id}")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = RoomId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.rooms.delete(&staff, id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Room {id} deleted.")),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}
