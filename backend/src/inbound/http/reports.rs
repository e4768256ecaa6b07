//! Public aggregate views.
//!
//! ```text
//! GET /view/available-rooms
//! GET /view/room-capacity
//! ```

use actix_web::{HttpResponse, get, web};
use serde_json::json;

use super::ApiResult;
use super::respond::render;
use super::session::SessionContext;
use super::state::HttpState;

/// Available rooms counted per city.
#[get("/view/available-rooms")]
pub async fn available_rooms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let rows = state.reporting.available_rooms_per_city().await?;
    Ok(render(&session, &json!({ "rows": rows })))
}

/// Summed room capacity per hotel.
#[get("/view/room-capacity")]
pub async fn room_capacity(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let rows = state.reporting.total_capacity_per_hotel().await?;
    Ok(render(&session, &json!({ "rows": rows })))
}
