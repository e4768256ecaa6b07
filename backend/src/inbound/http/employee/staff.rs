//! Employee management (Admin, or Manager within their hotel).
//!
//! ```text
//! GET  /employee/employees[?sort]
//! GET  /employee/employees/add
//! POST /employee/employees/add         full_name, address, position, ssn, hotel_id
//! GET  /employee/employees/edit/{id}
//! POST /employee/employees/edit/{id}
//! POST /employee/employees/delete/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Employee, EmployeeDraft, EmployeeId, EmployeeSort, Error, HotelId, Position, StaffPrincipal,
};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle, settle_form};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const LIST_PATH: &str = "/employee/employees";
const ADD_PATH: &str = "/employee/employees/add";

fn edit_path(id: EmployeeId) -> String {
    format!("{LIST_PATH}/edit/{id}")
}

/// Positions the actor may hand out.
fn assignable(staff: &StaffPrincipal) -> &'static [Position] {
    if staff.is_admin() {
        Position::ALL
    } else {
        &[Position::Receptionist]
    }
}

#[derive(Serialize)]
struct EmployeeFormView<'a> {
    employee: Option<&'a Employee>,
    positions: &'a [Position],
    hotel_id: Option<HotelId>,
}

/// Submitted employee record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub full_name: String,
    pub address: String,
    pub position: String,
    pub ssn: String,
    pub hotel_id: String,
}

impl EmployeeForm {
    /// A blank hotel means the actor's own, except for Admins.
    fn parse(&self, staff: &StaffPrincipal) -> Result<EmployeeDraft, Error> {
        let hotel_id = forms::optional_int("hotel_id", &self.hotel_id)?
            .map(HotelId::new)
            .or_else(|| staff.hotel_id.filter(|_| !staff.is_admin()))
            .ok_or_else(|| Error::invalid_request("Hotel ID is required."))?;
        EmployeeDraft::new(
            &self.full_name,
            &self.address,
            forms::choice::<Position>("position", &self.position)?,
            &self.ssn,
            hotel_id,
        )
    }
}

#[get("/employee/employees")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = EmployeeSort::from_key(query.key());
        let employees = state.staff.list(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, EmployeeSort::ALL, &employees)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/employees/add")]
pub async fn add_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        staff.require_management()?;
        Ok(render(
            &session,
            &EmployeeFormView {
                employee: None,
                positions: assignable(&staff),
                hotel_id: staff.hotel_id.filter(|_| !staff.is_admin()),
            },
        ))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[post("/employee/employees/add")]
pub async fn add(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<EmployeeForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let employee = state.staff.create(&staff, &form.parse(&staff)?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Employee #{} added.", employee.id)),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, ADD_PATH, outcome)
}

#[get("/employee/employees/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = EmployeeId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let employee = state.staff.get(&staff, id).await?;
        let positions = if employee.id == staff.id {
            std::slice::from_ref(&staff.position)
        } else {
            assignable(&staff)
        };
        Ok(render(
            &session,
            &EmployeeFormView {
                employee: Some(&employee),
                positions,
                hotel_id: Some(employee.hotel_id),
            },
        ))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/employees/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<EmployeeForm>,
) -> ApiResult<HttpResponse> {
    let id = EmployeeId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.staff.update(&staff, id, &form.parse(&staff)?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Employee #{id} updated.")),
            LIST_PATH,
        )
    }
    .await;
    settle_form(&session, &edit_path(id), LIST_PATH, outcome)
}

#[post("/employee/employees/delete/{id}")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = EmployeeId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.staff.delete(&staff, id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Employee #{id} deleted.")),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn actor(position: Position) -> StaffPrincipal {
        StaffPrincipal {
            id: EmployeeId::new(1),
            name: "Dana Fox".to_owned(),
            position,
            hotel_id: Some(HotelId::new(3)),
        }
    }

    fn form(hotel_id: &str) -> EmployeeForm {
        EmployeeForm {
            full_name: "Sam Roe".to_owned(),
            address: "2 Oak Ave, Ottawa".to_owned(),
            position: "Receptionist".to_owned(),
            ssn: "123-45-678".to_owned(),
            hotel_id: hotel_id.to_owned(),
        }
    }

    #[test]
    fn managers_default_to_their_own_hotel() {
        let draft = form("").parse(&actor(Position::Manager)).expect("valid form");
        assert_eq!(draft.hotel_id(), HotelId::new(3));
    }

    #[test]
    fn admins_must_name_a_hotel() {
        let err = form("").parse(&actor(Position::Admin)).expect_err("rejected");
        assert_eq!(err.message(), "Hotel ID is required.");
        let draft = form("5").parse(&actor(Position::Admin)).expect("valid form");
        assert_eq!(draft.hotel_id(), HotelId::new(5));
    }

    #[rstest]
    #[case(Position::Admin, 3)]
    #[case(Position::Manager, 1)]
    fn assignable_positions_follow_rank(#[case] position: Position, #[case] expected: usize) {
        assert_eq!(assignable(&actor(position)).len(), expected);
    }
}
