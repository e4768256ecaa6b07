//! Room problem reports (Admin, or Manager within their hotel).
//!
//! ```text
//! GET  /employee/problems[?sort]
//! GET  /employee/problems/add
//! POST /employee/problems/add         hotel_id, room_id, problem, report_date
//! GET  /employee/problems/edit/{id}
//! POST /employee/problems/edit/{id}   problem, report_date, resolved
//! POST /employee/problems/delete/{id}
//! ```
//!
//! Blank hotel and date fields on a new report take the form defaults.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, HotelId, ProblemEdit, ProblemForm, ProblemId, ProblemReport, ProblemSort, RoomId,
    RoomProblem,
};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle, settle_form};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const LIST_PATH: &str = "/employee/problems";
const ADD_PATH: &str = "/employee/problems/add";

fn edit_path(id: ProblemId) -> String {
    format!("{LIST_PATH}/edit/{id}")
}

/// Submitted new report.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub hotel_id: String,
    pub room_id: String,
    pub problem: String,
    pub report_date: String,
}

impl ReportForm {
    fn parse(&self, defaults: ProblemForm) -> Result<ProblemReport, Error> {
        let hotel_id = forms::optional_int("hotel_id", &self.hotel_id)?
            .map(HotelId::new)
            .or(defaults.hotel_id)
            .ok_or_else(|| Error::invalid_request("Hotel ID is required."))?;
        let report_date = if self.report_date.trim().is_empty() {
            defaults.report_date
        } else {
            forms::date("report_date", &self.report_date)?
        };
        Ok(ProblemReport {
            hotel_id,
            room_id: RoomId::new(forms::int("room_id", &self.room_id)?),
            problem: self.problem.clone(),
            report_date,
        })
    }
}

/// Submitted edit.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditForm {
    pub problem: String,
    pub report_date: String,
    pub resolved: String,
}

impl EditForm {
    fn parse(&self) -> Result<ProblemEdit, Error> {
        Ok(ProblemEdit {
            problem: self.problem.clone(),
            report_date: forms::date("report_date", &self.report_date)?,
            resolved: forms::flag(&self.resolved),
        })
    }
}

#[derive(Serialize)]
struct EditView {
    problem: RoomProblem,
}

#[get("/employee/problems")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = ProblemSort::from_key(query.key());
        let problems = state.problems.list(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, ProblemSort::ALL, &problems)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/problems/add")]
pub async fn add_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let defaults = state.problems.form(&staff)?;
        Ok(render(&session, &defaults))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[post("/employee/problems/add")]
pub async fn add(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ReportForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let report = form.parse(state.problems.form(&staff)?)?;
        let problem = state.problems.create(&staff, &report).await?;
        redirect_with(
            &session,
            Flash::success(format!(
                "Problem #{} reported for room {}.",
                problem.id, problem.room_id
            )),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, ADD_PATH, outcome)
}

#[get("/employee/problems/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = ProblemId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let problem = state.problems.get(&staff, id).await?;
        Ok(render(&session, &EditView { problem }))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/problems/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<EditForm>,
) -> ApiResult<HttpResponse> {
    let id = ProblemId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.problems.update(&staff, id, &form.parse()?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Problem #{id} updated.")),
            LIST_PATH,
        )
    }
    .await;
    settle_form(&session, &edit_path(id), LIST_PATH, outcome)
}

#[post("/employee/problems/delete/{id}")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = ProblemId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.problems.delete(&staff, id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Problem #{id} deleted.")),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    fn report(hotel_id: &str, report_date: &str) -> ReportForm {
        ReportForm {
            hotel_id: hotel_id.to_owned(),
            room_id: "101".to_owned(),
            problem: "Leaking tap".to_owned(),
            report_date: report_date.to_owned(),
        }
    }

    #[test]
    fn blanks_take_the_form_defaults() {
        let defaults = ProblemForm {
            hotel_id: Some(HotelId::new(3)),
            report_date: day(10),
        };
        let parsed = report("", "").parse(defaults).expect("valid form");
        assert_eq!(parsed.hotel_id, HotelId::new(3));
        assert_eq!(parsed.report_date, day(10));
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let defaults = ProblemForm {
            hotel_id: Some(HotelId::new(3)),
            report_date: day(10),
        };
        let parsed = report("5", "2025-06-02").parse(defaults).expect("valid form");
        assert_eq!(parsed.hotel_id, HotelId::new(5));
        assert_eq!(parsed.report_date, day(2));
    }

    #[test]
    fn admins_must_pick_a_hotel() {
        let defaults = ProblemForm {
            hotel_id: None,
            report_date: day(10),
        };
        assert_eq!(
            report("", "").parse(defaults).expect_err("rejected").message(),
            "Hotel ID is required."
        );
    }

    #[test]
    fn resolved_is_a_literal_flag() {
        let submitted = EditForm {
            problem: "Fixed".to_owned(),
            report_date: "2025-06-02".to_owned(),
            resolved: "true".to_owned(),
        };
        assert!(submitted.parse().expect("valid form").resolved);
    }
}
