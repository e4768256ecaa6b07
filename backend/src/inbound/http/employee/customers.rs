//! Customer management (Admin only).
//!
//! ```text
//! GET  /employee/customers[?sort]
//! GET  /employee/customers/add
//! POST /employee/customers/add         full_name, address, id_type, id_number,
//!                                      registration_date
//! GET  /employee/customers/edit/{id}
//! POST /employee/customers/edit/{id}
//! POST /employee/customers/delete/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{CustomerDraft, CustomerId, CustomerSort, Error};

use super::super::ApiResult;
use super::super::flash::Flash;
use super::super::forms::{self, SortQuery};
use super::super::respond::{STAFF_HOME, redirect_with, render, settle, settle_form};
use super::super::session::SessionContext;
use super::super::state::HttpState;
use super::{ListView, signed_in_staff};

const LIST_PATH: &str = "/employee/customers";
const ADD_PATH: &str = "/employee/customers/add";

fn edit_path(id: CustomerId) -> String {
    format!("{LIST_PATH}/edit/{id}")
}

/// Submitted customer record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub full_name: String,
    pub address: String,
    pub id_type: String,
    pub id_number: String,
    pub registration_date: String,
}

impl CustomerForm {
    fn parse(&self) -> Result<CustomerDraft, Error> {
        CustomerDraft::new(
            &self.full_name,
            &self.address,
            &self.id_type,
            &self.id_number,
            forms::date("registration_date", &self.registration_date)?,
        )
    }
}

#[get("/employee/customers")]
pub async fn list(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let sort = CustomerSort::from_key(query.key());
        let customers = state.customers.list(&staff, sort).await?;
        Ok(render(&session, &ListView::new(sort, CustomerSort::ALL, &customers)))
    }
    .await;
    settle(&session, STAFF_HOME, outcome)
}

#[get("/employee/customers/add")]
pub async fn add_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.customers.authorize(&staff)?;
        Ok(render(&session, &json!({ "customer": null })))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/customers/add")]
pub async fn add(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CustomerForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let customer = state.customers.create(&staff, &form.parse()?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Customer #{} added.", customer.id)),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, ADD_PATH, outcome)
}

#[get("/employee/customers/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = CustomerId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        let customer = state.customers.get(&staff, id).await?;
        Ok(render(&session, &json!({ "customer": customer })))
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}

#[post("/employee/customers/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<CustomerForm>,
) -> ApiResult<HttpResponse> {
    let id = CustomerId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.customers.update(&staff, id, &form.parse()?).await?;
        redirect_with(
            &session,
            Flash::success(format!("Customer #{id} updated.")),
            LIST_PATH,
        )
    }
    .await;
    settle_form(&session, &edit_path(id), LIST_PATH, outcome)
}

#[post("/employee/customers/delete/{id}")]
pub async fn delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = CustomerId::new(path.into_inner());
    let outcome = async {
        let staff = signed_in_staff(&session)?;
        state.customers.delete(&staff, id).await?;
        redirect_with(
            &session,
            Flash::success(format!("Customer #{id} deleted.")),
            LIST_PATH,
        )
    }
    .await;
    settle(&session, LIST_PATH, outcome)
}
