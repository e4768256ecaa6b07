//! Page and redirect responses.
//!
//! Every handler ends in one of two shapes: a JSON page carrying the view
//! model plus the drained flashes, or a `303 See Other` with a flash queued
//! in the session. [`settle`] folds domain errors into the second shape:
//!
//! - `InvalidRequest`, `Conflict` and `NotFound` go back to the form or list
//! - `Unauthorized` goes to the login page
//! - `Forbidden` goes to the principal's landing page
//! - `ServiceUnavailable` and `InternalError` propagate to the server error
//!   handler

use actix_web::HttpResponse;
use actix_web::http::header;
use serde::Serialize;

use crate::domain::{Error, ErrorCode, Principal};

use super::ApiResult;
use super::flash::Flash;
use super::session::SessionContext;

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const CUSTOMER_HOME: &str = "/customer/bookings";
pub(crate) const STAFF_HOME: &str = "/employee/dashboard";

#[derive(Serialize)]
struct Page<'a, T: Serialize> {
    flashes: &'a [Flash],
    #[serde(flatten)]
    view: &'a T,
}

/// Render `view` as a page, draining pending flashes into it.
pub(crate) fn render<T: Serialize>(session: &SessionContext, view: &T) -> HttpResponse {
    let flashes = session.take_flashes();
    HttpResponse::Ok().json(Page {
        flashes: &flashes,
        view,
    })
}

/// Bare `303 See Other`.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Queue `flash` then redirect to `location`.
pub(crate) fn redirect_with(
    session: &SessionContext,
    flash: Flash,
    location: &str,
) -> ApiResult<HttpResponse> {
    session.push_flash(flash)?;
    Ok(see_other(location))
}

/// Where a principal lands after login or a refused action.
pub(crate) fn landing(principal: Option<&Principal>) -> &'static str {
    match principal {
        Some(Principal::Customer(_)) => CUSTOMER_HOME,
        Some(Principal::Employee(_)) => STAFF_HOME,
        None => LOGIN_PATH,
    }
}

/// Finish a handler, turning user-facing errors into a flash and redirect.
///
/// `back` is the form or list the user acted from.
pub(crate) fn settle(
    session: &SessionContext,
    back: &str,
    outcome: ApiResult<HttpResponse>,
) -> ApiResult<HttpResponse> {
    settle_form(session, back, back, outcome)
}

/// Like [`settle`], but a missing record sends the user to `list` rather
/// than back to the form.
pub(crate) fn settle_form(
    session: &SessionContext,
    form: &str,
    list: &str,
    outcome: ApiResult<HttpResponse>,
) -> ApiResult<HttpResponse> {
    let error = match outcome {
        Ok(response) => return Ok(response),
        Err(error) => error,
    };
    let target = match error.code() {
        ErrorCode::InvalidRequest | ErrorCode::Conflict => form,
        ErrorCode::NotFound => list,
        ErrorCode::Unauthorized => LOGIN_PATH,
        ErrorCode::Forbidden => landing(session.principal().ok().flatten().as_ref()),
        ErrorCode::ServiceUnavailable | ErrorCode::InternalError => return Err(error),
    };
    redirect_with(session, flash_for(&error), target)
}

fn flash_for(error: &Error) -> Flash {
    Flash::error(error.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerId, CustomerPrincipal};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(Error::invalid_request("Price cannot be negative."), "/employee/rooms/add")]
    #[case(Error::conflict("Room taken."), "/employee/rooms/add")]
    #[case(Error::not_found("Room not found."), "/employee/rooms/add")]
    #[case(Error::unauthorized("Please log in first."), LOGIN_PATH)]
    #[case(Error::forbidden("Access denied."), LOGIN_PATH)]
    #[actix_web::test]
    async fn user_facing_errors_redirect(#[case] error: Error, #[case] expected: &'static str) {
        let app = actix_test::init_service(App::new().wrap(test_session_middleware()).route(
            "/act",
            web::post().to(move |session: SessionContext| {
                let error = error.clone();
                async move { settle(&session, "/employee/rooms/add", Err(error)) }
            }),
        ))
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::post().uri("/act").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(expected)
        );
    }

    #[rstest]
    #[case(Error::invalid_request("Rating must be between 1 and 5."), "/employee/hotels/edit/4")]
    #[case(Error::not_found("Hotel not found."), "/employee/hotels")]
    #[actix_web::test]
    async fn missing_records_fall_back_to_the_list(
        #[case] error: Error,
        #[case] expected: &'static str,
    ) {
        let app = actix_test::init_service(App::new().wrap(test_session_middleware()).route(
            "/act",
            web::post().to(move |session: SessionContext| {
                let error = error.clone();
                async move {
                    settle_form(&session, "/employee/hotels/edit/4", "/employee/hotels", Err(error))
                }
            }),
        ))
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::post().uri("/act").to_request())
            .await;
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(expected)
        );
    }

    #[actix_web::test]
    async fn server_errors_propagate() {
        let app = actix_test::init_service(App::new().wrap(test_session_middleware()).route(
            "/act",
            web::post().to(|session: SessionContext| async move {
                settle(&session, "/", Err(Error::service_unavailable("db down")))
            }),
        ))
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::post().uri("/act").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn forbidden_customers_land_on_their_bookings() {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::post().to(|session: SessionContext| async move {
                        session.persist_principal(&Principal::Customer(CustomerPrincipal {
                            id: CustomerId::new(12),
                            name: "Ann Lee".to_owned(),
                        }))?;
                        Ok::<_, Error>(see_other("/"))
                    }),
                )
                .route(
                    "/act",
                    web::post().to(|session: SessionContext| async move {
                        settle(&session, "/", Err(Error::forbidden("Access denied.")))
                    }),
                )
                .route(
                    "/page",
                    web::get().to(|session: SessionContext| async move {
                        render(&session, &json!({ "title": "Bookings" }))
                    }),
                ),
        )
        .await;
        let login =
            actix_test::call_service(&app, actix_test::TestRequest::post().uri("/login").to_request()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/act")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(CUSTOMER_HOME)
        );

        let page = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/page")
                .cookie(session_cookie(&res))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(page).await;
        assert_eq!(body["title"], "Bookings");
        assert_eq!(body["flashes"][0]["message"], "Access denied.");
    }
}
