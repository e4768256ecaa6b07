//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic. Errors that handlers
//! do not turn into a flash-and-redirect themselves fall through to
//! [`ResponseError`], which renders a redacted JSON payload; server-side
//! failures are then caught by [`redirect_server_errors`] and sent back to
//! the referring page with a flash.

use actix_session::SessionExt;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::flash::Flash;
use super::session::SessionContext;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Flash text for a server-side failure. Internal details stay in the logs.
fn failure_flash(response_error: Option<&actix_web::Error>) -> Flash {
    let Some(domain) = response_error.and_then(|err| err.as_error::<Error>()) else {
        return Flash::error(GENERIC_FAILURE);
    };
    match (domain.code(), domain.trace_id()) {
        (ErrorCode::ServiceUnavailable, _) => Flash::error(format!(
            "The service is temporarily unavailable: {}",
            domain.message()
        )),
        (_, Some(trace_id)) => Flash::error(format!("{GENERIC_FAILURE} (reference {trace_id})")),
        (_, None) => Flash::error(GENERIC_FAILURE),
    }
}

fn back_target(res: &ServiceResponse<impl MessageBody>) -> String {
    res.request()
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("/")
        .to_owned()
}

fn flash_and_go_back<B: MessageBody>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let flash = failure_flash(res.response().error());
    let target = back_target(&res);
    warn!(status = %res.status(), path = %res.request().path(), "server error redirected back");
    let session = SessionContext::new(res.request().get_session());
    if let Err(error) = session.push_flash(flash) {
        warn!(%error, "failed to queue failure flash");
    }
    let (req, _) = res.into_parts();
    let redirect = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target))
        .finish();
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, redirect).map_into_right_body(),
    ))
}

/// Middleware turning 5xx responses into a flash plus a redirect to the
/// Referer, or to `/` when there is none.
///
/// Must sit inside the session middleware so the flash is persisted.
pub fn redirect_server_errors<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler_server(flash_and_go_back)
}
