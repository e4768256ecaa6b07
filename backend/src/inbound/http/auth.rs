//! Login, registration and logout handlers.
//!
//! ```text
//! GET  /                redirect to the login page
//! GET  /auth/login      login form
//! POST /auth/login      user_type, full_name, user_id, password, position
//! GET  /auth/register   registration form
//! POST /auth/register   full_name, address, id_type, id_number
//! GET  /auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, LoginRequest, Position, RegistrationRequest, UserType};

use super::ApiResult;
use super::flash::Flash;
use super::forms;
use super::respond::{LOGIN_PATH, landing, redirect_with, render, see_other, settle};
use super::session::SessionContext;
use super::state::HttpState;

const REGISTER_PATH: &str = "/auth/register";

/// Submitted login form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub user_type: String,
    pub full_name: String,
    pub user_id: String,
    pub password: String,
    pub position: String,
}

impl LoginForm {
    fn parse(&self) -> Result<LoginRequest, Error> {
        let user_type = match self.user_type.trim() {
            "customer" => UserType::Customer,
            "employee" => UserType::Employee,
            _ => return Err(Error::invalid_request("Invalid input")),
        };
        let position = match user_type {
            UserType::Customer => None,
            UserType::Employee => forms::optional_choice::<Position>("position", &self.position)?,
        };
        Ok(LoginRequest {
            user_type,
            full_name: self.full_name.clone(),
            user_id: forms::int("user_id", &self.user_id)?,
            password: self.password.clone(),
            position,
        })
    }
}

/// Submitted registration form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub full_name: String,
    pub address: String,
    pub id_type: String,
    pub id_number: String,
}

#[derive(Serialize)]
struct LoginView {
    user_types: [&'static str; 2],
    positions: &'static [Position],
}

#[derive(Serialize)]
struct RegisterView {
    fields: [&'static str; 4],
}

/// Entry point; always sends visitors to the login form.
#[get("/")]
pub async fn index() -> HttpResponse {
    see_other(LOGIN_PATH)
}

#[get("/auth/login")]
pub async fn login_page(session: SessionContext) -> HttpResponse {
    render(
        &session,
        &LoginView {
            user_types: ["customer", "employee"],
            positions: Position::ALL,
        },
    )
}

/// Check credentials and store the principal in the session.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let request = form.parse()?;
        let principal = state.auth.login(&request).await?;
        session.persist_principal(&principal)?;
        redirect_with(
            &session,
            Flash::success(format!("Welcome, {}!", principal.name())),
            landing(Some(&principal)),
        )
    }
    .await;
    settle(&session, LOGIN_PATH, outcome)
}

#[get("/auth/register")]
pub async fn register_page(session: SessionContext) -> HttpResponse {
    render(
        &session,
        &RegisterView {
            fields: ["full_name", "address", "id_type", "id_number"],
        },
    )
}

/// Register a new customer dated today.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let outcome = async {
        let customer = state
            .auth
            .register(&RegistrationRequest {
                full_name: form.full_name.clone(),
                address: form.address.clone(),
                id_type: form.id_type.clone(),
                id_number: form.id_number.clone(),
            })
            .await?;
        redirect_with(
            &session,
            Flash::success(format!(
                "Registration successful. Your customer ID is {}; use it to log in.",
                customer.id
            )),
            LOGIN_PATH,
        )
    }
    .await;
    settle(&session, REGISTER_PATH, outcome)
}

#[get("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    redirect_with(&session, Flash::info("You have been logged out."), LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn form(user_type: &str, user_id: &str, position: &str) -> LoginForm {
        LoginForm {
            user_type: user_type.to_owned(),
            full_name: "Ann Lee".to_owned(),
            user_id: user_id.to_owned(),
            password: "customer".to_owned(),
            position: position.to_owned(),
        }
    }

    #[rstest]
    fn customer_logins_ignore_the_position_field() {
        let request = form("customer", "12", "Admin").parse().expect("valid form");
        assert_eq!(request.user_type, UserType::Customer);
        assert_eq!(request.user_id, 12);
        assert_eq!(request.position, None);
    }

    #[rstest]
    fn employee_logins_carry_the_claimed_position() {
        let request = form("employee", "7", "Manager").parse().expect("valid form");
        assert_eq!(request.position, Some(Position::Manager));
    }

    #[rstest]
    #[case(form("guest", "12", ""))]
    #[case(form("customer", "twelve", ""))]
    #[case(form("employee", "7", "Owner"))]
    fn malformed_logins_are_invalid(#[case] submitted: LoginForm) {
        let err = submitted.parse().expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
