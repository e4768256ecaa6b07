//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with a domain
//! [`Principal`] and with queued [`Flash`] messages. The principal is stored
//! as flat keys (`user_id`, `user_type`, `user_name`, plus `position` and
//! `hotel_id` for staff) and rebuilt on every request.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{
    CustomerId, CustomerPrincipal, EmployeeId, Error, HotelId, Position, Principal,
    StaffPrincipal,
};

use super::flash::Flash;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_TYPE_KEY: &str = "user_type";
pub(crate) const USER_NAME_KEY: &str = "user_name";
pub(crate) const POSITION_KEY: &str = "position";
pub(crate) const HOTEL_ID_KEY: &str = "hotel_id";
const FLASHES_KEY: &str = "_flashes";

const CUSTOMER: &str = "customer";
const EMPLOYEE: &str = "employee";

fn read_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Replace any previous identity with `principal`.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.clear();
        self.0.renew();
        match principal {
            Principal::Customer(customer) => {
                self.insert(USER_ID_KEY, customer.id.get())?;
                self.insert(USER_TYPE_KEY, CUSTOMER)?;
                self.insert(USER_NAME_KEY, &customer.name)?;
            }
            Principal::Employee(staff) => {
                self.insert(USER_ID_KEY, staff.id.get())?;
                self.insert(USER_TYPE_KEY, EMPLOYEE)?;
                self.insert(USER_NAME_KEY, &staff.name)?;
                self.insert(POSITION_KEY, staff.position.as_str())?;
                if let Some(hotel_id) = staff.hotel_id {
                    self.insert(HOTEL_ID_KEY, hotel_id.get())?;
                }
            }
        }
        Ok(())
    }

    /// Drop every key, flashes included. Flashes queued afterwards survive.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Rebuild the principal, if the session holds a well-formed one.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        let Some(user_id) = self.get::<i32>(USER_ID_KEY)? else {
            return Ok(None);
        };
        let user_type = self.get::<String>(USER_TYPE_KEY)?;
        let name = self.get::<String>(USER_NAME_KEY)?.unwrap_or_default();
        match user_type.as_deref() {
            Some(CUSTOMER) => Ok(Some(Principal::Customer(CustomerPrincipal {
                id: CustomerId::new(user_id),
                name,
            }))),
            Some(EMPLOYEE) => {
                let raw_position = self.get::<String>(POSITION_KEY)?.unwrap_or_default();
                let position = match raw_position.parse::<Position>() {
                    Ok(position) => position,
                    Err(error) => {
                        warn!(%error, "invalid position in session cookie");
                        return Ok(None);
                    }
                };
                Ok(Some(Principal::Employee(StaffPrincipal {
                    id: EmployeeId::new(user_id),
                    name,
                    position,
                    hotel_id: self.get::<i32>(HOTEL_ID_KEY)?.map(HotelId::new),
                })))
            }
            other => {
                warn!(user_type = ?other, "invalid user type in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a logged-in user or return `401 Unauthorized`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized("Please log in first."))
    }

    /// Queue a message for the next rendered page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut queued = self.get::<Vec<Flash>>(FLASHES_KEY)?.unwrap_or_default();
        queued.push(flash);
        self.insert(FLASHES_KEY, queued)
    }

    /// Drain queued messages.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(FLASHES_KEY) {
            Some(Ok(flashes)) => flashes,
            Some(Err(raw)) => {
                warn!(raw_len = raw.len(), "discarding unreadable flash messages");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0.get::<T>(key).map_err(read_error)
    }

    fn insert<T: serde::Serialize>(&self, key: &str, value: T) -> Result<(), Error> {
        self.0.insert(key, value).map_err(write_error)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
