//! Authenticated request context.
//!
//! A `Principal` is rebuilt from the session on every request and handed to
//! services explicitly. Services never consult the session themselves.

use serde::{Deserialize, Serialize};

use super::{CustomerId, EmployeeId, Error, HotelId, Position};

/// Logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPrincipal {
    /// Customer key.
    pub id: CustomerId,
    /// Name used at login.
    pub name: String,
}

/// Logged-in employee together with their authorisation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPrincipal {
    /// Employee key.
    pub id: EmployeeId,
    /// Name used at login.
    pub name: String,
    /// Role tier.
    pub position: Position,
    /// Home hotel; Admins operate globally regardless of this value.
    pub hotel_id: Option<HotelId>,
}

/// Identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum Principal {
    /// Customer portal user.
    Customer(CustomerPrincipal),
    /// Hotel staff member.
    Employee(StaffPrincipal),
}

impl Principal {
    /// Display name stored at login.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Customer(customer) => &customer.name,
            Self::Employee(staff) => &staff.name,
        }
    }

    /// Require a customer, or fail with `Unauthorized`.
    pub fn customer(&self) -> Result<&CustomerPrincipal, Error> {
        match self {
            Self::Customer(customer) => Ok(customer),
            Self::Employee(_) => Err(Error::unauthorized("Please log in as a customer.")),
        }
    }

    /// Require an employee, or fail with `Unauthorized`.
    pub fn staff(&self) -> Result<&StaffPrincipal, Error> {
        match self {
            Self::Employee(staff) => Ok(staff),
            Self::Customer(_) => Err(Error::unauthorized("You must be logged in as an employee.")),
        }
    }
}

/// Hotels visible to a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelScope {
    /// Every hotel.
    All,
    /// A single hotel.
    Hotel(HotelId),
}

impl HotelScope {
    /// Whether `hotel_id` falls inside this scope.
    #[must_use]
    pub fn contains(self, hotel_id: HotelId) -> bool {
        match self {
            Self::All => true,
            Self::Hotel(own) => own == hotel_id,
        }
    }

    /// The restricting hotel, or `None` for global scope.
    #[must_use]
    pub const fn hotel(self) -> Option<HotelId> {
        match self {
            Self::All => None,
            Self::Hotel(id) => Some(id),
        }
    }
}

impl StaffPrincipal {
    /// Whether this employee holds the Admin position.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.position == Position::Admin
    }

    /// Whether this employee holds the Manager position.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.position == Position::Manager
    }

    /// Hotels this employee may read and write.
    ///
    /// Non-admins without a hotel on record get a scope that matches nothing
    /// real, so a missing hotel never widens access.
    #[must_use]
    pub fn scope(&self) -> HotelScope {
        if self.is_admin() {
            HotelScope::All
        } else {
            HotelScope::Hotel(self.hotel_id.unwrap_or(HotelId::new(0)))
        }
    }

    /// Fail with `Forbidden` unless `hotel_id` is in scope.
    pub fn ensure_hotel(&self, hotel_id: HotelId, message: &str) -> Result<(), Error> {
        if self.scope().contains(hotel_id) {
            Ok(())
        } else {
            Err(Error::forbidden(message))
        }
    }

    /// Require the Admin position.
    pub fn require_admin(&self, message: &str) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden(message))
        }
    }

    /// Require Admin or Manager.
    pub fn require_management(&self) -> Result<(), Error> {
        if self.position.is_management() {
            Ok(())
        } else {
            Err(Error::forbidden("Access denied."))
        }
    }

    /// Home hotel for operations that need one; Managers without a hotel on
    /// record are refused.
    pub fn home_hotel(&self) -> Result<HotelId, Error> {
        self.hotel_id
            .ok_or_else(|| Error::forbidden("Hotel information missing for this employee."))
    }
}
