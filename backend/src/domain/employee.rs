//! Employee records and the rules governing who may manage whom.

use std::cmp::Ordering;

use serde::Serialize;

use super::field::required;
use super::sort_key::define_sort_key;
use super::{EmployeeId, Error, HotelId, Position, StaffPrincipal};

/// Persisted employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    /// Primary key.
    pub id: EmployeeId,
    /// Full legal name.
    pub full_name: String,
    /// Postal address.
    pub address: String,
    /// Role tier.
    pub position: Position,
    /// Social security number.
    pub ssn: String,
    /// Hotel the employee works at.
    pub hotel_id: HotelId,
}

/// Validated input for creating or editing an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    full_name: String,
    address: String,
    position: Position,
    ssn: String,
    hotel_id: HotelId,
}

impl EmployeeDraft {
    /// Validate the employee fields; every field is required.
    pub fn new(
        full_name: &str,
        address: &str,
        position: Position,
        ssn: &str,
        hotel_id: HotelId,
    ) -> Result<Self, Error> {
        Ok(Self {
            full_name: required("fullname", full_name)?,
            address: required("address", address)?,
            position,
            ssn: required("ssn", ssn)?,
            hotel_id,
        })
    }

    /// Full name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Postal address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Role tier to assign.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Social security number.
    pub fn ssn(&self) -> &str {
        &self.ssn
    }

    /// Hotel to assign.
    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }
}

/// Whether `actor` may open or edit `target`.
///
/// Admins may edit anyone. Managers may edit themselves, and otherwise only
/// Receptionists of their own hotel.
#[must_use]
pub fn may_edit(actor: &StaffPrincipal, target: &Employee) -> bool {
    match actor.position {
        Position::Admin => true,
        Position::Manager => {
            target.id == actor.id
                || (!target.position.is_management() && actor.hotel_id == Some(target.hotel_id))
        }
        Position::Receptionist => false,
    }
}

/// Check the position and hotel `actor` wants to assign.
///
/// `editing` is the record being edited, if any. A Manager editing their own
/// record may keep the Manager position but may not change it.
pub fn check_assignment(
    actor: &StaffPrincipal,
    draft: &EmployeeDraft,
    editing: Option<&Employee>,
) -> Result<(), Error> {
    if !actor.is_manager() {
        return Ok(());
    }
    let keeps_own_position = editing
        .is_some_and(|target| target.id == actor.id && draft.position == target.position);
    if draft.position.is_management() && !keeps_own_position {
        return Err(Error::forbidden("You cannot assign Admin or Manager positions."));
    }
    if actor.hotel_id != Some(draft.hotel_id) {
        return Err(Error::forbidden("You can only assign employees to your own hotel."));
    }
    Ok(())
}

/// Check that `actor` may delete `target`.
pub fn check_deletion(actor: &StaffPrincipal, target: &Employee) -> Result<(), Error> {
    if target.id == actor.id {
        return Err(Error::conflict("You cannot delete your own account."));
    }
    if actor.is_manager()
        && (target.position.is_management() || actor.hotel_id != Some(target.hotel_id))
    {
        return Err(Error::forbidden("You do not have permission to delete this employee."));
    }
    Ok(())
}

define_sort_key! {
    /// Orderings offered on the employee management screen.
    pub enum EmployeeSort {
        /// By key.
        Id => "id",
        /// By name.
        Name => "name",
        /// By address.
        Address => "address",
        /// By position label.
        Position => "position",
        /// By social security number.
        Ssn => "ssn",
        /// By hotel.
        Hotel => "hotel",
    }
    default = Id;
}

impl EmployeeSort {
    /// Compare two employees; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &Employee, b: &Employee) -> Ordering {
        let primary = match self {
            Self::Id => Ordering::Equal,
            Self::Name => a.full_name.cmp(&b.full_name),
            Self::Address => a.address.cmp(&b.address),
            Self::Position => a.position.as_str().cmp(b.position.as_str()),
            Self::Ssn => a.ssn.cmp(&b.ssn),
            Self::Hotel => a.hotel_id.cmp(&b.hotel_id),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[cfg(test)]
#[path = "employee_tests.rs"]
mod tests;
