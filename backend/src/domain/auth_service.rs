//! Login and customer self-registration.

use std::sync::Arc;

use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ports::{CustomerRepository, EmployeeRepository};
use super::{
    Customer, CustomerDraft, CustomerId, CustomerPrincipal, EmployeeId, Error, Position,
    Principal, StaffPrincipal, today,
};

/// Kind of account a login targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Customer portal account.
    Customer,
    /// Staff account.
    Employee,
}

/// Submitted login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account kind.
    pub user_type: UserType,
    /// Full name, matched case-insensitively.
    pub full_name: String,
    /// Customer or employee key.
    pub user_id: i32,
    /// Shared secret for the account kind.
    pub password: String,
    /// Claimed position; required for employees.
    pub position: Option<Position>,
}

/// Submitted registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Full name.
    pub full_name: String,
    /// Postal address.
    pub address: String,
    /// Identity document kind.
    pub id_type: String,
    /// Identity document number.
    pub id_number: String,
}

/// Shared password for an account kind.
///
/// Accounts have no individual credentials; every account of one kind shares
/// one secret. `None` selects the customer secret.
#[must_use]
pub fn expected_password(position: Option<Position>) -> &'static str {
    match position {
        Some(Position::Admin) => "admin",
        Some(Position::Manager | Position::Receptionist) => "employee",
        None => "customer",
    }
}

/// Authenticates users and registers new customers.
#[derive(Clone)]
pub struct AuthService {
    customers: Arc<dyn CustomerRepository>,
    employees: Arc<dyn EmployeeRepository>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create the service.
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        employees: Arc<dyn EmployeeRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            customers,
            employees,
            clock,
        }
    }

    /// Check credentials and return the principal to store in the session.
    pub async fn login(&self, request: &LoginRequest) -> Result<Principal, Error> {
        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(Error::invalid_request("Invalid input"));
        }
        let principal = match request.user_type {
            UserType::Customer => self.login_customer(full_name, request).await?,
            UserType::Employee => self.login_employee(full_name, request).await?,
        };
        info!(user_type = ?request.user_type, user_id = request.user_id, "login succeeded");
        Ok(principal)
    }

    async fn login_customer(
        &self,
        full_name: &str,
        request: &LoginRequest,
    ) -> Result<Principal, Error> {
        let customer = self
            .customers
            .find_by_login(full_name, CustomerId::new(request.user_id))
            .await?
            .ok_or_else(|| Error::unauthorized("Customer not found."))?;
        check_password(&request.password, None)?;
        Ok(Principal::Customer(CustomerPrincipal {
            id: customer.id,
            name: customer.full_name,
        }))
    }

    async fn login_employee(
        &self,
        full_name: &str,
        request: &LoginRequest,
    ) -> Result<Principal, Error> {
        let employee = self
            .employees
            .find_by_login(full_name, EmployeeId::new(request.user_id))
            .await?
            .ok_or_else(|| Error::unauthorized("Employee not found."))?;
        if request.position != Some(employee.position) {
            return Err(Error::unauthorized("Position does not match our records."));
        }
        check_password(&request.password, Some(employee.position))?;
        Ok(Principal::Employee(StaffPrincipal {
            id: employee.id,
            name: employee.full_name,
            position: employee.position,
            hotel_id: Some(employee.hotel_id),
        }))
    }

    /// Register a customer dated today, refusing duplicate identities.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Customer, Error> {
        let draft = CustomerDraft::new(
            &request.full_name,
            &request.address,
            &request.id_type,
            &request.id_number,
            today(self.clock.as_ref()),
        )?;
        if self
            .customers
            .exists_with_identity(draft.full_name(), draft.id_number())
            .await?
        {
            return Err(Error::conflict(
                "A customer with this name and ID number already exists.",
            ));
        }
        let customer = self.customers.insert(&draft).await?;
        info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }
}

fn check_password(submitted: &str, position: Option<Position>) -> Result<(), Error> {
    if submitted == expected_password(position) {
        Ok(())
    } else {
        Err(Error::unauthorized("Incorrect password."))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
