//! Port abstraction for employee persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Employee, EmployeeDraft, EmployeeId, EmployeeSort, HotelScope};

use super::{define_port_error, map_port_error_into_domain};

define_port_error! {
    /// Persistence errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "employee repository query failed: {message}",
        /// A uniqueness or reference rule refused the change.
        Constraint { message: String } => "employee constraint violated: {message}",
    }
}

map_port_error_into_domain!(EmployeeRepositoryError, "employee repository");

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find an employee by key whose name matches case-insensitively.
    async fn find_by_login(
        &self,
        full_name: &str,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Fetch an employee by key.
    async fn find_by_id(&self, id: EmployeeId)
    -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// List employees within `scope` in the requested order.
    async fn list(
        &self,
        scope: HotelScope,
        sort: EmployeeSort,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Insert an employee and return the stored row.
    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError>;

    /// Overwrite an employee; `None` when the key is unknown.
    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Delete an employee; `false` when the key is unknown.
    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError>;
}
