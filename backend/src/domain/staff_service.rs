//! Employee management for Admins and Managers.

use std::sync::Arc;

use tracing::info;

use super::ports::EmployeeRepository;
use super::{
    Employee, EmployeeDraft, EmployeeId, EmployeeSort, Error, HotelScope, StaffPrincipal,
    check_assignment, check_deletion, may_edit,
};

/// Lists, creates, edits and deletes employees within the actor's reach.
#[derive(Clone)]
pub struct StaffService {
    employees: Arc<dyn EmployeeRepository>,
}

impl StaffService {
    /// Create the service.
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    fn management_scope(staff: &StaffPrincipal) -> Result<HotelScope, Error> {
        staff.require_management()?;
        if staff.is_admin() {
            Ok(HotelScope::All)
        } else {
            Ok(HotelScope::Hotel(staff.home_hotel()?))
        }
    }

    /// Employees visible to the actor.
    pub async fn list(
        &self,
        staff: &StaffPrincipal,
        sort: EmployeeSort,
    ) -> Result<Vec<Employee>, Error> {
        let scope = Self::management_scope(staff)?;
        Ok(self.employees.list(scope, sort).await?)
    }

    /// One employee the actor may edit.
    pub async fn get(&self, staff: &StaffPrincipal, id: EmployeeId) -> Result<Employee, Error> {
        Self::management_scope(staff)?;
        let target = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Employee not found."))?;
        if !may_edit(staff, &target) {
            return Err(Error::forbidden(
                "Managers can only edit employees from their own hotel who are not Admin or Manager.",
            ));
        }
        Ok(target)
    }

    /// Add an employee.
    pub async fn create(
        &self,
        staff: &StaffPrincipal,
        draft: &EmployeeDraft,
    ) -> Result<Employee, Error> {
        Self::management_scope(staff)?;
        check_assignment(staff, draft, None)?;
        let employee = self.employees.insert(draft).await?;
        info!(employee_id = %employee.id, actor = %staff.id, "employee added");
        Ok(employee)
    }

    /// Overwrite an employee the actor may edit.
    pub async fn update(
        &self,
        staff: &StaffPrincipal,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Employee, Error> {
        let target = self.get(staff, id).await?;
        check_assignment(staff, draft, Some(&target))?;
        self.employees
            .update(id, draft)
            .await?
            .ok_or_else(|| Error::not_found("Employee not found."))
    }

    /// Delete an employee the actor may remove.
    pub async fn delete(&self, staff: &StaffPrincipal, id: EmployeeId) -> Result<(), Error> {
        Self::management_scope(staff)?;
        let target = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Employee not found."))?;
        check_deletion(staff, &target)?;
        if !self.employees.delete(id).await? {
            return Err(Error::not_found("Employee not found."));
        }
        info!(employee_id = %id, actor = %staff.id, "employee deleted");
        Ok(())
    }
}
