//! Admin-only customer management.

use std::sync::Arc;

use tracing::info;

use super::ports::CustomerRepository;
use super::{Customer, CustomerDraft, CustomerId, CustomerSort, Error, StaffPrincipal};

const ADMIN_ONLY: &str = "Only admins can manage customers.";

/// Lists, creates, edits and deletes customers.
#[derive(Clone)]
pub struct CustomerAdminService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerAdminService {
    /// Create the service.
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// Refuse non-admins before showing an empty form.
    pub fn authorize(&self, staff: &StaffPrincipal) -> Result<(), Error> {
        staff.require_admin(ADMIN_ONLY)
    }

    /// Every customer in the requested order.
    pub async fn list(
        &self,
        staff: &StaffPrincipal,
        sort: CustomerSort,
    ) -> Result<Vec<Customer>, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        Ok(self.customers.list(sort).await?)
    }

    /// One customer, for the edit form.
    pub async fn get(&self, staff: &StaffPrincipal, id: CustomerId) -> Result<Customer, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Customer not found."))
    }

    /// Add a customer.
    pub async fn create(
        &self,
        staff: &StaffPrincipal,
        draft: &CustomerDraft,
    ) -> Result<Customer, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        let customer = self.customers.insert(draft).await?;
        info!(customer_id = %customer.id, employee_id = %staff.id, "customer added");
        Ok(customer)
    }

    /// Overwrite a customer.
    pub async fn update(
        &self,
        staff: &StaffPrincipal,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, Error> {
        staff.require_admin(ADMIN_ONLY)?;
        self.customers
            .update(id, draft)
            .await?
            .ok_or_else(|| Error::not_found("Customer not found."))
    }

    /// Delete a customer.
    pub async fn delete(&self, staff: &StaffPrincipal, id: CustomerId) -> Result<(), Error> {
        staff.require_admin(ADMIN_ONLY)?;
        if !self.customers.delete(id).await? {
            return Err(Error::not_found("Customer not found."));
        }
        info!(customer_id = %id, employee_id = %staff.id, "customer deleted");
        Ok(())
    }
}
