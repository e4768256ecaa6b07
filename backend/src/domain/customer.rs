//! Customer records and their management ordering.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::field::required;
use super::sort_key::define_sort_key;
use super::{CustomerId, Error};

/// Persisted customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    /// Primary key.
    pub id: CustomerId,
    /// Full legal name.
    pub full_name: String,
    /// Postal address.
    pub address: String,
    /// Kind of identity document (e.g. passport, SIN).
    pub id_type: String,
    /// Identity document number.
    pub id_number: String,
    /// Date the customer was registered.
    pub registration_date: NaiveDate,
}

/// Validated input for creating or editing a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    full_name: String,
    address: String,
    id_type: String,
    id_number: String,
    registration_date: NaiveDate,
}

impl CustomerDraft {
    /// Validate and trim the customer fields.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use ehotels::domain::CustomerDraft;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    /// let draft = CustomerDraft::new(" Ann Lee ", "1 Elm St", "passport", "P123", date)
    ///     .expect("valid customer");
    /// assert_eq!(draft.full_name(), "Ann Lee");
    /// ```
    pub fn new(
        full_name: &str,
        address: &str,
        id_type: &str,
        id_number: &str,
        registration_date: NaiveDate,
    ) -> Result<Self, Error> {
        Ok(Self {
            full_name: required("full_name", full_name)?,
            address: required("address", address)?,
            id_type: required("id_type", id_type)?,
            id_number: required("id_number", id_number)?,
            registration_date,
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

    /// Identity document kind.
    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    /// Identity document number.
    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    /// Registration date.
    pub fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }
}

define_sort_key! {
    /// Orderings offered on the customer management screen.
    pub enum CustomerSort {
        /// By key.
        Id => "id",
        /// By name.
        FullName => "fullname",
        /// Newest registrations first.
        Registered => "registered",
        /// By identity document kind.
        IdType => "idtype",
    }
    default = Id;
}

impl CustomerSort {
    /// Compare two customers; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &Customer, b: &Customer) -> Ordering {
        let primary = match self {
            Self::Id => Ordering::Equal,
            Self::FullName => a.full_name.cmp(&b.full_name),
            Self::Registered => b.registration_date.cmp(&a.registration_date),
            Self::IdType => a.id_type.cmp(&b.id_type),
        };
        primary.then(a.id.cmp(&b.id))
    }
}
