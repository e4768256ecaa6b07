//! Staff handlers under `/employee`.
//!
//! Front-desk operations are open to every position; the management screens
//! (customers, employees, hotels, rooms, problems) rely on the services to
//! refuse positions and hotels outside the actor's scope.

use serde::Serialize;

use crate::domain::{Error, StaffPrincipal};

use super::session::SessionContext;

pub mod customers;
pub mod front_desk;
pub mod hotels;
pub mod problems;
pub mod rooms;
pub mod staff;

/// The logged-in employee, or `Unauthorized`.
pub(crate) fn signed_in_staff(session: &SessionContext) -> Result<StaffPrincipal, Error> {
    let principal = session.require_principal()?;
    Ok(principal.staff()?.clone())
}

/// Sorted list page.
#[derive(Serialize)]
pub(crate) struct ListView<'a, S: Serialize + 'static, T: Serialize> {
    pub sort: S,
    pub sort_options: &'static [S],
    pub items: &'a [T],
}

impl<'a, S: Serialize + 'static, T: Serialize> ListView<'a, S, T> {
    pub(crate) fn new(sort: S, sort_options: &'static [S], items: &'a [T]) -> Self {
        Self {
            sort,
            sort_options,
            items,
        }
    }
}
