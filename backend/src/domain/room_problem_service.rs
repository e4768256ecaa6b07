//! Reported room problems for Admins and Managers.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use serde::Serialize;
use tracing::info;

use super::field::field_error;
use super::ports::{RoomProblemRepository, RoomRepository};
use super::{
    Error, HotelId, ProblemId, ProblemSort, RoomId, RoomProblem, RoomProblemDraft, StaffPrincipal,
    today,
};

/// Defaults for the "report a problem" form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProblemForm {
    /// Pre-filled hotel for Managers.
    pub hotel_id: Option<HotelId>,
    /// Pre-filled report date.
    pub report_date: NaiveDate,
}

/// Submitted new problem report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemReport {
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Affected room.
    pub room_id: RoomId,
    /// Description.
    pub problem: String,
    /// Day reported.
    pub report_date: NaiveDate,
}

/// Submitted edit; the room and hotel stay fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemEdit {
    /// Description.
    pub problem: String,
    /// Day reported.
    pub report_date: NaiveDate,
    /// Whether it has been fixed.
    pub resolved: bool,
}

/// Lists, reports, edits and deletes room problems.
#[derive(Clone)]
pub struct RoomProblemService {
    problems: Arc<dyn RoomProblemRepository>,
    rooms: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl RoomProblemService {
    /// Create the service.
    pub fn new(
        problems: Arc<dyn RoomProblemRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            problems,
            rooms,
            clock,
        }
    }

    /// Reports visible to the actor.
    pub async fn list(
        &self,
        staff: &StaffPrincipal,
        sort: ProblemSort,
    ) -> Result<Vec<RoomProblem>, Error> {
        staff.require_management()?;
        Ok(self.problems.list(staff.scope(), sort).await?)
    }

    /// Defaults for a new report.
    pub fn form(&self, staff: &StaffPrincipal) -> Result<ProblemForm, Error> {
        staff.require_management()?;
        Ok(ProblemForm {
            hotel_id: if staff.is_manager() { staff.hotel_id } else { None },
            report_date: today(self.clock.as_ref()),
        })
    }

    /// Record a new, unresolved problem.
    pub async fn create(
        &self,
        staff: &StaffPrincipal,
        report: &ProblemReport,
    ) -> Result<RoomProblem, Error> {
        staff.require_management()?;
        let draft = RoomProblemDraft::new(
            report.hotel_id,
            report.room_id,
            &report.problem,
            report.report_date,
            false,
            today(self.clock.as_ref()),
        )?;
        staff.ensure_hotel(
            draft.hotel_id(),
            "Managers can only report problems for their own hotel.",
        )?;
        let belongs = self
            .rooms
            .find_by_id(draft.room_id())
            .await?
            .is_some_and(|room| room.hotel_id == draft.hotel_id());
        if !belongs {
            return Err(field_error(
                "room_id",
                "room_not_in_hotel",
                "The room does not belong to the selected hotel.",
            ));
        }
        let problem = self.problems.insert(&draft).await?;
        info!(problem_id = %problem.id, room_id = %problem.room_id, "room problem reported");
        Ok(problem)
    }

    async fn existing(
        &self,
        staff: &StaffPrincipal,
        id: ProblemId,
        message: &str,
    ) -> Result<RoomProblem, Error> {
        staff.require_management()?;
        let problem = self
            .problems
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Problem not found."))?;
        staff.ensure_hotel(problem.hotel_id, message)?;
        Ok(problem)
    }

    /// One report, for the edit form.
    pub async fn get(&self, staff: &StaffPrincipal, id: ProblemId) -> Result<RoomProblem, Error> {
        self.existing(staff, id, "Managers can only edit problems in their own hotel.")
            .await
    }

    /// Update the text, date and resolved flag of a report.
    pub async fn update(
        &self,
        staff: &StaffPrincipal,
        id: ProblemId,
        edit: &ProblemEdit,
    ) -> Result<RoomProblem, Error> {
        let current = self
            .existing(staff, id, "Managers can only edit problems in their own hotel.")
            .await?;
        let draft = RoomProblemDraft::new(
            current.hotel_id,
            current.room_id,
            &edit.problem,
            edit.report_date,
            edit.resolved,
            today(self.clock.as_ref()),
        )?;
        self.problems
            .update(id, &draft)
            .await?
            .ok_or_else(|| Error::not_found("Problem not found."))
    }

    /// Delete a report.
    pub async fn delete(&self, staff: &StaffPrincipal, id: ProblemId) -> Result<(), Error> {
        self.existing(staff, id, "Managers can only delete problems in their own hotel.")
            .await?;
        if !self.problems.delete(id).await? {
            return Err(Error::not_found("Problem not found."));
        }
        info!(problem_id = %id, employee_id = %staff.id, "room problem deleted");
        Ok(())
    }
}
