//! Reported room problems.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::field::field_error;
use super::sort_key::define_sort_key;
use super::{Error, HotelId, ProblemId, RoomId};

/// Persisted problem report joined with the hotel name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomProblem {
    /// Surrogate key.
    pub id: ProblemId,
    /// Hotel of the room.
    pub hotel_id: HotelId,
    /// Hotel name.
    pub hotel_name: String,
    /// Affected room.
    pub room_id: RoomId,
    /// Description.
    pub problem: String,
    /// Day reported.
    pub report_date: NaiveDate,
    /// Whether it has been fixed.
    pub resolved: bool,
}

/// Validated input for reporting or editing a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomProblemDraft {
    hotel_id: HotelId,
    room_id: RoomId,
    problem: String,
    report_date: NaiveDate,
    resolved: bool,
}

impl RoomProblemDraft {
    /// Validate a report against `today`.
    pub fn new(
        hotel_id: HotelId,
        room_id: RoomId,
        problem: &str,
        report_date: NaiveDate,
        resolved: bool,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        if hotel_id.get() < 1 || room_id.get() < 1 {
            return Err(field_error(
                "room_id",
                "not_positive",
                "Hotel ID and Room ID must be positive.",
            ));
        }
        let problem = problem.trim();
        if problem.is_empty() {
            return Err(field_error(
                "problem",
                "missing_field",
                "Problem description cannot be empty.",
            ));
        }
        if report_date > today {
            return Err(field_error(
                "report_date",
                "in_future",
                "Report date cannot be in the future.",
            ));
        }
        Ok(Self {
            hotel_id,
            room_id,
            problem: problem.to_owned(),
            report_date,
            resolved,
        })
    }

    /// Hotel of the room.
    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    /// Affected room.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Trimmed description.
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Day reported.
    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    /// Resolved flag.
    pub fn resolved(&self) -> bool {
        self.resolved
    }
}

define_sort_key! {
    /// Orderings offered on the room problem list.
    pub enum ProblemSort {
        /// Newest reports first.
        ReportDesc => "report_desc",
        /// Oldest reports first.
        ReportAsc => "report_asc",
        /// By room number.
        RoomId => "roomid",
        /// By hotel name.
        HotelName => "hotelname",
        /// Unresolved first.
        Status => "status",
    }
    default = ReportDesc;
}

impl ProblemSort {
    /// Compare two reports; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &RoomProblem, b: &RoomProblem) -> Ordering {
        let primary = match self {
            Self::ReportDesc => b.report_date.cmp(&a.report_date),
            Self::ReportAsc => a.report_date.cmp(&b.report_date),
            Self::RoomId => a.room_id.cmp(&b.room_id),
            Self::HotelName => a.hotel_name.cmp(&b.hotel_name),
            Self::Status => a.resolved.cmp(&b.resolved),
        };
        primary.then(a.id.cmp(&b.id))
    }
}
