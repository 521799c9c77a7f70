//! Detection of overlapping approved requests.

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk_shared::types::{EmployeeId, RequestId};

use crate::ports::{RequestStore, StoreError};
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{
    DateRange, LeaveDetails, RequestDetails, TimeOffRequest, TravelDetails,
};

/// Finds approved leave or travel that intersects a date range.
///
/// Ranges are inclusive at both ends. Pending and rejected requests never
/// conflict.
#[derive(Clone)]
pub struct ConflictChecker {
    leave: Arc<dyn RequestStore<LeaveDetails>>,
    travel: Arc<dyn RequestStore<TravelDetails>>,
}

impl ConflictChecker {
    /// Creates a new conflict checker.
    #[must_use]
    pub fn new(
        leave: Arc<dyn RequestStore<LeaveDetails>>,
        travel: Arc<dyn RequestStore<TravelDetails>>,
    ) -> Self {
        Self { leave, travel }
    }

    /// Returns true if any approved leave or travel of the employee
    /// intersects `[start, end]`.
    pub async fn has_overlap(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, WorkflowError> {
        let period = DateRange::new(start, end)?;
        if self
            .approved_leave_overlap(employee_id, period, None)
            .await?
            .is_some()
        {
            return Ok(true);
        }
        Ok(self
            .approved_travel_overlap(employee_id, period, None)
            .await?
            .is_some())
    }

    /// First approved leave intersecting `period`, other than `excluding`.
    pub async fn approved_leave_overlap(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
        excluding: Option<RequestId>,
    ) -> Result<Option<RequestId>, StoreError> {
        let rows = self
            .leave
            .find_approved_overlapping(employee_id, period)
            .await?;
        Ok(first_conflict(&rows, period, excluding))
    }

    /// First approved business travel intersecting `period`, other than `excluding`.
    pub async fn approved_travel_overlap(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
        excluding: Option<RequestId>,
    ) -> Result<Option<RequestId>, StoreError> {
        let rows = self
            .travel
            .find_approved_overlapping(employee_id, period)
            .await?;
        Ok(first_conflict(&rows, period, excluding))
    }
}

fn first_conflict<D: RequestDetails>(
    rows: &[TimeOffRequest<D>],
    period: DateRange,
    excluding: Option<RequestId>,
) -> Option<RequestId> {
    rows.iter()
        .filter(|row| Some(row.id) != excluding)
        .find(|row| row.period.overlaps(&period))
        .map(|row| row.id)
}
