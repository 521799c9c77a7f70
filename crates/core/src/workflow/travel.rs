//! Business-travel request workflow.
//!
//! Mirrors the leave workflow without touching the quota ledger. Submission
//! is checked against approved leave only; approval re-checks both approved
//! leave and approved travel.

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk_shared::types::{CityId, EmployeeId, PageRequest, PageResponse, RequestId};
use serde::Deserialize;
use tracing::{info, warn};

use crate::ports::DestinationDirectory;
use crate::workflow::conflict::ConflictChecker;
use crate::workflow::context::WorkflowContext;
use crate::workflow::desk::RequestDesk;
use crate::workflow::error::WorkflowError;
use crate::workflow::transition::DecisionRules;
use crate::workflow::types::{TimeOffRequest, TravelDetails, TravelRequest, Viewer};

/// Input for submitting a business-travel request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTravelRequest {
    /// Travelling employee.
    pub employee_id: EmployeeId,
    /// Destination city.
    pub city_id: CityId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Purpose of the trip.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Submits, approves and rejects business-travel requests.
pub struct TravelWorkflow {
    desk: RequestDesk<TravelDetails>,
    destinations: Arc<dyn DestinationDirectory>,
    conflicts: ConflictChecker,
}

impl TravelWorkflow {
    /// Creates a new travel workflow.
    #[must_use]
    pub fn new(ctx: &WorkflowContext) -> Self {
        Self {
            desk: RequestDesk::new(ctx.travel_requests.clone(), ctx),
            destinations: ctx.destinations.clone(),
            conflicts: ConflictChecker::new(
                ctx.leave_requests.clone(),
                ctx.travel_requests.clone(),
            ),
        }
    }

    /// Submits a business-travel request in `Pending`.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound`, `CityNotFound`
    /// - `InvalidRange`, `Backdated`
    /// - `CityInactive`
    /// - `OverlappingApproved` against approved leave, `DuplicateRequest`
    pub async fn create(&self, input: NewTravelRequest) -> Result<TravelRequest, WorkflowError> {
        let employee = self.desk.employee(input.employee_id).await?;
        let period = self.desk.period(input.start_date, input.end_date)?;

        let city = self
            .destinations
            .find_city(input.city_id)
            .await?
            .ok_or(WorkflowError::CityNotFound(input.city_id))?;
        if !city.active {
            return Err(WorkflowError::CityInactive(city.name));
        }

        if let Some(existing) = self
            .conflicts
            .approved_leave_overlap(employee.id, period, None)
            .await?
        {
            return Err(WorkflowError::OverlappingApproved { existing });
        }
        self.desk.ensure_not_duplicate(employee.id, period).await?;

        let request = TimeOffRequest::submitted(
            employee.id,
            period,
            input.reason.filter(|r| !r.trim().is_empty()),
            TravelDetails { city_id: city.id },
            self.desk.clock.now(),
        );
        self.desk.submit(request).await
    }

    /// Approves a pending business-travel request.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound`, `EmployeeNotFound`
    /// - `NotPending`, `NotDirectSupervisor`
    /// - `OverlappingApproved` if overlapping leave or travel was approved meanwhile
    pub async fn approve(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
        note: Option<String>,
    ) -> Result<TravelRequest, WorkflowError> {
        let request = self.desk.load_for_decision(id, supervisor_id).await?;
        let guard = self.desk.lock(request.employee_id).await;

        let request = self.desk.load(id).await?;
        let decision = DecisionRules::approve(
            request.id,
            request.status,
            supervisor_id,
            self.desk.clock.now(),
            note,
        )?;

        let overlap = match self
            .conflicts
            .approved_travel_overlap(request.employee_id, request.period, Some(request.id))
            .await?
        {
            Some(existing) => Some(existing),
            None => {
                self.conflicts
                    .approved_leave_overlap(request.employee_id, request.period, None)
                    .await?
            }
        };
        if let Some(existing) = overlap {
            warn!(
                request_id = %id,
                existing = %existing,
                "Approval blocked by overlapping request"
            );
            return Err(WorkflowError::OverlappingApproved { existing });
        }

        let approved = self.desk.commit(id, &decision).await?;
        info!(
            request_id = %id,
            employee_id = %approved.employee_id,
            supervisor_id = %supervisor_id,
            "Business travel request approved"
        );
        drop(guard);
        self.desk.announce(&approved, &decision);
        Ok(approved)
    }

    /// Rejects a pending business-travel request.
    pub async fn reject(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
        reason: &str,
    ) -> Result<TravelRequest, WorkflowError> {
        self.desk.reject(id, supervisor_id, reason).await
    }

    /// All business-travel requests of an employee, newest first.
    pub async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TravelRequest>, WorkflowError> {
        self.desk.list_for_employee(employee_id).await
    }

    /// One page of an employee's business-travel requests.
    pub async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        within_days: Option<u32>,
    ) -> Result<PageResponse<TravelRequest>, WorkflowError> {
        self.desk
            .page_for_employee(employee_id, page, within_days)
            .await
    }

    /// Pending business-travel requests of the supervisor's direct reports.
    pub async fn pending_for_supervisor(
        &self,
        supervisor_id: EmployeeId,
    ) -> Result<Vec<TravelRequest>, WorkflowError> {
        self.desk.pending_for_supervisor(supervisor_id).await
    }

    /// The approved trip covering today, if any.
    pub async fn current(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<TravelRequest>, WorkflowError> {
        self.desk.current(employee_id).await
    }

    /// A business-travel request, if the viewer may see it.
    pub async fn get(&self, id: RequestId, viewer: Viewer) -> Result<TravelRequest, WorkflowError> {
        self.desk.get_visible(id, viewer).await
    }
}
