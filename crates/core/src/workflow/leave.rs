//! Leave request workflow.
//!
//! Submission only pre-checks the quota. The authoritative balance check and
//! the deduction happen on approval, under the ledger's per-key lock.

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk_shared::types::{EmployeeId, LeaveTypeId, PageRequest, PageResponse, RequestId};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::leave_type::LeaveType;
use crate::ports::{LeaveTypeStore, QuotaLedger};
use crate::workflow::conflict::ConflictChecker;
use crate::workflow::context::WorkflowContext;
use crate::workflow::desk::RequestDesk;
use crate::workflow::error::WorkflowError;
use crate::workflow::transition::DecisionRules;
use crate::workflow::types::{LeaveDetails, LeaveRequest, TimeOffRequest, Viewer};

/// Input for submitting a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewLeaveRequest {
    /// Requesting employee.
    pub employee_id: EmployeeId,
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Optional caller-supplied day count; must match the range.
    #[serde(default)]
    pub total_days: Option<u32>,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Submits, approves and rejects leave requests.
pub struct LeaveWorkflow {
    desk: RequestDesk<LeaveDetails>,
    leave_types: Arc<dyn LeaveTypeStore>,
    ledger: Arc<dyn QuotaLedger>,
    conflicts: ConflictChecker,
}

impl LeaveWorkflow {
    /// Creates a new leave workflow.
    #[must_use]
    pub fn new(ctx: &WorkflowContext) -> Self {
        Self {
            desk: RequestDesk::new(ctx.leave_requests.clone(), ctx),
            leave_types: ctx.leave_types.clone(),
            ledger: ctx.ledger.clone(),
            conflicts: ConflictChecker::new(
                ctx.leave_requests.clone(),
                ctx.travel_requests.clone(),
            ),
        }
    }

    async fn leave_type(&self, id: LeaveTypeId) -> Result<LeaveType, WorkflowError> {
        self.leave_types
            .find(id)
            .await?
            .ok_or(WorkflowError::LeaveTypeNotFound(id))
    }

    /// Submits a leave request in `Pending`.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound`, `LeaveTypeNotFound`
    /// - `InvalidRange`, `Backdated`, `DurationOutOfBounds`
    /// - `TotalDaysMismatch`, `LeaveTypeInactive`
    /// - `OverlappingApproved` against approved leave, `DuplicateRequest`
    /// - `InsufficientBalance` when the type consumes quota and the current
    ///   balance is already too small
    pub async fn create(&self, input: NewLeaveRequest) -> Result<LeaveRequest, WorkflowError> {
        let employee = self.desk.employee(input.employee_id).await?;
        let period = self.desk.period(input.start_date, input.end_date)?;

        let leave_type = self.leave_type(input.leave_type_id).await?;
        if !leave_type.active {
            return Err(WorkflowError::LeaveTypeInactive(leave_type.code));
        }

        let total_days = period.days();
        if let Some(supplied) = input.total_days
            && supplied != total_days
        {
            return Err(WorkflowError::TotalDaysMismatch {
                supplied,
                derived: total_days,
            });
        }
        leave_type.check_duration(total_days)?;

        if let Some(existing) = self
            .conflicts
            .approved_leave_overlap(employee.id, period, None)
            .await?
        {
            return Err(WorkflowError::OverlappingApproved { existing });
        }
        self.desk.ensure_not_duplicate(employee.id, period).await?;

        if leave_type.consumes_quota {
            let balance = self.ledger.fetch_or_init(employee.id, period.year()).await?;
            if !balance.has_sufficient(total_days) {
                return Err(WorkflowError::InsufficientBalance {
                    available: balance.remaining_days,
                    requested: total_days,
                });
            }
        }

        let request = TimeOffRequest::submitted(
            employee.id,
            period,
            input.reason.filter(|r| !r.trim().is_empty()),
            LeaveDetails {
                leave_type_id: leave_type.id,
                total_days,
            },
            self.desk.clock.now(),
        );
        self.desk.submit(request).await
    }

    /// Approves a pending leave request and deducts its days from the quota.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound`, `EmployeeNotFound`
    /// - `NotPending` if already decided, including by a concurrent call
    /// - `NotDirectSupervisor`
    /// - `OverlappingApproved` if overlapping leave was approved meanwhile
    /// - `InsufficientBalance`; the request stays pending
    pub async fn approve(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
        note: Option<String>,
    ) -> Result<LeaveRequest, WorkflowError> {
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

        if let Some(existing) = self
            .conflicts
            .approved_leave_overlap(request.employee_id, request.period, Some(request.id))
            .await?
        {
            warn!(request_id = %id, existing = %existing, "Approval blocked by overlapping leave");
            return Err(WorkflowError::OverlappingApproved { existing });
        }

        let leave_type = self.leave_type(request.details.leave_type_id).await?;
        let employee_id = request.employee_id;
        let year = request.period.year();
        let days = request.details.total_days;

        if leave_type.consumes_quota {
            self.ledger.deduct(employee_id, year, days).await?;
        }

        let approved = match self.desk.commit(id, &decision).await {
            Ok(approved) => approved,
            Err(err) => {
                if leave_type.consumes_quota {
                    self.refund(employee_id, year, days).await;
                }
                return Err(err);
            }
        };

        info!(
            request_id = %id,
            employee_id = %employee_id,
            supervisor_id = %supervisor_id,
            year,
            days,
            "Leave request approved"
        );
        drop(guard);
        self.desk.announce(&approved, &decision);
        Ok(approved)
    }

    async fn refund(&self, employee_id: EmployeeId, year: i32, days: u32) {
        if let Err(err) = self.ledger.restore(employee_id, year, days).await {
            error!(
                %employee_id,
                year,
                days,
                error = %err,
                "Failed to restore quota after a lost approval"
            );
        }
    }

    /// Rejects a pending leave request. The quota is not touched.
    ///
    /// # Errors
    ///
    /// As for [`approve`](Self::approve) minus the conflict and balance
    /// checks, plus `RejectionReasonRequired` for a blank reason.
    pub async fn reject(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
        reason: &str,
    ) -> Result<LeaveRequest, WorkflowError> {
        self.desk.reject(id, supervisor_id, reason).await
    }

    /// All leave requests of an employee, newest first.
    pub async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<LeaveRequest>, WorkflowError> {
        self.desk.list_for_employee(employee_id).await
    }

    /// One page of an employee's leave requests, optionally only those
    /// created within the last `within_days` days.
    pub async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        within_days: Option<u32>,
    ) -> Result<PageResponse<LeaveRequest>, WorkflowError> {
        self.desk
            .page_for_employee(employee_id, page, within_days)
            .await
    }

    /// Pending leave requests of the supervisor's direct reports.
    pub async fn pending_for_supervisor(
        &self,
        supervisor_id: EmployeeId,
    ) -> Result<Vec<LeaveRequest>, WorkflowError> {
        self.desk.pending_for_supervisor(supervisor_id).await
    }

    /// The approved leave covering today, if any.
    pub async fn current(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<LeaveRequest>, WorkflowError> {
        self.desk.current(employee_id).await
    }

    /// A leave request, if the viewer may see it.
    pub async fn get(&self, id: RequestId, viewer: Viewer) -> Result<LeaveRequest, WorkflowError> {
        self.desk.get_visible(id, viewer).await
    }
}
