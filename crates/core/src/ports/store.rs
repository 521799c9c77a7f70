//! Persistence boundary for requests and the leave-type catalogue.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use leavedesk_shared::types::{EmployeeId, LeaveTypeId, PageRequest, PageResponse, RequestId};
use thiserror::Error;

use crate::leave_type::LeaveType;
use crate::workflow::types::{DateRange, Decision, RequestDetails, RequestStatus, TimeOffRequest};

/// Errors raised by storage implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or timed out.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A unique key would be violated.
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The row targeted by an update does not exist.
    #[error("record not found: {0}")]
    Missing(String),

    /// A decision lost the race: the request is no longer pending.
    #[error("request {id} is already {status}")]
    StatusMismatch {
        /// The request being decided.
        id: RequestId,
        /// Status found in storage.
        status: RequestStatus,
    },
}

/// Storage for one kind of time-off request.
///
/// Listings are ordered newest first.
#[async_trait]
pub trait RequestStore<D: RequestDetails>: Send + Sync {
    /// Persists a new request.
    async fn insert(&self, request: TimeOffRequest<D>) -> Result<TimeOffRequest<D>, StoreError>;

    /// Finds a request by its external ID.
    async fn find(&self, id: RequestId) -> Result<Option<TimeOffRequest<D>>, StoreError>;

    /// Lists every request of an employee.
    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError>;

    /// Pages through an employee's requests, optionally only those created after `created_after`.
    async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<PageResponse<TimeOffRequest<D>>, StoreError>;

    /// Lists pending requests submitted by any of `employees`.
    async fn list_pending_for(
        &self,
        employees: &[EmployeeId],
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError>;

    /// Lists approved requests of an employee whose period intersects `period`.
    async fn find_approved_overlapping(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError>;

    /// Finds a pending or approved request of an employee with exactly `period`.
    async fn find_duplicate(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError>;

    /// Finds an approved request of an employee covering `date`.
    async fn find_active_on(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError>;

    /// Applies a decision if and only if the request is still pending.
    ///
    /// Returns [`StoreError::StatusMismatch`] when another decision got there first.
    async fn record_decision(
        &self,
        id: RequestId,
        decision: &Decision,
    ) -> Result<TimeOffRequest<D>, StoreError>;
}

/// Storage for the leave-type catalogue.
#[async_trait]
pub trait LeaveTypeStore: Send + Sync {
    /// Finds a leave type by ID.
    async fn find(&self, id: LeaveTypeId) -> Result<Option<LeaveType>, StoreError>;

    /// Finds a leave type by its unique code.
    async fn find_by_code(&self, code: &str) -> Result<Option<LeaveType>, StoreError>;

    /// Lists leave types ordered by code.
    async fn list(&self, active_only: bool) -> Result<Vec<LeaveType>, StoreError>;

    /// Lists leave types that draw on the quota ledger.
    async fn list_consuming_quota(&self) -> Result<Vec<LeaveType>, StoreError> {
        Ok(self
            .list(false)
            .await?
            .into_iter()
            .filter(|leave_type| leave_type.consumes_quota)
            .collect())
    }

    /// Inserts a new leave type. Fails with [`StoreError::Conflict`] on a duplicate code.
    async fn insert(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError>;

    /// Replaces an existing leave type.
    async fn update(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError>;
}
