//! Workflow error types for the request lifecycle.
//!
//! Every variant belongs to one [`ErrorKind`]. Business-rule failures are
//! reported to the caller as-is; only [`ErrorKind::Infrastructure`] means
//! "try again later".

use chrono::NaiveDate;
use leavedesk_shared::types::{CityId, EmployeeId, LeaveTypeId, RequestId};
use thiserror::Error;

use crate::ports::StoreError;
use crate::quota::QuotaError;
use crate::workflow::types::RequestStatus;

/// Error taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Employee, request, leave type or city missing.
    NotFound,
    /// Bad dates or a duration outside the leave type's bounds.
    InvalidRange,
    /// Overlapping approved request or duplicate submission.
    Conflict,
    /// Not enough quota left.
    InsufficientBalance,
    /// Decision attempted on a request that is no longer pending.
    NotPending,
    /// Caller may not decide or view the request.
    Unauthorized,
    /// Malformed or incomplete input.
    ValidationFailed,
    /// Storage fault; the caller may retry.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidRange => "invalid_range",
            Self::Conflict => "conflict",
            Self::InsufficientBalance => "insufficient_balance",
            Self::NotPending => "not_pending",
            Self::Unauthorized => "unauthorized",
            Self::ValidationFailed => "validation_failed",
            Self::Infrastructure => "infrastructure",
        }
    }

    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidRange | Self::ValidationFailed => 400,
            Self::Conflict | Self::NotPending => 409,
            Self::InsufficientBalance => 422,
            Self::Unauthorized => 403,
            Self::Infrastructure => 503,
        }
    }
}

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Employee not found.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// Request not found.
    #[error("Request {0} not found")]
    RequestNotFound(RequestId),

    /// Leave type not found.
    #[error("Leave type {0} not found")]
    LeaveTypeNotFound(LeaveTypeId),

    /// Destination city not found.
    #[error("City {0} not found")]
    CityNotFound(CityId),

    /// Start date after end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Duration outside the leave type's bounds.
    #[error("{days} days is outside the allowed duration for leave type {leave_type}")]
    DurationOutOfBounds {
        /// Requested inclusive days.
        days: u32,
        /// Leave type code.
        leave_type: String,
        /// Lower bound, if any.
        min: Option<u32>,
        /// Upper bound, if any.
        max: Option<u32>,
    },

    /// Request starts before today.
    #[error("Start date {start} is before today ({today})")]
    Backdated {
        /// Requested start.
        start: NaiveDate,
        /// Current date.
        today: NaiveDate,
    },

    /// An approved request already covers part of the period.
    #[error("Dates overlap approved request {existing}")]
    OverlappingApproved {
        /// The approved request.
        existing: RequestId,
    },

    /// A pending or approved request with the same dates exists.
    #[error("A request for the same dates already exists: {existing}")]
    DuplicateRequest {
        /// The existing request.
        existing: RequestId,
    },

    /// Not enough quota.
    #[error("Insufficient leave balance: {available} days available, {requested} requested")]
    InsufficientBalance {
        /// Remaining days.
        available: u32,
        /// Days requested.
        requested: u32,
    },

    /// The request has already been decided.
    #[error("Request {id} is {status}, not pending")]
    NotPending {
        /// Request.
        id: RequestId,
        /// Current status.
        status: RequestStatus,
    },

    /// The caller is not the requester's direct supervisor.
    #[error("Employee {supervisor_id} is not the direct supervisor of the requester")]
    NotDirectSupervisor {
        /// Caller.
        supervisor_id: EmployeeId,
    },

    /// The caller may not see the request.
    #[error("Request {0} is not visible to the caller")]
    NotVisible(RequestId),

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Caller-supplied total days disagree with the date range.
    #[error("Total days {supplied} does not match the {derived} days in the date range")]
    TotalDaysMismatch {
        /// Supplied value.
        supplied: u32,
        /// Inclusive calendar days of the range.
        derived: u32,
    },

    /// Leave type is deactivated.
    #[error("Leave type {0} is not active")]
    LeaveTypeInactive(String),

    /// Destination city is deactivated.
    #[error("City {0} is not active")]
    CityInactive(String),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl WorkflowError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound(_)
            | Self::RequestNotFound(_)
            | Self::LeaveTypeNotFound(_)
            | Self::CityNotFound(_)
            | Self::Storage(StoreError::Missing(_)) => ErrorKind::NotFound,

            Self::InvalidRange { .. }
            | Self::DurationOutOfBounds { .. }
            | Self::Backdated { .. } => ErrorKind::InvalidRange,

            Self::OverlappingApproved { .. }
            | Self::DuplicateRequest { .. }
            | Self::Storage(StoreError::Conflict(_)) => ErrorKind::Conflict,

            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,

            Self::NotPending { .. } | Self::Storage(StoreError::StatusMismatch { .. }) => {
                ErrorKind::NotPending
            }

            Self::NotDirectSupervisor { .. } | Self::NotVisible(_) => ErrorKind::Unauthorized,

            Self::RejectionReasonRequired
            | Self::TotalDaysMismatch { .. }
            | Self::LeaveTypeInactive(_)
            | Self::CityInactive(_) => ErrorKind::ValidationFailed,

            Self::Storage(StoreError::Unavailable(_) | StoreError::Corrupt(_)) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Returns true for storage faults the caller may retry.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self.kind(), ErrorKind::Infrastructure)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::LeaveTypeNotFound(_) => "LEAVE_TYPE_NOT_FOUND",
            Self::CityNotFound(_) => "CITY_NOT_FOUND",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::DurationOutOfBounds { .. } => "DURATION_OUT_OF_BOUNDS",
            Self::Backdated { .. } => "BACKDATED_REQUEST",
            Self::OverlappingApproved { .. } => "OVERLAPPING_REQUEST",
            Self::DuplicateRequest { .. } => "DUPLICATE_REQUEST",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NotPending { .. } | Self::Storage(StoreError::StatusMismatch { .. }) => {
                "NOT_PENDING"
            }
            Self::NotDirectSupervisor { .. } => "NOT_DIRECT_SUPERVISOR",
            Self::NotVisible(_) => "REQUEST_NOT_VISIBLE",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::TotalDaysMismatch { .. } => "TOTAL_DAYS_MISMATCH",
            Self::LeaveTypeInactive(_) => "LEAVE_TYPE_INACTIVE",
            Self::CityInactive(_) => "CITY_INACTIVE",
            Self::Storage(StoreError::Conflict(_)) => "CONFLICT",
            Self::Storage(StoreError::Missing(_)) => "NOT_FOUND",
            Self::Storage(StoreError::Unavailable(_) | StoreError::Corrupt(_)) => {
                "STORAGE_UNAVAILABLE"
            }
        }
    }
}

impl From<QuotaError> for WorkflowError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::InsufficientBalance {
                available,
                requested,
            } => Self::InsufficientBalance {
                available,
                requested,
            },
            QuotaError::EmployeeNotFound(id) => Self::EmployeeNotFound(id),
            QuotaError::Storage(store) => Self::Storage(store),
            other @ (QuotaError::NotFound { .. }
            | QuotaError::AlreadyExists { .. }
            | QuotaError::InvalidYear(_)) => {
                Self::Storage(StoreError::Corrupt(other.to_string()))
            }
        }
    }
}
