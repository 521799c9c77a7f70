//! Quota error types.

use leavedesk_shared::types::EmployeeId;
use thiserror::Error;

use crate::ports::StoreError;

/// Errors that can occur during quota operations.
#[derive(Debug, Error)]
pub enum QuotaError {
    /// Not enough days left for the requested deduction.
    #[error("Insufficient leave balance: {available} days available, {requested} requested")]
    InsufficientBalance {
        /// Remaining days at the time of the attempt.
        available: u32,
        /// Days requested.
        requested: u32,
    },

    /// No entry exists for the employee and year.
    #[error("No quota for employee {employee_id} in {year}")]
    NotFound {
        /// Employee.
        employee_id: EmployeeId,
        /// Year.
        year: i32,
    },

    /// The employee does not exist.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// An entry already exists for the employee and year.
    #[error("Quota for employee {employee_id} in {year} already exists")]
    AlreadyExists {
        /// Employee.
        employee_id: EmployeeId,
        /// Year.
        year: i32,
    },

    /// Year outside the supported range.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Storage fault.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl QuotaError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InsufficientBalance { .. } => 422,
            Self::NotFound { .. } | Self::EmployeeNotFound(_) => 404,
            Self::AlreadyExists { .. } => 409,
            Self::InvalidYear(_) => 400,
            Self::Storage(StoreError::Conflict(_)) => 409,
            Self::Storage(StoreError::Missing(_)) => 404,
            Self::Storage(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NotFound { .. } => "QUOTA_NOT_FOUND",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::AlreadyExists { .. } => "QUOTA_ALREADY_EXISTS",
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::Storage(StoreError::Conflict(_)) => "CONFLICT",
            Self::Storage(StoreError::Missing(_)) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}
