//! Leave-type catalogue errors.

use leavedesk_shared::types::LeaveTypeId;
use thiserror::Error;

use crate::ports::StoreError;

/// Errors that can occur while administering leave types.
#[derive(Debug, Error)]
pub enum LeaveTypeError {
    /// Leave type not found.
    #[error("Leave type {0} not found")]
    NotFound(String),

    /// Another leave type already uses the code.
    #[error("Leave type code {0} already exists")]
    DuplicateCode(String),

    /// Invalid input.
    #[error("Invalid leave type: {0}")]
    Validation(String),

    /// Storage fault.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LeaveTypeError {
    /// Not found by ID.
    #[must_use]
    pub fn not_found(id: LeaveTypeId) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::Storage(StoreError::Missing(_)) => 404,
            Self::DuplicateCode(_) | Self::Storage(StoreError::Conflict(_)) => 409,
            Self::Validation(_) => 400,
            Self::Storage(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::Storage(StoreError::Missing(_)) => "LEAVE_TYPE_NOT_FOUND",
            Self::DuplicateCode(_) | Self::Storage(StoreError::Conflict(_)) => "DUPLICATE_CODE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}
