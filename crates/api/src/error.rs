//! Error-to-HTTP mapping.
//!
//! Every failure leaves the API as `{"error": CODE, "message": TEXT}` with
//! the status code chosen by the domain error itself.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leavedesk_core::leave_type::LeaveTypeError;
use leavedesk_core::quota::QuotaError;
use leavedesk_core::workflow::{ErrorKind, WorkflowError};
use leavedesk_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// An error ready to be rendered as a JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        match e.kind() {
            ErrorKind::Infrastructure => {
                error!(error = %e, "Workflow storage fault");
                return Self::new(
                    e.status_code(),
                    e.error_code(),
                    "Storage is temporarily unavailable, retry later".to_string(),
                );
            }
            ErrorKind::Unauthorized => warn!(error = %e, "Workflow access denied"),
            _ => {}
        }
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<QuotaError> for ApiError {
    fn from(e: QuotaError) -> Self {
        if e.status_code() == 503 {
            error!(error = %e, "Quota storage fault");
            return Self::new(
                503,
                e.error_code(),
                "Storage is temporarily unavailable, retry later".to_string(),
            );
        }
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<LeaveTypeError> for ApiError {
    fn from(e: LeaveTypeError) -> Self {
        if e.status_code() == 503 {
            error!(error = %e, "Leave type storage fault");
            return Self::new(
                503,
                e.error_code(),
                "Storage is temporarily unavailable, retry later".to_string(),
            );
        }
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::new(e.status_code(), e.error_code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}
