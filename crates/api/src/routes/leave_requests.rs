//! Leave request routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use leavedesk_core::workflow::{LeaveRequest, NewLeaveRequest};
use leavedesk_shared::types::{EmployeeId, LeaveTypeId, PageRequest, PageResponse, RequestId};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the leave request routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leave-requests", post(create_leave_request))
        .route("/leave-requests/mine", get(my_leave_requests))
        .route("/leave-requests/pending", get(pending_leave_requests))
        .route("/leave-requests/current", get(current_leave))
        .route("/leave-requests/{id}", get(get_leave_request))
        .route("/leave-requests/{id}/approve", post(approve_leave_request))
        .route("/leave-requests/{id}/reject", post(reject_leave_request))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting leave. The requester is the caller.
#[derive(Debug, Deserialize)]
pub struct CreateLeaveRequest {
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Optional day count; must match the range when given.
    #[serde(default)]
    pub total_days: Option<u32>,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query parameters for request history.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Only requests created within the last `days` days.
    pub days: Option<u32>,
}

impl HistoryQuery {
    /// Clamped page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

/// Request body for approving.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    /// Optional approval note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request body for rejecting.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    /// Mandatory, non-blank reason.
    #[serde(default)]
    pub reason: String,
}

/// Response for a leave request.
#[derive(Debug, Serialize)]
pub struct LeaveRequestResponse {
    /// External ID.
    pub id: RequestId,
    /// Requester.
    pub employee_id: EmployeeId,
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive calendar days.
    pub total_days: u32,
    /// Free-text reason.
    pub reason: Option<String>,
    /// `pending`, `approved` or `rejected`.
    pub status: &'static str,
    /// Deciding supervisor.
    pub approver_id: Option<EmployeeId>,
    /// Decision time.
    pub decided_at: Option<DateTime<Utc>>,
    /// Approval note.
    pub approval_note: Option<String>,
    /// Rejection reason.
    pub rejection_reason: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<LeaveRequest> for LeaveRequestResponse {
    fn from(r: LeaveRequest) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            leave_type_id: r.details.leave_type_id,
            start_date: r.period.start(),
            end_date: r.period.end(),
            total_days: r.details.total_days,
            reason: r.reason,
            status: r.status.as_str(),
            approver_id: r.approver_id,
            decided_at: r.decided_at,
            approval_note: r.approval_note,
            rejection_reason: r.rejection_reason,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn to_responses(requests: Vec<LeaveRequest>) -> Vec<LeaveRequestResponse> {
    requests.into_iter().map(LeaveRequestResponse::from).collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/leave-requests` - Submit a leave request.
async fn create_leave_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateLeaveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .leave
        .create(NewLeaveRequest {
            employee_id: auth.employee_id(),
            leave_type_id: body.leave_type_id,
            start_date: body.start_date,
            end_date: body.end_date,
            total_days: body.total_days,
            reason: body.reason,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LeaveRequestResponse::from(request)),
    ))
}

/// GET `/leave-requests/mine` - The caller's leave requests, newest first.
async fn my_leave_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PageResponse<LeaveRequestResponse>>, ApiError> {
    let page = state
        .leave
        .page_for_employee(auth.employee_id(), query.page_request(), query.days)
        .await?;
    Ok(Json(page.map(LeaveRequestResponse::from)))
}

/// GET `/leave-requests/pending` - Pending requests of the caller's direct reports.
async fn pending_leave_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LeaveRequestResponse>>, ApiError> {
    let requests = state.leave.pending_for_supervisor(auth.employee_id()).await?;
    Ok(Json(to_responses(requests)))
}

/// GET `/leave-requests/current` - Approved leave covering today, or `null`.
async fn current_leave(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<LeaveRequestResponse>>, ApiError> {
    let current = state.leave.current(auth.employee_id()).await?;
    Ok(Json(current.map(LeaveRequestResponse::from)))
}

/// GET `/leave-requests/{id}`
async fn get_leave_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
) -> Result<Json<LeaveRequestResponse>, ApiError> {
    let request = state.leave.get(id, auth.viewer()).await?;
    Ok(Json(request.into()))
}

/// POST `/leave-requests/{id}/approve` - Approve and deduct quota.
async fn approve_leave_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<LeaveRequestResponse>, ApiError> {
    let request = state
        .leave
        .approve(id, auth.employee_id(), body.note)
        .await?;
    Ok(Json(request.into()))
}

/// POST `/leave-requests/{id}/reject`
async fn reject_leave_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<LeaveRequestResponse>, ApiError> {
    let request = state
        .leave
        .reject(id, auth.employee_id(), &body.reason)
        .await?;
    Ok(Json(request.into()))
}
