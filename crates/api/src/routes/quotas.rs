//! Quota balance routes.
//!
//! Employees read their own balance and supervisors their team's. Creating,
//! overwriting and resetting entries requires the `hr_admin` role.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use leavedesk_core::quota::{QuotaBalance, QuotaSummary};
use leavedesk_shared::Role;
use leavedesk_shared::types::EmployeeId;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the quota routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotas", get(list_year).post(create_quota))
        .route("/quotas/mine", get(my_quota))
        .route("/quotas/team", get(team_quotas))
        .route("/quotas/reset", post(reset_year))
        .route("/quotas/{employee_id}", put(set_allotment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Optional `?year=` filter; defaults to the current year.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// Calendar year.
    pub year: Option<i32>,
}

/// Request body for creating an initial entry.
#[derive(Debug, Deserialize)]
pub struct CreateQuotaRequest {
    /// Owner.
    pub employee_id: EmployeeId,
    /// Calendar year.
    pub year: i32,
    /// Days granted; the configured default when omitted.
    #[serde(default)]
    pub allotment: Option<u32>,
}

/// Request body for overwriting the remaining days.
#[derive(Debug, Deserialize)]
pub struct SetAllotmentRequest {
    /// New remaining days.
    pub allotment: u32,
}

/// Request body for a yearly reset.
#[derive(Debug, Deserialize)]
pub struct ResetYearRequest {
    /// Calendar year.
    pub year: i32,
    /// Days every entry starts over with.
    pub allotment: u32,
}

/// Response for a yearly reset.
#[derive(Debug, Serialize)]
pub struct ResetYearResponse {
    /// Calendar year.
    pub year: i32,
    /// Entries reset.
    pub entries: u64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/quotas/mine` - The caller's balance.
async fn my_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Json<QuotaSummary>, ApiError> {
    let summary = state.quota.summary(auth.employee_id(), query.year).await?;
    Ok(Json(summary))
}

/// GET `/quotas/team` - Balances of the caller's direct reports.
async fn team_quotas(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<QuotaSummary>>, ApiError> {
    let summaries = state
        .quota
        .team_summaries(auth.employee_id(), query.year)
        .await?;
    Ok(Json(summaries))
}

/// GET `/quotas` - Every entry of a year.
async fn list_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<QuotaSummary>>, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    let year = query.year.unwrap_or_else(|| state.quota.current_year());
    Ok(Json(state.quota.list_year(year).await?))
}

/// POST `/quotas` - Create the entry for an employee and year.
async fn create_quota(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateQuotaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    let entry = state
        .quota
        .create_initial(body.employee_id, body.year, body.allotment)
        .await?;
    Ok((StatusCode::CREATED, Json(entry.summary())))
}

/// PUT `/quotas/{employee_id}` - Overwrite the remaining days.
async fn set_allotment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(employee_id): Path<EmployeeId>,
    Query(query): Query<YearQuery>,
    Json(body): Json<SetAllotmentRequest>,
) -> Result<Json<QuotaSummary>, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    let year = query.year.unwrap_or_else(|| state.quota.current_year());
    let entry: QuotaBalance = state
        .quota
        .set_allotment(employee_id, year, body.allotment)
        .await?;
    Ok(Json(entry.summary()))
}

/// POST `/quotas/reset` - Start every entry of a year over.
async fn reset_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ResetYearRequest>,
) -> Result<Json<ResetYearResponse>, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    let entries = state.quota.reset_year(body.year, body.allotment).await?;
    Ok(Json(ResetYearResponse {
        year: body.year,
        entries,
    }))
}
