//! Business-travel request routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use leavedesk_core::workflow::{NewTravelRequest, TravelRequest};
use leavedesk_shared::types::{CityId, EmployeeId, PageResponse, RequestId};
use serde::{Deserialize, Serialize};

use super::leave_requests::{ApproveRequest, HistoryQuery, RejectRequest};
use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the business-travel routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/business-travel-requests", post(create_travel_request))
        .route("/business-travel-requests/mine", get(my_travel_requests))
        .route(
            "/business-travel-requests/pending",
            get(pending_travel_requests),
        )
        .route("/business-travel-requests/current", get(current_trip))
        .route("/business-travel-requests/{id}", get(get_travel_request))
        .route(
            "/business-travel-requests/{id}/approve",
            post(approve_travel_request),
        )
        .route(
            "/business-travel-requests/{id}/reject",
            post(reject_travel_request),
        )
}

/// Request body for submitting a trip. The traveller is the caller.
#[derive(Debug, Deserialize)]
pub struct CreateTravelRequest {
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

/// Response for a business-travel request.
#[derive(Debug, Serialize)]
pub struct TravelRequestResponse {
    /// External ID.
    pub id: RequestId,
    /// Traveller.
    pub employee_id: EmployeeId,
    /// Destination city.
    pub city_id: CityId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive calendar days.
    pub total_days: u32,
    /// Purpose of the trip.
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

impl From<TravelRequest> for TravelRequestResponse {
    fn from(r: TravelRequest) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            city_id: r.details.city_id,
            start_date: r.period.start(),
            end_date: r.period.end(),
            total_days: r.period.days(),
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

async fn create_travel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTravelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .travel
        .create(NewTravelRequest {
            employee_id: auth.employee_id(),
            city_id: body.city_id,
            start_date: body.start_date,
            end_date: body.end_date,
            reason: body.reason,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TravelRequestResponse::from(request)),
    ))
}

async fn my_travel_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PageResponse<TravelRequestResponse>>, ApiError> {
    let page = state
        .travel
        .page_for_employee(auth.employee_id(), query.page_request(), query.days)
        .await?;
    Ok(Json(page.map(TravelRequestResponse::from)))
}

async fn pending_travel_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<TravelRequestResponse>>, ApiError> {
    let requests = state
        .travel
        .pending_for_supervisor(auth.employee_id())
        .await?;
    Ok(Json(
        requests
            .into_iter()
            .map(TravelRequestResponse::from)
            .collect(),
    ))
}

async fn current_trip(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<TravelRequestResponse>>, ApiError> {
    let current = state.travel.current(auth.employee_id()).await?;
    Ok(Json(current.map(TravelRequestResponse::from)))
}

async fn get_travel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
) -> Result<Json<TravelRequestResponse>, ApiError> {
    let request = state.travel.get(id, auth.viewer()).await?;
    Ok(Json(request.into()))
}

async fn approve_travel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<TravelRequestResponse>, ApiError> {
    let request = state
        .travel
        .approve(id, auth.employee_id(), body.note)
        .await?;
    Ok(Json(request.into()))
}

async fn reject_travel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<TravelRequestResponse>, ApiError> {
    let request = state
        .travel
        .reject(id, auth.employee_id(), &body.reason)
        .await?;
    Ok(Json(request.into()))
}
