//! Leave-type catalogue routes. Reads are open to every employee, writes
//! require the `hr_admin` role.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use leavedesk_core::leave_type::{LeaveType, LeaveTypeInput};
use leavedesk_shared::Role;
use leavedesk_shared::types::LeaveTypeId;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the leave-type routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leave-types", get(list_leave_types).post(create_leave_type))
        .route(
            "/leave-types/{id}",
            get(get_leave_type)
                .put(update_leave_type)
                .delete(deactivate_leave_type),
        )
}

/// Listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only types that draw on the quota ledger.
    #[serde(default)]
    pub consumes_quota: bool,
}

/// GET `/leave-types` - Active types.
async fn list_leave_types(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LeaveType>>, ApiError> {
    let types = if query.consumes_quota {
        state.leave_types.list_consuming_quota().await?
    } else {
        state.leave_types.list_active().await?
    };
    Ok(Json(types))
}

async fn get_leave_type(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<LeaveTypeId>,
) -> Result<Json<LeaveType>, ApiError> {
    Ok(Json(state.leave_types.get(id).await?))
}

async fn create_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<LeaveTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    let created = state.leave_types.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LeaveTypeId>,
    Json(body): Json<LeaveTypeInput>,
) -> Result<Json<LeaveType>, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    Ok(Json(state.leave_types.update(id, body).await?))
}

/// DELETE `/leave-types/{id}` - Soft delete; existing requests keep the type.
async fn deactivate_leave_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LeaveTypeId>,
) -> Result<Json<LeaveType>, ApiError> {
    auth.require_role(Role::HrAdmin)?;
    Ok(Json(state.leave_types.deactivate(id).await?))
}
