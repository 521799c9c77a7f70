//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for leave and business-travel requests, quotas and
//!   the leave-type catalogue
//! - Bearer-token authentication middleware and role guards
//! - Error-to-HTTP mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use leavedesk_core::leave_type::LeaveTypeService;
use leavedesk_core::quota::QuotaService;
use leavedesk_core::workflow::{LeaveWorkflow, TravelWorkflow, WorkflowContext};
use leavedesk_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Leave request workflow.
    pub leave: Arc<LeaveWorkflow>,
    /// Business-travel request workflow.
    pub travel: Arc<TravelWorkflow>,
    /// Quota queries and administration.
    pub quota: Arc<QuotaService>,
    /// Leave-type catalogue.
    pub leave_types: Arc<LeaveTypeService>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Builds the services on top of a wired workflow context.
    #[must_use]
    pub fn new(ctx: &WorkflowContext, jwt_service: JwtService) -> Self {
        Self {
            leave: Arc::new(LeaveWorkflow::new(ctx)),
            travel: Arc::new(TravelWorkflow::new(ctx)),
            quota: Arc::new(QuotaService::new(
                ctx.ledger.clone(),
                ctx.directory.clone(),
                ctx.clock.clone(),
            )),
            leave_types: Arc::new(LeaveTypeService::new(
                ctx.leave_types.clone(),
                ctx.clock.clone(),
            )),
            jwt_service: Arc::new(jwt_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
