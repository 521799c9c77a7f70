//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use leavedesk_core::workflow::Viewer;
use leavedesk_shared::types::EmployeeId;
use leavedesk_shared::{AppError, Claims, JwtError, Role};
use tracing::debug;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("Authorization header with Bearer token is required")
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let message = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            unauthorized(message).into_response()
        }
    }
}

fn unauthorized(message: &str) -> ApiError {
    AppError::Unauthorized(message.to_owned()).into()
}

/// Extractor for the authenticated employee's claims.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let employee_id = auth.employee_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the employee ID from the claims.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        EmployeeId::from_uuid(self.0.employee_id())
    }

    /// Returns true if the caller holds the HR administrator role.
    #[must_use]
    pub fn is_hr_admin(&self) -> bool {
        self.0.has_role(Role::HrAdmin)
    }

    /// The caller as seen by request visibility checks.
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer {
            employee_id: self.employee_id(),
            is_hr_admin: self.is_hr_admin(),
        }
    }

    /// Fails with `403 FORBIDDEN` unless the caller holds `role`.
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.0.has_role(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("{} role required", role.as_str())).into())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn user(roles: Vec<Role>) -> AuthUser {
        AuthUser(Claims::new(
            Uuid::new_v4(),
            roles,
            Utc::now() + Duration::minutes(5),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_unauthorized_uses_shared_code() {
        let err = unauthorized("Token has expired");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.message(), "Authentication failed: Token has expired");
    }

    #[test]
    fn test_require_role() {
        let admin = user(vec![Role::Employee, Role::HrAdmin]);
        assert!(admin.require_role(Role::HrAdmin).is_ok());
        assert!(admin.viewer().is_hr_admin);

        let employee = user(vec![Role::Employee]);
        let err = employee.require_role(Role::HrAdmin).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(!employee.viewer().is_hr_admin);
        assert_eq!(employee.viewer().employee_id, employee.employee_id());
    }
}
