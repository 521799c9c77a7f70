//! Router tests against the in-memory backend.

// Allow common test patterns that trigger clippy warnings
#![allow(clippy::too_many_lines)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, NaiveDate, Utc};
use http_body_util::BodyExt;
use leavedesk_api::{AppState, create_router};
use leavedesk_core::leave_type::LeaveType;
use leavedesk_core::memory::MemoryBackend;
use leavedesk_core::notify::LogNotifier;
use leavedesk_core::ports::{City, Employee, FixedClock, LeaveTypeStore, RequestStore};
use leavedesk_core::workflow::{DateRange, LeaveDetails, SubmissionPolicy, TimeOffRequest};
use leavedesk_shared::types::{CityId, LeaveTypeId};
use leavedesk_shared::{JwtConfig, JwtService, Role};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    backend: MemoryBackend,
    employee_token: String,
    teammate_token: String,
    supervisor_token: String,
    admin_token: String,
    employee: Employee,
    annual_id: LeaveTypeId,
    city_id: CityId,
}

async fn setup() -> TestApp {
    let backend = MemoryBackend::new(12);

    let supervisor = Employee::new("Sari Wulandari", None);
    let employee = Employee::new("Dewi Lestari", Some(supervisor.id));
    let teammate = Employee::new("Agus Pratama", Some(supervisor.id));
    let admin = Employee::new("Rina Hartono", None);
    for e in [&supervisor, &employee, &teammate, &admin] {
        backend.directory.add_employee(e.clone());
    }

    let now = Utc::now();
    let annual = LeaveType {
        id: LeaveTypeId::new(),
        code: "ANNUAL".into(),
        name: "Annual leave".into(),
        description: None,
        min_duration_days: None,
        max_duration_days: Some(20),
        consumes_quota: true,
        is_paid: true,
        requires_document: false,
        active: true,
        created_at: now,
        updated_at: now,
    };
    backend.leave_types.insert(annual.clone()).await.unwrap();

    let city = City {
        id: CityId::new(),
        name: "Surabaya".into(),
        province: "Jawa Timur".into(),
        active: true,
    };
    backend.directory.add_city(city.clone());

    let clock = Arc::new(FixedClock(at(2026, 3, 1, 15)));
    let ctx = backend.context(clock, Arc::new(LogNotifier), SubmissionPolicy::default());

    let jwt = JwtService::new(JwtConfig {
        secret: "test-secret-for-router-tests".into(),
        access_token_expires_minutes: 5,
    });
    let token = |e: &Employee, roles: Vec<Role>| {
        jwt.generate_access_token(e.id.into_inner(), roles).unwrap()
    };

    TestApp {
        employee_token: token(&employee, vec![Role::Employee]),
        teammate_token: token(&teammate, vec![Role::Employee]),
        supervisor_token: token(&supervisor, vec![Role::Employee, Role::Supervisor]),
        admin_token: token(&admin, vec![Role::Employee, Role::HrAdmin]),
        router: create_router(AppState::new(&ctx, jwt.clone())),
        backend,
        employee,
        annual_id: annual.id,
        city_id: city.id,
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

impl TestApp {
    async fn submit_leave(&self, start: &str, end: &str) -> (StatusCode, Value) {
        send(
            &self.router,
            Method::POST,
            "/api/v1/leave-requests",
            Some(&self.employee_token),
            Some(json!({
                "leave_type_id": self.annual_id,
                "start_date": start,
                "end_date": end,
                "reason": "Family visit"
            })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup().await;
    let (status, body) = send(&app.router, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = setup().await;

    let (status, body) =
        send(&app.router, Method::GET, "/api/v1/leave-requests/mine", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(
        body["message"],
        "Authentication failed: Authorization header with Bearer token is required"
    );

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-requests/mine",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Authentication failed: Invalid or malformed token");
}

#[tokio::test]
async fn test_leave_request_lifecycle() {
    let app = setup().await;

    let (status, created) = app.submit_leave("2026-03-10", "2026-03-12").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["total_days"], 3);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, pending) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-requests/pending",
        Some(&app.supervisor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, approved) = send(
        &app.router,
        Method::POST,
        &format!("/api/v1/leave-requests/{id}/approve"),
        Some(&app.supervisor_token),
        Some(json!({ "note": "Enjoy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approval_note"], "Enjoy");

    let (status, quota) = send(
        &app.router,
        Method::GET,
        "/api/v1/quotas/mine?year=2026",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quota["remaining_days"], 9);
    assert_eq!(quota["used_days"], 3);

    let (status, body) = send(
        &app.router,
        Method::POST,
        &format!("/api/v1/leave-requests/{id}/reject"),
        Some(&app.supervisor_token),
        Some(json!({ "reason": "Too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NOT_PENDING");
}

#[tokio::test]
async fn test_decision_errors_map_to_status_codes() {
    let app = setup().await;
    let (_, created) = app.submit_leave("2026-03-10", "2026-03-11").await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        Method::POST,
        &format!("/api/v1/leave-requests/{id}/approve"),
        Some(&app.teammate_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NOT_DIRECT_SUPERVISOR");

    let (status, body) = send(
        &app.router,
        Method::POST,
        &format!("/api/v1/leave-requests/{id}/reject"),
        Some(&app.supervisor_token),
        Some(json!({ "reason": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "REJECTION_REASON_REQUIRED");

    let (status, body) = app.submit_leave("2026-03-20", "2026-04-02").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INSUFFICIENT_BALANCE");

    let (status, body) = app.submit_leave("2026-02-20", "2026-02-21").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BACKDATED_REQUEST");
}

#[tokio::test]
async fn test_request_visibility() {
    let app = setup().await;
    let (_, created) = app.submit_leave("2026-03-10", "2026-03-11").await;
    let uri = format!("/api/v1/leave-requests/{}", created["id"].as_str().unwrap());

    for token in [&app.employee_token, &app.supervisor_token, &app.admin_token] {
        let (status, body) = send(&app.router, Method::GET, &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
    }

    let (status, body) =
        send(&app.router, Method::GET, &uri, Some(&app.teammate_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "REQUEST_NOT_VISIBLE");
}

#[tokio::test]
async fn test_history_is_paginated() {
    let app = setup().await;
    app.submit_leave("2026-03-10", "2026-03-11").await;
    app.submit_leave("2026-03-20", "2026-03-20").await;

    let (status, page) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-requests/mine?page=1&per_page=1",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["meta"]["total"], 2);
    assert_eq!(page["meta"]["total_pages"], 2);
}

#[tokio::test]
async fn test_history_filters_by_creation_day() {
    let app = setup().await;
    app.submit_leave("2026-03-10", "2026-03-11").await;
    for created_at in [at(2026, 2, 22, 9), at(2026, 2, 21, 9)] {
        let period = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        )
        .unwrap();
        app.backend
            .leave_requests
            .insert(TimeOffRequest::submitted(
                app.employee.id,
                period,
                None,
                LeaveDetails {
                    leave_type_id: app.annual_id,
                    total_days: 1,
                },
                created_at,
            ))
            .await
            .unwrap();
    }

    let (status, recent) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-requests/mine?days=7",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recent["meta"]["total"], 2);

    let (_, all) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-requests/mine",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(all["meta"]["total"], 3);
}

#[tokio::test]
async fn test_travel_over_approved_leave_is_refused() {
    let app = setup().await;
    let (_, leave) = app.submit_leave("2026-03-10", "2026-03-12").await;
    send(
        &app.router,
        Method::POST,
        &format!("/api/v1/leave-requests/{}/approve", leave["id"].as_str().unwrap()),
        Some(&app.supervisor_token),
        Some(json!({})),
    )
    .await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/v1/business-travel-requests",
        Some(&app.employee_token),
        Some(json!({
            "city_id": app.city_id,
            "start_date": "2026-03-12",
            "end_date": "2026-03-14",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "OVERLAPPING_REQUEST");

    let (status, trip) = send(
        &app.router,
        Method::POST,
        "/api/v1/business-travel-requests",
        Some(&app.employee_token),
        Some(json!({
            "city_id": app.city_id,
            "start_date": "2026-03-13",
            "end_date": "2026-03-14",
            "reason": "Vendor audit"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trip["total_days"], 2);
    assert_eq!(trip["status"], "pending");
}

#[tokio::test]
async fn test_quota_administration_requires_hr_admin() {
    let app = setup().await;
    let body = json!({ "employee_id": app.employee.id, "year": 2027 });

    let (status, err) = send(
        &app.router,
        Method::POST,
        "/api/v1/quotas",
        Some(&app.employee_token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "FORBIDDEN");

    let (status, created) = send(
        &app.router,
        Method::POST,
        "/api/v1/quotas",
        Some(&app.admin_token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["allotment"], 12);

    let (status, err) = send(
        &app.router,
        Method::POST,
        "/api/v1/quotas",
        Some(&app.admin_token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "QUOTA_ALREADY_EXISTS");

    let (status, updated) = send(
        &app.router,
        Method::PUT,
        &format!("/api/v1/quotas/{}?year=2027", app.employee.id),
        Some(&app.admin_token),
        Some(json!({ "allotment": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["remaining_days"], 15);

    let (status, listed) = send(
        &app.router,
        Method::GET,
        "/api/v1/quotas?year=2027",
        Some(&app.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, reset) = send(
        &app.router,
        Method::POST,
        "/api/v1/quotas/reset",
        Some(&app.admin_token),
        Some(json!({ "year": 2027, "allotment": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reset["entries"], 1);
}

#[tokio::test]
async fn test_team_quotas_cover_direct_reports() {
    let app = setup().await;
    let (status, team) = send(
        &app.router,
        Method::GET,
        "/api/v1/quotas/team?year=2026",
        Some(&app.supervisor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_leave_type_catalogue() {
    let app = setup().await;
    let input = json!({
        "code": "sick",
        "name": "Sick leave",
        "max_duration_days": 14,
        "is_paid": true
    });

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/v1/leave-types",
        Some(&app.employee_token),
        Some(input.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app.router,
        Method::POST,
        "/api/v1/leave-types",
        Some(&app.admin_token),
        Some(input.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["code"], "SICK");
    assert_eq!(created["active"], true);

    let (status, err) = send(
        &app.router,
        Method::POST,
        "/api/v1/leave-types",
        Some(&app.admin_token),
        Some(input),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "DUPLICATE_CODE");

    let (_, listed) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-types",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (_, quota_types) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-types?consumes_quota=true",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(quota_types.as_array().unwrap().len(), 1);

    let uri = format!("/api/v1/leave-types/{}", created["id"].as_str().unwrap());
    let (status, deactivated) =
        send(&app.router, Method::DELETE, &uri, Some(&app.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["active"], false);

    let (_, listed) = send(
        &app.router,
        Method::GET,
        "/api/v1/leave-types",
        Some(&app.employee_token),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
