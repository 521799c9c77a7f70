//! End-to-end business-travel workflow tests against the in-memory stores.

mod common;

use common::{Harness, day};
use leavedesk_core::workflow::{
    ErrorKind, NewTravelRequest, RequestKind, RequestStatus, Viewer, WorkflowError,
};
use leavedesk_shared::types::CityId;

#[tokio::test]
async fn test_trip_lifecycle_does_not_touch_quota() {
    let h = Harness::new().await;
    let trip = h
        .travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap();
    assert_eq!(trip.status, RequestStatus::Pending);
    assert_eq!(trip.kind(), RequestKind::BusinessTravel);
    assert_eq!(trip.details.city_id, h.jakarta.id);

    let approved = h
        .travel
        .approve(trip.id, h.supervisor.id, None)
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(h.remaining().await, 12);
}

#[tokio::test]
async fn test_destination_must_exist_and_be_active() {
    let h = Harness::new().await;

    let err = h
        .travel
        .create(NewTravelRequest {
            city_id: CityId::new(),
            ..h.trip(day(3, 10), day(3, 12))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::CityNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = h
        .travel
        .create(NewTravelRequest {
            city_id: h.closed_city.id,
            ..h.trip(day(3, 10), day(3, 12))
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_trip_over_approved_leave_is_refused() {
    let h = Harness::new().await;
    let leave = h
        .leave
        .create(h.annual_leave(day(3, 10), day(3, 12)))
        .await
        .unwrap();
    h.leave.approve(leave.id, h.supervisor.id, None).await.unwrap();

    let err = h
        .travel
        .create(h.trip(day(3, 12), day(3, 15)))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::OverlappingApproved { existing } if existing == leave.id));
}

#[tokio::test]
async fn test_trip_over_pending_leave_is_accepted() {
    let h = Harness::new().await;
    h.leave
        .create(h.annual_leave(day(3, 10), day(3, 12)))
        .await
        .unwrap();

    assert!(h.travel.create(h.trip(day(3, 11), day(3, 11))).await.is_ok());
}

#[tokio::test]
async fn test_approval_rechecks_approved_trips_and_leave() {
    let h = Harness::new().await;
    let first = h
        .travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap();
    let second = h
        .travel
        .create(h.trip(day(3, 12), day(3, 13)))
        .await
        .unwrap();
    let third = h
        .travel
        .create(h.trip(day(3, 20), day(3, 22)))
        .await
        .unwrap();

    h.travel.approve(first.id, h.supervisor.id, None).await.unwrap();
    let err = h
        .travel
        .approve(second.id, h.supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Leave creation ignores approved travel, so this leave can be approved
    // and then blocks the third trip.
    let leave = h
        .leave
        .create(h.annual_leave(day(3, 21), day(3, 21)))
        .await
        .unwrap();
    h.leave.approve(leave.id, h.supervisor.id, None).await.unwrap();

    let err = h
        .travel
        .approve(third.id, h.supervisor.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::OverlappingApproved { existing } if existing == leave.id));
}

#[tokio::test]
async fn test_rejection_requires_reason_and_happens_once() {
    let h = Harness::new().await;
    let trip = h
        .travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap();

    let err = h
        .travel
        .reject(trip.id, h.supervisor.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::RejectionReasonRequired));

    let err = h
        .travel
        .reject(trip.id, h.other_manager.id, "Budget freeze")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let rejected = h
        .travel
        .reject(trip.id, h.supervisor.id, "Budget freeze")
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Budget freeze"));

    let err = h
        .travel
        .approve(trip.id, h.supervisor.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotPending);
}

#[tokio::test]
async fn test_duplicate_trip_is_refused() {
    let h = Harness::new().await;
    h.travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap();

    let err = h
        .travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateRequest { .. }));
}

#[tokio::test]
async fn test_backdated_trip_is_refused() {
    let h = Harness::new().await;
    let err = h
        .travel
        .create(h.trip(day(2, 27), day(3, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Backdated { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidRange);
}

#[tokio::test]
async fn test_trip_queries() {
    let h = Harness::on(day(3, 10)).await;
    let trip = h
        .travel
        .create(h.trip(day(3, 10), day(3, 12)))
        .await
        .unwrap();

    let pending = h.travel.pending_for_supervisor(h.supervisor.id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(h.travel.current(h.employee.id).await.unwrap().is_none());

    h.travel.approve(trip.id, h.supervisor.id, None).await.unwrap();
    assert_eq!(
        h.travel.current(h.employee.id).await.unwrap().map(|t| t.id),
        Some(trip.id)
    );
    assert!(
        h.travel
            .pending_for_supervisor(h.supervisor.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(h.travel.list_for_employee(h.employee.id).await.unwrap().len(), 1);
    assert!(h.leave.list_for_employee(h.employee.id).await.unwrap().is_empty());

    let err = h
        .travel
        .get(
            trip.id,
            Viewer {
                employee_id: h.teammate.id,
                is_hr_admin: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotVisible(_)));
}
