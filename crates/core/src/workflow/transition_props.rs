//! Property-based tests for decision rules.

use chrono::{TimeZone, Utc};
use leavedesk_shared::types::{EmployeeId, RequestId};
use proptest::prelude::*;
use uuid::Uuid;

use crate::ports::Employee;
use crate::workflow::error::WorkflowError;
use crate::workflow::transition::DecisionRules;
use crate::workflow::types::RequestStatus;

fn arb_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Rejected),
    ]
}

fn arb_employee_id() -> impl Strategy<Value = EmployeeId> {
    any::<u128>().prop_map(|n| EmployeeId::from_uuid(Uuid::from_u128(n)))
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,60}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only pending requests can be decided, whatever the decision.
    #[test]
    fn prop_only_pending_can_be_decided(
        status in arb_status(),
        approver in arb_employee_id(),
        reason in arb_reason(),
    ) {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let approve = DecisionRules::approve(RequestId::new(), status, approver, at, None);
        let reject = DecisionRules::reject(RequestId::new(), status, approver, at, &reason);

        if status == RequestStatus::Pending {
            prop_assert!(approve.is_ok());
            prop_assert_eq!(reject.is_ok(), !reason.trim().is_empty());
        } else {
            let approve_not_pending = matches!(approve, Err(WorkflowError::NotPending { .. }));
            let reject_not_pending = matches!(reject, Err(WorkflowError::NotPending { .. }));
            prop_assert!(approve_not_pending);
            prop_assert!(reject_not_pending);
        }
    }

    /// Applying the produced decision always yields a terminal status that a
    /// second decision refuses.
    #[test]
    fn prop_single_decision(approver in arb_employee_id(), approve_first in any::<bool>()) {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let id = RequestId::new();
        let first = if approve_first {
            DecisionRules::approve(id, RequestStatus::Pending, approver, at, None)
        } else {
            DecisionRules::reject(id, RequestStatus::Pending, approver, at, "no")
        };
        let decided = first.unwrap().new_status();
        prop_assert!(DecisionRules::is_valid_transition(RequestStatus::Pending, decided));
        prop_assert!(decided.is_terminal());

        prop_assert!(DecisionRules::approve(id, decided, approver, at, None).is_err());
        prop_assert!(DecisionRules::reject(id, decided, approver, at, "again").is_err());
    }

    /// Only the recorded direct supervisor passes the authorization check.
    #[test]
    fn prop_only_direct_supervisor(
        supervisor in proptest::option::of(arb_employee_id()),
        caller in arb_employee_id(),
    ) {
        let requester = Employee::new("Requester", supervisor);
        let allowed = DecisionRules::ensure_direct_supervisor(&requester, caller).is_ok();
        prop_assert_eq!(allowed, supervisor == Some(caller));
    }

    /// Terminal statuses never transition.
    #[test]
    fn prop_terminal_states_are_final(from in arb_status(), to in arb_status()) {
        if from.is_terminal() {
            prop_assert!(!DecisionRules::is_valid_transition(from, to));
        }
    }
}
