//! Decision rules for pending requests.
//!
//! Pure functions: they validate a transition and return the [`Decision`]
//! to persist, without touching any store.

use chrono::{DateTime, Utc};
use leavedesk_shared::types::{EmployeeId, RequestId};

use crate::ports::Employee;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{Decision, RequestStatus};

/// Stateless validation of approve/reject transitions.
pub struct DecisionRules;

impl DecisionRules {
    /// Fails with `NotPending` unless the request awaits a decision.
    pub fn ensure_pending(id: RequestId, status: RequestStatus) -> Result<(), WorkflowError> {
        match status {
            RequestStatus::Pending => Ok(()),
            _ => Err(WorkflowError::NotPending { id, status }),
        }
    }

    /// Fails with `NotDirectSupervisor` unless `supervisor_id` is the
    /// requester's direct supervisor. Neither delegation nor higher levels of
    /// the hierarchy qualify.
    pub fn ensure_direct_supervisor(
        requester: &Employee,
        supervisor_id: EmployeeId,
    ) -> Result<(), WorkflowError> {
        if requester.reports_to(supervisor_id) {
            Ok(())
        } else {
            Err(WorkflowError::NotDirectSupervisor { supervisor_id })
        }
    }

    /// Approve a pending request. A blank note is dropped.
    pub fn approve(
        id: RequestId,
        current_status: RequestStatus,
        approver_id: EmployeeId,
        decided_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Decision, WorkflowError> {
        Self::ensure_pending(id, current_status)?;

        Ok(Decision::Approve {
            approver_id,
            decided_at,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }

    /// Reject a pending request. The reason is mandatory.
    pub fn reject(
        id: RequestId,
        current_status: RequestStatus,
        approver_id: EmployeeId,
        decided_at: DateTime<Utc>,
        reason: &str,
    ) -> Result<Decision, WorkflowError> {
        Self::ensure_pending(id, current_status)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }

        Ok(Decision::Reject {
            approver_id,
            decided_at,
            reason: reason.to_string(),
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Rejected
            )
        )
    }
}
