//! Decision notifications.
//!
//! Delivery is fire-and-forget: workflows log a failed notification and
//! carry on, so a sink can never undo a recorded decision.

mod email;

pub use email::EmailNotifier;

use async_trait::async_trait;
use leavedesk_shared::types::{EmployeeId, RequestId};
use thiserror::Error;
use tracing::info;

use crate::workflow::types::{
    DateRange, Decision, RequestDetails, RequestKind, RequestStatus, TimeOffRequest,
};

/// Notification delivery errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The recipient has no usable address.
    #[error("No address for employee {0}")]
    NoRecipient(EmployeeId),

    /// The transport failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A decision that was just recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionEvent {
    /// Leave or business travel.
    pub kind: RequestKind,
    /// Decided request.
    pub request_id: RequestId,
    /// Requester, who receives the notification.
    pub employee_id: EmployeeId,
    /// Deciding supervisor.
    pub decided_by: EmployeeId,
    /// New status.
    pub status: RequestStatus,
    /// Requested days.
    pub period: DateRange,
    /// Approval note or rejection reason.
    pub message: Option<String>,
}

impl DecisionEvent {
    /// Builds the event for a request and the decision applied to it.
    #[must_use]
    pub fn new<D: RequestDetails>(request: &TimeOffRequest<D>, decision: &Decision) -> Self {
        Self {
            kind: D::KIND,
            request_id: request.id,
            employee_id: request.employee_id,
            decided_by: decision.approver_id(),
            status: decision.new_status(),
            period: request.period,
            message: decision
                .approval_note()
                .or_else(|| decision.rejection_reason())
                .map(str::to_owned),
        }
    }

    /// One-line subject for the requester.
    #[must_use]
    pub fn subject(&self) -> String {
        let label = self.kind.label();
        format!("Your {label} was {}", self.status)
    }

    /// Plain-text body for the requester.
    #[must_use]
    pub fn body(&self) -> String {
        let mut body = format!(
            "Your {} for {} to {} was {}.",
            self.kind.label(),
            self.period.start(),
            self.period.end(),
            self.status
        );
        if let Some(message) = &self.message {
            body.push_str("\n\n");
            body.push_str(message);
        }
        body
    }
}

/// Receives decision events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one event.
    async fn notify(&self, event: &DecisionEvent) -> Result<(), NotifyError>;
}

/// Writes decision events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, event: &DecisionEvent) -> Result<(), NotifyError> {
        info!(
            kind = %event.kind,
            request_id = %event.request_id,
            employee_id = %event.employee_id,
            supervisor_id = %event.decided_by,
            status = %event.status,
            "Decision recorded"
        );
        Ok(())
    }
}
