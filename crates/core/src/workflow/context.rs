//! Collaborators shared by the leave and travel workflows.

use std::sync::Arc;

use leavedesk_shared::LeaveConfig;

use crate::notify::NotificationSink;
use crate::ports::{
    Clock, DestinationDirectory, EmployeeDirectory, LeaveTypeStore, QuotaLedger, RequestStore,
};
use crate::workflow::types::{LeaveDetails, TravelDetails};

/// Submission rules that vary by deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Accept requests starting before today.
    pub allow_backdated: bool,
}

impl From<&LeaveConfig> for SubmissionPolicy {
    fn from(config: &LeaveConfig) -> Self {
        Self {
            allow_backdated: config.allow_backdated,
        }
    }
}

/// Everything a workflow needs, behind trait objects.
#[derive(Clone)]
pub struct WorkflowContext {
    /// Employee lookup.
    pub directory: Arc<dyn EmployeeDirectory>,
    /// Travel destination lookup.
    pub destinations: Arc<dyn DestinationDirectory>,
    /// Leave request storage.
    pub leave_requests: Arc<dyn RequestStore<LeaveDetails>>,
    /// Business-travel request storage.
    pub travel_requests: Arc<dyn RequestStore<TravelDetails>>,
    /// Leave-type catalogue.
    pub leave_types: Arc<dyn LeaveTypeStore>,
    /// Quota ledger.
    pub ledger: Arc<dyn QuotaLedger>,
    /// Decision notifications.
    pub notifier: Arc<dyn NotificationSink>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Submission rules.
    pub policy: SubmissionPolicy,
}
