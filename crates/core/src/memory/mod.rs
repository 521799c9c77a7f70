//! In-memory implementations of the storage ports.
//!
//! Used by the test suites and for running the workflows without a database.
//! Ledger mutations hold a per-key map entry for their whole read-modify-write,
//! and decisions are compare-and-swap under the store's write lock.

mod directory;
mod leave_types;
mod ledger;
mod requests;

pub use directory::MemoryDirectory;
pub use leave_types::MemoryLeaveTypeStore;
pub use ledger::MemoryQuotaLedger;
pub use requests::MemoryRequestStore;

use std::sync::Arc;

use crate::notify::NotificationSink;
use crate::ports::Clock;
use crate::workflow::context::{SubmissionPolicy, WorkflowContext};
use crate::workflow::types::{LeaveDetails, TravelDetails};

/// A full set of in-memory stores.
#[derive(Clone)]
pub struct MemoryBackend {
    /// Employees and cities.
    pub directory: Arc<MemoryDirectory>,
    /// Leave requests.
    pub leave_requests: Arc<MemoryRequestStore<LeaveDetails>>,
    /// Business-travel requests.
    pub travel_requests: Arc<MemoryRequestStore<TravelDetails>>,
    /// Leave-type catalogue.
    pub leave_types: Arc<MemoryLeaveTypeStore>,
    /// Quota ledger.
    pub ledger: Arc<MemoryQuotaLedger>,
}

impl MemoryBackend {
    /// Empty stores; new ledger entries start at `default_allotment`.
    #[must_use]
    pub fn new(default_allotment: u32) -> Self {
        Self {
            directory: Arc::new(MemoryDirectory::new()),
            leave_requests: Arc::new(MemoryRequestStore::new()),
            travel_requests: Arc::new(MemoryRequestStore::new()),
            leave_types: Arc::new(MemoryLeaveTypeStore::new()),
            ledger: Arc::new(MemoryQuotaLedger::new(default_allotment)),
        }
    }

    /// Wires the stores into a workflow context.
    #[must_use]
    pub fn context(
        &self,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
        policy: SubmissionPolicy,
    ) -> WorkflowContext {
        WorkflowContext {
            directory: self.directory.clone(),
            destinations: self.directory.clone(),
            leave_requests: self.leave_requests.clone(),
            travel_requests: self.travel_requests.clone(),
            leave_types: self.leave_types.clone(),
            ledger: self.ledger.clone(),
            notifier,
            clock,
            policy,
        }
    }
}
