//! Leave and business-travel request lifecycle.
//!
//! Requests are created `Pending` by the employee and decided exactly once by
//! the employee's direct supervisor.
//!
//! # Modules
//!
//! - `types` - Request, status, date range and decision types
//! - `error` - Workflow error taxonomy
//! - `transition` - Pure decision rules
//! - `conflict` - Overlap detection against approved requests
//! - `leave` - Leave workflow (consumes quota)
//! - `travel` - Business-travel workflow

pub mod conflict;
pub mod context;
mod desk;
pub mod error;
pub mod leave;
pub mod locks;
pub mod transition;
pub mod travel;
pub mod types;

#[cfg(test)]
mod range_props;
#[cfg(test)]
mod transition_props;

pub use conflict::ConflictChecker;
pub use context::{SubmissionPolicy, WorkflowContext};
pub use error::{ErrorKind, WorkflowError};
pub use leave::{LeaveWorkflow, NewLeaveRequest};
pub use transition::DecisionRules;
pub use travel::{NewTravelRequest, TravelWorkflow};
pub use types::{
    DateRange, Decision, LeaveDetails, LeaveRequest, RequestDetails, RequestKind, RequestStatus,
    TimeOffRequest, TravelDetails, TravelRequest, Viewer,
};
