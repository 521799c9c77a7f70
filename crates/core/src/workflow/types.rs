//! Request lifecycle types shared by leave and business-travel requests.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use leavedesk_shared::types::{CityId, EmployeeId, LeaveTypeId, RequestId};
use serde::{Deserialize, Serialize};

use crate::workflow::error::WorkflowError;

/// Request status.
///
/// Requests are created `Pending` and decided exactly once:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting the direct supervisor's decision.
    Pending,
    /// Approved; terminal.
    Approved,
    /// Rejected; terminal.
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once a decision has been recorded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which workflow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Leave request.
    Leave,
    /// Business-travel request.
    BusinessTravel,
}

impl RequestKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::BusinessTravel => "business_travel",
        }
    }

    /// Human label used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Leave => "leave request",
            Self::BusinessTravel => "business travel request",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload of a request.
pub trait RequestDetails: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The workflow this payload belongs to.
    const KIND: RequestKind;
}

/// Inclusive calendar-date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WorkflowError> {
        if start > end {
            return Err(WorkflowError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days, both ends included.
    #[must_use]
    pub fn days(&self) -> u32 {
        let span = (self.end - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// Returns true if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Quota year the range is charged to: the year of its first day.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start.year()
    }
}

/// Leave-specific fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDetails {
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// Inclusive calendar days.
    pub total_days: u32,
}

impl RequestDetails for LeaveDetails {
    const KIND: RequestKind = RequestKind::Leave;
}

/// Business-travel-specific fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDetails {
    /// Destination city.
    pub city_id: CityId,
}

impl RequestDetails for TravelDetails {
    const KIND: RequestKind = RequestKind::BusinessTravel;
}

/// A supervisor's decision on a pending request, with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Approve, with an optional note.
    Approve {
        /// Deciding supervisor.
        approver_id: EmployeeId,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
        /// Optional approval note.
        note: Option<String>,
    },
    /// Reject, with a mandatory reason.
    Reject {
        /// Deciding supervisor.
        approver_id: EmployeeId,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
        /// Rejection reason.
        reason: String,
    },
}

impl Decision {
    /// Returns the status the request moves to.
    #[must_use]
    pub const fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { .. } => RequestStatus::Approved,
            Self::Reject { .. } => RequestStatus::Rejected,
        }
    }

    /// Returns the deciding supervisor.
    #[must_use]
    pub const fn approver_id(&self) -> EmployeeId {
        match self {
            Self::Approve { approver_id, .. } | Self::Reject { approver_id, .. } => *approver_id,
        }
    }

    /// Returns the decision timestamp.
    #[must_use]
    pub const fn decided_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { decided_at, .. } | Self::Reject { decided_at, .. } => *decided_at,
        }
    }

    /// Approval note, if any.
    #[must_use]
    pub fn approval_note(&self) -> Option<&str> {
        match self {
            Self::Approve { note, .. } => note.as_deref(),
            Self::Reject { .. } => None,
        }
    }

    /// Rejection reason, if any.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::Approve { .. } => None,
            Self::Reject { reason, .. } => Some(reason),
        }
    }
}

/// A leave or business-travel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOffRequest<D> {
    /// Stable external identifier.
    pub id: RequestId,
    /// Requesting employee.
    pub employee_id: EmployeeId,
    /// Requested days.
    pub period: DateRange,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Kind-specific fields.
    pub details: D,
    /// Supervisor who decided the request.
    pub approver_id: Option<EmployeeId>,
    /// When the request was decided.
    pub decided_at: Option<DateTime<Utc>>,
    /// Note attached to an approval.
    pub approval_note: Option<String>,
    /// Reason attached to a rejection.
    pub rejection_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Creator (the requesting employee).
    pub created_by: EmployeeId,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last modifier.
    pub updated_by: Option<EmployeeId>,
}

/// A leave request.
pub type LeaveRequest = TimeOffRequest<LeaveDetails>;

/// A business-travel request.
pub type TravelRequest = TimeOffRequest<TravelDetails>;

impl<D: RequestDetails> TimeOffRequest<D> {
    /// A new pending request created by the employee themself.
    #[must_use]
    pub fn submitted(
        employee_id: EmployeeId,
        period: DateRange,
        reason: Option<String>,
        details: D,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            employee_id,
            period,
            reason,
            status: RequestStatus::Pending,
            details,
            approver_id: None,
            decided_at: None,
            approval_note: None,
            rejection_reason: None,
            created_at: now,
            created_by: employee_id,
            updated_at: now,
            updated_by: None,
        }
    }

    /// The workflow this request belongs to.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        D::KIND
    }

    /// Returns true while the request awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Copies a decision onto the request.
    pub fn apply(&mut self, decision: &Decision) {
        self.status = decision.new_status();
        self.approver_id = Some(decision.approver_id());
        self.decided_at = Some(decision.decided_at());
        self.approval_note = decision.approval_note().map(str::to_owned);
        self.rejection_reason = decision.rejection_reason().map(str::to_owned);
        self.updated_at = decision.decided_at();
        self.updated_by = Some(decision.approver_id());
    }
}

/// Who is asking to see a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Caller.
    pub employee_id: EmployeeId,
    /// Caller holds the HR administrator role.
    pub is_hr_admin: bool,
}
