//! Lifecycle steps common to leave and business-travel requests.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use leavedesk_shared::types::{EmployeeId, PageRequest, PageResponse, RequestId};
use tracing::{info, warn};

use crate::notify::{DecisionEvent, NotificationSink};
use crate::ports::{Clock, Employee, EmployeeDirectory, RequestStore, StoreError};
use crate::workflow::context::{SubmissionPolicy, WorkflowContext};
use crate::workflow::error::WorkflowError;
use crate::workflow::locks::{KeyGuard, KeyedLocks};
use crate::workflow::transition::DecisionRules;
use crate::workflow::types::{DateRange, Decision, RequestDetails, TimeOffRequest, Viewer};

pub(crate) struct RequestDesk<D: RequestDetails> {
    pub(crate) store: Arc<dyn RequestStore<D>>,
    pub(crate) directory: Arc<dyn EmployeeDirectory>,
    pub(crate) clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
    policy: SubmissionPolicy,
    locks: KeyedLocks<EmployeeId>,
}

impl<D: RequestDetails> RequestDesk<D> {
    pub(crate) fn new(store: Arc<dyn RequestStore<D>>, ctx: &WorkflowContext) -> Self {
        Self {
            store,
            directory: ctx.directory.clone(),
            clock: ctx.clock.clone(),
            notifier: ctx.notifier.clone(),
            policy: ctx.policy,
            locks: KeyedLocks::default(),
        }
    }

    pub(crate) async fn employee(&self, id: EmployeeId) -> Result<Employee, WorkflowError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(WorkflowError::EmployeeNotFound(id))
    }

    /// Builds the period and applies the back-dating rule.
    pub(crate) fn period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DateRange, WorkflowError> {
        let period = DateRange::new(start, end)?;
        let today = self.clock.today();
        if !self.policy.allow_backdated && start < today {
            return Err(WorkflowError::Backdated { start, today });
        }
        Ok(period)
    }

    pub(crate) async fn ensure_not_duplicate(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<(), WorkflowError> {
        match self.store.find_duplicate(employee_id, period).await? {
            Some(existing) => Err(WorkflowError::DuplicateRequest {
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }

    pub(crate) async fn submit(
        &self,
        request: TimeOffRequest<D>,
    ) -> Result<TimeOffRequest<D>, WorkflowError> {
        let created = self.store.insert(request).await?;
        info!(
            kind = %D::KIND,
            request_id = %created.id,
            employee_id = %created.employee_id,
            start = %created.period.start(),
            end = %created.period.end(),
            "Request submitted"
        );
        Ok(created)
    }

    pub(crate) async fn load(&self, id: RequestId) -> Result<TimeOffRequest<D>, WorkflowError> {
        self.store
            .find(id)
            .await?
            .ok_or(WorkflowError::RequestNotFound(id))
    }

    /// Request lookup, pending check, supervisor lookup and the
    /// direct-supervisor check, in that order.
    pub(crate) async fn load_for_decision(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
    ) -> Result<TimeOffRequest<D>, WorkflowError> {
        let request = self.load(id).await?;
        DecisionRules::ensure_pending(request.id, request.status)?;
        self.employee(supervisor_id).await?;

        let requester = self.employee(request.employee_id).await?;
        if let Err(err) = DecisionRules::ensure_direct_supervisor(&requester, supervisor_id) {
            warn!(
                kind = %D::KIND,
                request_id = %id,
                employee_id = %request.employee_id,
                supervisor_id = %supervisor_id,
                "Decision attempted by someone other than the direct supervisor"
            );
            return Err(err);
        }
        Ok(request)
    }

    /// Serializes decisions for one employee within this process.
    pub(crate) async fn lock(&self, employee_id: EmployeeId) -> KeyGuard<'_, EmployeeId> {
        self.locks.lock(&employee_id).await
    }

    /// Persists a decision; losing the compare-and-swap maps to `NotPending`.
    pub(crate) async fn commit(
        &self,
        id: RequestId,
        decision: &Decision,
    ) -> Result<TimeOffRequest<D>, WorkflowError> {
        match self.store.record_decision(id, decision).await {
            Ok(request) => Ok(request),
            Err(StoreError::StatusMismatch { id, status }) => {
                Err(WorkflowError::NotPending { id, status })
            }
            Err(StoreError::Missing(_)) => Err(WorkflowError::RequestNotFound(id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Hands the decision event to the sink on a background task. Failures
    /// are logged and dropped; the caller never waits for delivery.
    pub(crate) fn announce(&self, request: &TimeOffRequest<D>, decision: &Decision) {
        let event = DecisionEvent::new(request, decision);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.notify(&event).await {
                warn!(
                    kind = %event.kind,
                    request_id = %event.request_id,
                    employee_id = %event.employee_id,
                    error = %err,
                    "Decision notification failed"
                );
            }
        });
    }

    pub(crate) async fn reject(
        &self,
        id: RequestId,
        supervisor_id: EmployeeId,
        reason: &str,
    ) -> Result<TimeOffRequest<D>, WorkflowError> {
        let request = self.load_for_decision(id, supervisor_id).await?;
        let decision = DecisionRules::reject(
            request.id,
            request.status,
            supervisor_id,
            self.clock.now(),
            reason,
        )?;

        let rejected = self.commit(id, &decision).await?;
        info!(
            kind = %D::KIND,
            request_id = %id,
            employee_id = %rejected.employee_id,
            supervisor_id = %supervisor_id,
            "Request rejected"
        );
        self.announce(&rejected, &decision);
        Ok(rejected)
    }

    pub(crate) async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TimeOffRequest<D>>, WorkflowError> {
        Ok(self.store.list_for_employee(employee_id).await?)
    }

    pub(crate) async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        within_days: Option<u32>,
    ) -> Result<PageResponse<TimeOffRequest<D>>, WorkflowError> {
        let created_after = within_days.map(|days| {
            (self.clock.today() - Duration::days(i64::from(days)))
                .and_time(NaiveTime::MIN)
                .and_utc()
        });
        Ok(self
            .store
            .page_for_employee(employee_id, page, created_after)
            .await?)
    }

    pub(crate) async fn pending_for_supervisor(
        &self,
        supervisor_id: EmployeeId,
    ) -> Result<Vec<TimeOffRequest<D>>, WorkflowError> {
        let team: Vec<EmployeeId> = self
            .directory
            .subordinates_of(supervisor_id)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        if team.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.list_pending_for(&team).await?)
    }

    pub(crate) async fn current(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<TimeOffRequest<D>>, WorkflowError> {
        Ok(self
            .store
            .find_active_on(employee_id, self.clock.today())
            .await?)
    }

    /// Visible to the requester, their direct supervisor and HR administrators.
    pub(crate) async fn get_visible(
        &self,
        id: RequestId,
        viewer: Viewer,
    ) -> Result<TimeOffRequest<D>, WorkflowError> {
        let request = self.load(id).await?;
        if viewer.is_hr_admin || viewer.employee_id == request.employee_id {
            return Ok(request);
        }
        let supervisor = self.directory.supervisor_of(request.employee_id).await?;
        if supervisor == Some(viewer.employee_id) {
            Ok(request)
        } else {
            Err(WorkflowError::NotVisible(id))
        }
    }
}
