use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use leavedesk_shared::types::{EmployeeId, PageRequest, PageResponse, RequestId};
use tokio::sync::RwLock;

use crate::ports::{RequestStore, StoreError};
use crate::workflow::types::{DateRange, Decision, RequestDetails, RequestStatus, TimeOffRequest};

/// Request store backed by a vector.
#[derive(Debug)]
pub struct MemoryRequestStore<D> {
    rows: RwLock<Vec<TimeOffRequest<D>>>,
}

impl<D> Default for MemoryRequestStore<D> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<D: RequestDetails> MemoryRequestStore<D> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(
        &self,
        predicate: impl Fn(&TimeOffRequest<D>) -> bool + Send,
    ) -> Vec<TimeOffRequest<D>> {
        let rows = self.rows.read().await;
        let mut selected: Vec<_> = rows.iter().filter(|r| predicate(r)).cloned().collect();
        selected.sort_by_key(|r| Reverse((r.created_at, r.id)));
        selected
    }
}

#[async_trait]
impl<D: RequestDetails> RequestStore<D> for MemoryRequestStore<D> {
    async fn insert(&self, request: TimeOffRequest<D>) -> Result<TimeOffRequest<D>, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id == request.id) {
            return Err(StoreError::Conflict(format!("request {} exists", request.id)));
        }
        rows.push(request.clone());
        Ok(request)
    }

    async fn find(&self, id: RequestId) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        Ok(self.select(|r| r.employee_id == employee_id).await)
    }

    async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<PageResponse<TimeOffRequest<D>>, StoreError> {
        let rows = self
            .select(|r| {
                r.employee_id == employee_id
                    && created_after.is_none_or(|after| r.created_at >= after)
            })
            .await;

        let total = rows.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let data = rows.into_iter().skip(offset).take(limit).collect();
        Ok(PageResponse::new(data, page, total))
    }

    async fn list_pending_for(
        &self,
        employees: &[EmployeeId],
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        Ok(self
            .select(|r| r.is_pending() && employees.contains(&r.employee_id))
            .await)
    }

    async fn find_approved_overlapping(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        Ok(self
            .select(|r| {
                r.employee_id == employee_id
                    && r.status == RequestStatus::Approved
                    && r.period.overlaps(&period)
            })
            .await)
    }

    async fn find_duplicate(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        Ok(self
            .select(|r| {
                r.employee_id == employee_id
                    && r.period == period
                    && matches!(r.status, RequestStatus::Pending | RequestStatus::Approved)
            })
            .await
            .into_iter()
            .next())
    }

    async fn find_active_on(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        Ok(self
            .select(|r| {
                r.employee_id == employee_id
                    && r.status == RequestStatus::Approved
                    && r.period.contains(date)
            })
            .await
            .into_iter()
            .next())
    }

    async fn record_decision(
        &self,
        id: RequestId,
        decision: &Decision,
    ) -> Result<TimeOffRequest<D>, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::Missing(format!("request {id}")))?;

        if !row.is_pending() {
            return Err(StoreError::StatusMismatch {
                id,
                status: row.status,
            });
        }
        row.apply(decision);
        Ok(row.clone())
    }
}
