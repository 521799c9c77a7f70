//! Request repository shared by leave and business-travel requests.
//!
//! Both kinds live in `time_off_requests`; every query is scoped to the
//! kind of the repository's detail type.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use leavedesk_core::ports::{RequestStore, StoreError};
use leavedesk_core::workflow::{
    DateRange, Decision, LeaveDetails, RequestDetails, TimeOffRequest, TravelDetails,
};
use leavedesk_shared::types::{
    CityId, EmployeeId, LeaveTypeId, PageRequest, PageResponse, RequestId,
};

use super::error::{days_from_column, days_to_column, store_error};
use crate::entities::sea_orm_active_enums::{RequestKind, RequestStatus};
use crate::entities::time_off_requests::{self, Column};

/// Maps kind-specific request fields onto the shared row.
pub trait DetailColumns: RequestDetails {
    /// Writes the detail columns of a new row.
    fn write(&self, row: &mut time_off_requests::ActiveModel) -> Result<(), StoreError>;

    /// Reads the detail columns back.
    fn read(row: &time_off_requests::Model) -> Result<Self, StoreError>;
}

fn missing_column(row: &time_off_requests::Model, column: &str) -> StoreError {
    StoreError::Corrupt(format!("request {} has no {column}", row.external_id))
}

impl DetailColumns for LeaveDetails {
    fn write(&self, row: &mut time_off_requests::ActiveModel) -> Result<(), StoreError> {
        row.leave_type_id = Set(Some(self.leave_type_id.into_inner()));
        row.total_days = Set(Some(days_to_column(self.total_days, "total_days")?));
        row.city_id = Set(None);
        Ok(())
    }

    fn read(row: &time_off_requests::Model) -> Result<Self, StoreError> {
        let leave_type_id = row
            .leave_type_id
            .ok_or_else(|| missing_column(row, "leave_type_id"))?;
        let total_days = row
            .total_days
            .ok_or_else(|| missing_column(row, "total_days"))?;
        Ok(Self {
            leave_type_id: LeaveTypeId::from_uuid(leave_type_id),
            total_days: days_from_column(total_days, "total_days")?,
        })
    }
}

impl DetailColumns for TravelDetails {
    fn write(&self, row: &mut time_off_requests::ActiveModel) -> Result<(), StoreError> {
        row.city_id = Set(Some(self.city_id.into_inner()));
        row.leave_type_id = Set(None);
        row.total_days = Set(None);
        Ok(())
    }

    fn read(row: &time_off_requests::Model) -> Result<Self, StoreError> {
        let city_id = row.city_id.ok_or_else(|| missing_column(row, "city_id"))?;
        Ok(Self {
            city_id: CityId::from_uuid(city_id),
        })
    }
}

/// Postgres-backed [`RequestStore`] for one request kind.
#[derive(Debug, Clone)]
pub struct RequestRepository<D> {
    db: DatabaseConnection,
    details: PhantomData<D>,
}

/// Leave request repository.
pub type LeaveRequestRepository = RequestRepository<LeaveDetails>;

/// Business-travel request repository.
pub type TravelRequestRepository = RequestRepository<TravelDetails>;

impl<D: DetailColumns> RequestRepository<D> {
    /// Creates a new request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            details: PhantomData,
        }
    }

    fn scoped() -> Select<time_off_requests::Entity> {
        time_off_requests::Entity::find().filter(Column::Kind.eq(RequestKind::from(D::KIND)))
    }

    fn newest_first(query: Select<time_off_requests::Entity>) -> Select<time_off_requests::Entity> {
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    async fn fetch_all(
        &self,
        query: Select<time_off_requests::Entity>,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        query
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(from_model)
            .collect()
    }

    async fn fetch_one(
        &self,
        query: Select<time_off_requests::Entity>,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        query
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(from_model)
            .transpose()
    }
}

fn from_model<D: DetailColumns>(
    row: time_off_requests::Model,
) -> Result<TimeOffRequest<D>, StoreError> {
    let details = D::read(&row)?;
    let period = DateRange::new(row.start_date, row.end_date).map_err(|_| {
        StoreError::Corrupt(format!(
            "request {} ends before it starts",
            row.external_id
        ))
    })?;

    Ok(TimeOffRequest {
        id: RequestId::from_uuid(row.external_id),
        employee_id: EmployeeId::from_uuid(row.employee_id),
        period,
        reason: row.reason,
        status: row.status.into(),
        details,
        approver_id: row.approver_id.map(EmployeeId::from_uuid),
        decided_at: row.decided_at.map(|at| at.with_timezone(&Utc)),
        approval_note: row.approval_note,
        rejection_reason: row.rejection_reason,
        created_at: row.created_at.with_timezone(&Utc),
        created_by: EmployeeId::from_uuid(row.created_by),
        updated_at: row.updated_at.with_timezone(&Utc),
        updated_by: row.updated_by.map(EmployeeId::from_uuid),
    })
}

fn to_active_model<D: DetailColumns>(
    request: &TimeOffRequest<D>,
) -> Result<time_off_requests::ActiveModel, StoreError> {
    let mut row = time_off_requests::ActiveModel {
        id: NotSet,
        external_id: Set(request.id.into_inner()),
        kind: Set(RequestKind::from(D::KIND)),
        employee_id: Set(request.employee_id.into_inner()),
        start_date: Set(request.period.start()),
        end_date: Set(request.period.end()),
        reason: Set(request.reason.clone()),
        status: Set(request.status.into()),
        leave_type_id: Set(None),
        total_days: Set(None),
        city_id: Set(None),
        approver_id: Set(request.approver_id.map(EmployeeId::into_inner)),
        decided_at: Set(request.decided_at.map(Into::into)),
        approval_note: Set(request.approval_note.clone()),
        rejection_reason: Set(request.rejection_reason.clone()),
        created_at: Set(request.created_at.into()),
        created_by: Set(request.created_by.into_inner()),
        updated_at: Set(request.updated_at.into()),
        updated_by: Set(request.updated_by.map(EmployeeId::into_inner)),
    };
    request.details.write(&mut row)?;
    Ok(row)
}

#[async_trait]
impl<D: DetailColumns> RequestStore<D> for RequestRepository<D> {
    async fn insert(&self, request: TimeOffRequest<D>) -> Result<TimeOffRequest<D>, StoreError> {
        let model = to_active_model(&request)?
            .insert(&self.db)
            .await
            .map_err(store_error)?;
        from_model(model)
    }

    async fn find(&self, id: RequestId) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        self.fetch_one(Self::scoped().filter(Column::ExternalId.eq(id.into_inner())))
            .await
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        let query = Self::scoped().filter(Column::EmployeeId.eq(employee_id.into_inner()));
        self.fetch_all(Self::newest_first(query)).await
    }

    async fn page_for_employee(
        &self,
        employee_id: EmployeeId,
        page: PageRequest,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<PageResponse<TimeOffRequest<D>>, StoreError> {
        let mut query = Self::scoped().filter(Column::EmployeeId.eq(employee_id.into_inner()));
        if let Some(after) = created_after {
            query = query.filter(Column::CreatedAt.gte(after));
        }

        let total = query.clone().count(&self.db).await.map_err(store_error)?;
        let rows = self
            .fetch_all(
                Self::newest_first(query)
                    .offset(page.offset())
                    .limit(page.limit()),
            )
            .await?;

        Ok(PageResponse::new(rows, page, total))
    }

    async fn list_pending_for(
        &self,
        employees: &[EmployeeId],
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        if employees.is_empty() {
            return Ok(Vec::new());
        }
        let query = Self::scoped()
            .filter(Column::Status.eq(RequestStatus::Pending))
            .filter(
                Column::EmployeeId.is_in(employees.iter().copied().map(EmployeeId::into_inner)),
            );
        self.fetch_all(Self::newest_first(query)).await
    }

    async fn find_approved_overlapping(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Vec<TimeOffRequest<D>>, StoreError> {
        let query = Self::scoped()
            .filter(Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(Column::Status.eq(RequestStatus::Approved))
            .filter(Column::StartDate.lte(period.end()))
            .filter(Column::EndDate.gte(period.start()));
        self.fetch_all(Self::newest_first(query)).await
    }

    async fn find_duplicate(
        &self,
        employee_id: EmployeeId,
        period: DateRange,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        let query = Self::scoped()
            .filter(Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(Column::StartDate.eq(period.start()))
            .filter(Column::EndDate.eq(period.end()))
            .filter(Column::Status.is_in([RequestStatus::Pending, RequestStatus::Approved]));
        self.fetch_one(Self::newest_first(query)).await
    }

    async fn find_active_on(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<TimeOffRequest<D>>, StoreError> {
        let query = Self::scoped()
            .filter(Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(Column::Status.eq(RequestStatus::Approved))
            .filter(Column::StartDate.lte(date))
            .filter(Column::EndDate.gte(date));
        self.fetch_one(Self::newest_first(query)).await
    }

    async fn record_decision(
        &self,
        id: RequestId,
        decision: &Decision,
    ) -> Result<TimeOffRequest<D>, StoreError> {
        let decided_at = decision.decided_at().into();
        let changes = time_off_requests::ActiveModel {
            status: Set(decision.new_status().into()),
            approver_id: Set(Some(decision.approver_id().into_inner())),
            decided_at: Set(Some(decided_at)),
            approval_note: Set(decision.approval_note().map(str::to_owned)),
            rejection_reason: Set(decision.rejection_reason().map(str::to_owned)),
            updated_at: Set(decided_at),
            updated_by: Set(Some(decision.approver_id().into_inner())),
            ..Default::default()
        };

        // Only a pending row matches, so at most one decision ever lands.
        let updated = time_off_requests::Entity::update_many()
            .set(changes)
            .filter(Column::Kind.eq(RequestKind::from(D::KIND)))
            .filter(Column::ExternalId.eq(id.into_inner()))
            .filter(Column::Status.eq(RequestStatus::Pending))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        if let Some(row) = updated.into_iter().next() {
            return from_model(row);
        }

        match self.find(id).await? {
            Some(current) => Err(StoreError::StatusMismatch {
                id,
                status: current.status,
            }),
            None => Err(StoreError::Missing(format!("request {id}"))),
        }
    }
}
