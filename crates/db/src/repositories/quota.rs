//! Quota ledger repository.
//!
//! Every mutation runs in its own transaction and locks the
//! `(employee_id, year)` row with `SELECT ... FOR UPDATE` before reading it,
//! so concurrent deductions queue on the row instead of overwriting each
//! other.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use leavedesk_core::ports::{QuotaLedger, StoreError};
use leavedesk_core::quota::{QuotaBalance, QuotaError};
use leavedesk_shared::types::EmployeeId;

use super::error::{days_from_column, days_to_column, store_error};
use crate::entities::leave_quotas;

/// Postgres-backed quota ledger.
#[derive(Debug, Clone)]
pub struct QuotaRepository {
    db: DatabaseConnection,
    default_allotment: u32,
}

impl QuotaRepository {
    /// Creates a new quota repository. Lazily created entries start at
    /// `default_allotment`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, default_allotment: u32) -> Self {
        Self {
            db,
            default_allotment,
        }
    }

    /// Inserts a default entry unless one exists. Returns true if a row was created.
    async fn ensure_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<bool, StoreError> {
        let now = Utc::now().into();
        let row = leave_quotas::ActiveModel {
            employee_id: Set(employee_id.into_inner()),
            year: Set(year),
            remaining_days: Set(days_to_column(self.default_allotment, "remaining_days")?),
            used_days: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = leave_quotas::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([leave_quotas::Column::EmployeeId, leave_quotas::Column::Year])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(store_error)?;

        if inserted > 0 {
            debug!(
                %employee_id,
                year,
                allotment = self.default_allotment,
                "Quota entry initialised"
            );
        }
        Ok(inserted > 0)
    }

    /// Locks the entry, applies `mutate` and writes the result back.
    ///
    /// With `init` the entry is created at the default allotment first;
    /// without it a missing entry fails with [`QuotaError::NotFound`].
    async fn mutate<F>(
        &self,
        employee_id: EmployeeId,
        year: i32,
        init: bool,
        mutate: F,
    ) -> Result<QuotaBalance, QuotaError>
    where
        F: FnOnce(&mut QuotaBalance) -> Result<(), QuotaError> + Send,
    {
        let txn = self.db.begin().await.map_err(store_error)?;

        if init {
            self.ensure_entry(&txn, employee_id, year).await?;
        }

        let row = leave_quotas::Entity::find_by_id((employee_id.into_inner(), year))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or(QuotaError::NotFound { employee_id, year })?;

        let mut balance = from_model(&row)?;
        mutate(&mut balance)?;

        let mut active: leave_quotas::ActiveModel = row.into();
        active.remaining_days = Set(days_to_column(balance.remaining_days, "remaining_days")?);
        active.used_days = Set(days_to_column(balance.used_days, "used_days")?);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;
        Ok(balance)
    }
}

fn from_model(model: &leave_quotas::Model) -> Result<QuotaBalance, StoreError> {
    Ok(QuotaBalance {
        employee_id: EmployeeId::from_uuid(model.employee_id),
        year: model.year,
        remaining_days: days_from_column(model.remaining_days, "remaining_days")?,
        used_days: days_from_column(model.used_days, "used_days")?,
    })
}

fn key(employee_id: EmployeeId, year: i32) -> (Uuid, i32) {
    (employee_id.into_inner(), year)
}

#[async_trait]
impl QuotaLedger for QuotaRepository {
    fn default_allotment(&self) -> u32 {
        self.default_allotment
    }

    async fn find(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Option<QuotaBalance>, StoreError> {
        leave_quotas::Entity::find_by_id(key(employee_id, year))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .as_ref()
            .map(from_model)
            .transpose()
    }

    async fn fetch_or_init(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<QuotaBalance, StoreError> {
        self.ensure_entry(&self.db, employee_id, year).await?;
        let row = leave_quotas::Entity::find_by_id(key(employee_id, year))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::Missing(format!("quota {employee_id}/{year}")))?;
        from_model(&row)
    }

    async fn create(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let now = Utc::now().into();
        let row = leave_quotas::ActiveModel {
            employee_id: Set(employee_id.into_inner()),
            year: Set(year),
            remaining_days: Set(days_to_column(allotment, "remaining_days")?),
            used_days: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match row.insert(&self.db).await.map_err(store_error) {
            Ok(model) => Ok(from_model(&model)?),
            Err(StoreError::Conflict(_)) => Err(QuotaError::AlreadyExists { employee_id, year }),
            Err(other) => Err(other.into()),
        }
    }

    async fn deduct(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        self.mutate(employee_id, year, true, |balance| balance.deduct(days))
            .await
    }

    async fn restore(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        self.mutate(employee_id, year, true, |balance| {
            balance.restore(days);
            Ok(())
        })
        .await
    }

    async fn set_allotment(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        self.mutate(employee_id, year, false, |balance| {
            balance.set_allotment(allotment);
            Ok(())
        })
        .await
    }

    async fn reset_year(&self, year: i32, allotment: u32) -> Result<u64, StoreError> {
        let result = leave_quotas::Entity::update_many()
            .col_expr(
                leave_quotas::Column::RemainingDays,
                Expr::value(days_to_column(allotment, "remaining_days")?),
            )
            .col_expr(leave_quotas::Column::UsedDays, Expr::value(0))
            .col_expr(leave_quotas::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(leave_quotas::Column::Year.eq(year))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected)
    }

    async fn list_year(&self, year: i32) -> Result<Vec<QuotaBalance>, StoreError> {
        leave_quotas::Entity::find()
            .filter(leave_quotas::Column::Year.eq(year))
            .order_by_asc(leave_quotas::Column::EmployeeId)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .iter()
            .map(from_model)
            .collect()
    }
}
