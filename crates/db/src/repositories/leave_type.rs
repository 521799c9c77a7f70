//! Leave-type catalogue repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use leavedesk_core::leave_type::LeaveType;
use leavedesk_core::ports::{LeaveTypeStore, StoreError};
use leavedesk_shared::types::LeaveTypeId;

use super::error::{days_from_column, days_to_column, store_error};
use crate::entities::leave_types;

/// Repository over the `leave_types` table.
#[derive(Debug, Clone)]
pub struct LeaveTypeRepository {
    db: DatabaseConnection,
}

impl LeaveTypeRepository {
    /// Creates a new leave-type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn optional_days(value: Option<i32>, column: &str) -> Result<Option<u32>, StoreError> {
    value.map(|v| days_from_column(v, column)).transpose()
}

fn optional_column(value: Option<u32>, column: &str) -> Result<Option<i32>, StoreError> {
    value.map(|v| days_to_column(v, column)).transpose()
}

fn from_model(model: leave_types::Model) -> Result<LeaveType, StoreError> {
    Ok(LeaveType {
        id: LeaveTypeId::from_uuid(model.id),
        code: model.code,
        name: model.name,
        description: model.description,
        min_duration_days: optional_days(model.min_duration_days, "min_duration_days")?,
        max_duration_days: optional_days(model.max_duration_days, "max_duration_days")?,
        consumes_quota: model.consumes_quota,
        is_paid: model.is_paid,
        requires_document: model.requires_document,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn to_active_model(leave_type: &LeaveType) -> Result<leave_types::ActiveModel, StoreError> {
    Ok(leave_types::ActiveModel {
        id: Set(leave_type.id.into_inner()),
        code: Set(leave_type.code.clone()),
        name: Set(leave_type.name.clone()),
        description: Set(leave_type.description.clone()),
        min_duration_days: Set(optional_column(
            leave_type.min_duration_days,
            "min_duration_days",
        )?),
        max_duration_days: Set(optional_column(
            leave_type.max_duration_days,
            "max_duration_days",
        )?),
        consumes_quota: Set(leave_type.consumes_quota),
        is_paid: Set(leave_type.is_paid),
        requires_document: Set(leave_type.requires_document),
        active: Set(leave_type.active),
        created_at: Set(leave_type.created_at.into()),
        updated_at: Set(leave_type.updated_at.into()),
    })
}

#[async_trait]
impl LeaveTypeStore for LeaveTypeRepository {
    async fn find(&self, id: LeaveTypeId) -> Result<Option<LeaveType>, StoreError> {
        leave_types::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LeaveType>, StoreError> {
        leave_types::Entity::find()
            .filter(leave_types::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(from_model)
            .transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<LeaveType>, StoreError> {
        let mut query = leave_types::Entity::find();
        if active_only {
            query = query.filter(leave_types::Column::Active.eq(true));
        }
        query
            .order_by_asc(leave_types::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(from_model)
            .collect()
    }

    async fn list_consuming_quota(&self) -> Result<Vec<LeaveType>, StoreError> {
        leave_types::Entity::find()
            .filter(leave_types::Column::ConsumesQuota.eq(true))
            .order_by_asc(leave_types::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(from_model)
            .collect()
    }

    async fn insert(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError> {
        let model = to_active_model(&leave_type)?
            .insert(&self.db)
            .await
            .map_err(store_error)?;
        from_model(model)
    }

    async fn update(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError> {
        let model = to_active_model(&leave_type)?
            .update(&self.db)
            .await
            .map_err(store_error)?;
        from_model(model)
    }
}
