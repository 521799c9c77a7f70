//! Leave-type catalogue administration.

use std::sync::Arc;

use leavedesk_shared::types::LeaveTypeId;
use tracing::info;

use crate::leave_type::error::LeaveTypeError;
use crate::leave_type::types::{LeaveType, LeaveTypeInput};
use crate::ports::{Clock, LeaveTypeStore, StoreError};

/// Creates, edits and deactivates leave types.
#[derive(Clone)]
pub struct LeaveTypeService {
    store: Arc<dyn LeaveTypeStore>,
    clock: Arc<dyn Clock>,
}

impl LeaveTypeService {
    /// Creates a new leave-type service.
    #[must_use]
    pub fn new(store: Arc<dyn LeaveTypeStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a leave type. New types are always active.
    pub async fn create(&self, input: LeaveTypeInput) -> Result<LeaveType, LeaveTypeError> {
        input.validate()?;
        let code = input.normalized_code();
        if self.store.find_by_code(&code).await?.is_some() {
            return Err(LeaveTypeError::DuplicateCode(code));
        }

        let now = self.clock.now();
        let leave_type = LeaveType {
            id: LeaveTypeId::new(),
            code: code.clone(),
            name: input.name.trim().to_string(),
            description: input.description,
            min_duration_days: input.min_duration_days,
            max_duration_days: input.max_duration_days,
            consumes_quota: input.consumes_quota,
            is_paid: input.is_paid,
            requires_document: input.requires_document,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .store
            .insert(leave_type)
            .await
            .map_err(|e| duplicate_or(e, &code))?;
        info!(leave_type_id = %created.id, code = %created.code, "Leave type created");
        Ok(created)
    }

    /// Replaces every editable field of a leave type.
    pub async fn update(
        &self,
        id: LeaveTypeId,
        input: LeaveTypeInput,
    ) -> Result<LeaveType, LeaveTypeError> {
        input.validate()?;
        let mut leave_type = self.get(id).await?;

        let code = input.normalized_code();
        if code != leave_type.code
            && let Some(other) = self.store.find_by_code(&code).await?
            && other.id != id
        {
            return Err(LeaveTypeError::DuplicateCode(code));
        }

        leave_type.code.clone_from(&code);
        leave_type.name = input.name.trim().to_string();
        leave_type.description = input.description;
        leave_type.min_duration_days = input.min_duration_days;
        leave_type.max_duration_days = input.max_duration_days;
        leave_type.consumes_quota = input.consumes_quota;
        leave_type.is_paid = input.is_paid;
        leave_type.requires_document = input.requires_document;
        if let Some(active) = input.active {
            leave_type.active = active;
        }
        leave_type.updated_at = self.clock.now();

        let updated = self
            .store
            .update(leave_type)
            .await
            .map_err(|e| duplicate_or(e, &code))?;
        info!(leave_type_id = %updated.id, code = %updated.code, "Leave type updated");
        Ok(updated)
    }

    /// Soft-deletes a leave type. Existing requests keep referencing it.
    pub async fn deactivate(&self, id: LeaveTypeId) -> Result<LeaveType, LeaveTypeError> {
        let mut leave_type = self.get(id).await?;
        leave_type.active = false;
        leave_type.updated_at = self.clock.now();

        let updated = self.store.update(leave_type).await?;
        info!(leave_type_id = %updated.id, code = %updated.code, "Leave type deactivated");
        Ok(updated)
    }

    /// Finds a leave type by ID.
    pub async fn get(&self, id: LeaveTypeId) -> Result<LeaveType, LeaveTypeError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| LeaveTypeError::not_found(id))
    }

    /// Finds a leave type by code, case-insensitively.
    pub async fn get_by_code(&self, code: &str) -> Result<LeaveType, LeaveTypeError> {
        let code = code.trim().to_uppercase();
        self.store
            .find_by_code(&code)
            .await?
            .ok_or(LeaveTypeError::NotFound(code))
    }

    /// Active leave types ordered by code.
    pub async fn list_active(&self) -> Result<Vec<LeaveType>, LeaveTypeError> {
        Ok(self.store.list(true).await?)
    }

    /// Leave types that draw on the quota ledger.
    pub async fn list_consuming_quota(&self) -> Result<Vec<LeaveType>, LeaveTypeError> {
        Ok(self.store.list_consuming_quota().await?)
    }
}

fn duplicate_or(err: StoreError, code: &str) -> LeaveTypeError {
    match err {
        StoreError::Conflict(_) => LeaveTypeError::DuplicateCode(code.to_string()),
        other => LeaveTypeError::Storage(other),
    }
}
