use std::collections::HashMap;

use async_trait::async_trait;
use leavedesk_shared::types::LeaveTypeId;
use tokio::sync::RwLock;

use crate::leave_type::LeaveType;
use crate::ports::{LeaveTypeStore, StoreError};

/// Leave-type catalogue backed by a map.
#[derive(Debug, Default)]
pub struct MemoryLeaveTypeStore {
    types: RwLock<HashMap<LeaveTypeId, LeaveType>>,
}

impl MemoryLeaveTypeStore {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn code_taken(types: &HashMap<LeaveTypeId, LeaveType>, leave_type: &LeaveType) -> bool {
    types
        .values()
        .any(|t| t.id != leave_type.id && t.code == leave_type.code)
}

#[async_trait]
impl LeaveTypeStore for MemoryLeaveTypeStore {
    async fn find(&self, id: LeaveTypeId) -> Result<Option<LeaveType>, StoreError> {
        Ok(self.types.read().await.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LeaveType>, StoreError> {
        Ok(self
            .types
            .read()
            .await
            .values()
            .find(|t| t.code == code)
            .cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<LeaveType>, StoreError> {
        let mut listed: Vec<_> = self
            .types
            .read()
            .await
            .values()
            .filter(|t| !active_only || t.active)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(listed)
    }

    async fn insert(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError> {
        let mut types = self.types.write().await;
        if types.contains_key(&leave_type.id) || code_taken(&types, &leave_type) {
            return Err(StoreError::Conflict(format!(
                "leave type code {}",
                leave_type.code
            )));
        }
        types.insert(leave_type.id, leave_type.clone());
        Ok(leave_type)
    }

    async fn update(&self, leave_type: LeaveType) -> Result<LeaveType, StoreError> {
        let mut types = self.types.write().await;
        if !types.contains_key(&leave_type.id) {
            return Err(StoreError::Missing(format!("leave type {}", leave_type.id)));
        }
        if code_taken(&types, &leave_type) {
            return Err(StoreError::Conflict(format!(
                "leave type code {}",
                leave_type.code
            )));
        }
        types.insert(leave_type.id, leave_type.clone());
        Ok(leave_type)
    }
}
