//! Read-only views of the employee directory and the destination catalogue.

use async_trait::async_trait;
use leavedesk_shared::types::{CityId, EmployeeId};
use serde::{Deserialize, Serialize};

use super::store::StoreError;

/// An employee as seen by the leave workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee ID.
    pub id: EmployeeId,
    /// Direct supervisor; `None` at the top of the hierarchy.
    pub supervisor_id: Option<EmployeeId>,
    /// Display name.
    pub full_name: String,
    /// Address for decision notifications.
    pub email: Option<String>,
    /// Whether the employee is still active.
    pub active: bool,
}

impl Employee {
    /// An active employee with a fresh ID and no email address.
    #[must_use]
    pub fn new(full_name: impl Into<String>, supervisor_id: Option<EmployeeId>) -> Self {
        Self {
            id: EmployeeId::new(),
            supervisor_id,
            full_name: full_name.into(),
            email: None,
            active: true,
        }
    }

    /// Returns true if `supervisor_id` is this employee's direct supervisor.
    #[must_use]
    pub fn reports_to(&self, supervisor_id: EmployeeId) -> bool {
        self.supervisor_id == Some(supervisor_id)
    }
}

/// Employee lookup.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee by ID.
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Returns the direct supervisor of an employee, if any.
    async fn supervisor_of(&self, id: EmployeeId) -> Result<Option<EmployeeId>, StoreError> {
        Ok(self
            .find_by_id(id)
            .await?
            .and_then(|employee| employee.supervisor_id))
    }

    /// Lists the direct reports of a supervisor.
    async fn subordinates_of(&self, supervisor_id: EmployeeId)
    -> Result<Vec<Employee>, StoreError>;
}

/// A business-travel destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// City ID.
    pub id: CityId,
    /// City name.
    pub name: String,
    /// Province or region.
    pub province: String,
    /// Whether the city can still be chosen as a destination.
    pub active: bool,
}

/// Destination lookup.
#[async_trait]
pub trait DestinationDirectory: Send + Sync {
    /// Finds a city by ID.
    async fn find_city(&self, id: CityId) -> Result<Option<City>, StoreError>;
}
