use async_trait::async_trait;
use dashmap::DashMap;
use leavedesk_shared::types::{CityId, EmployeeId};

use crate::ports::{City, DestinationDirectory, Employee, EmployeeDirectory, StoreError};

/// Employee and city directory backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: DashMap<EmployeeId, Employee>,
    cities: DashMap<CityId, City>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an employee.
    pub fn add_employee(&self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }

    /// Adds or replaces a city.
    pub fn add_city(&self, city: City) {
        self.cities.insert(city.id, city);
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryDirectory {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.get(&id).map(|e| e.value().clone()))
    }

    async fn subordinates_of(
        &self,
        supervisor_id: EmployeeId,
    ) -> Result<Vec<Employee>, StoreError> {
        let mut team: Vec<_> = self
            .employees
            .iter()
            .filter(|e| e.reports_to(supervisor_id))
            .map(|e| e.value().clone())
            .collect();
        team.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(team)
    }
}

#[async_trait]
impl DestinationDirectory for MemoryDirectory {
    async fn find_city(&self, id: CityId) -> Result<Option<City>, StoreError> {
        Ok(self.cities.get(&id).map(|c| c.value().clone()))
    }
}
