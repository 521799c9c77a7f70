use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use leavedesk_shared::types::EmployeeId;

use crate::ports::{QuotaLedger, StoreError};
use crate::quota::{QuotaBalance, QuotaError};

/// Quota ledger backed by a concurrent map.
///
/// Each mutation runs while holding the map entry for its key, which makes the
/// read-modify-write atomic per `(employee, year)`.
#[derive(Debug)]
pub struct MemoryQuotaLedger {
    entries: DashMap<(EmployeeId, i32), QuotaBalance>,
    default_allotment: u32,
}

impl MemoryQuotaLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(default_allotment: u32) -> Self {
        Self {
            entries: DashMap::new(),
            default_allotment,
        }
    }
}

#[async_trait]
impl QuotaLedger for MemoryQuotaLedger {
    fn default_allotment(&self) -> u32 {
        self.default_allotment
    }

    async fn find(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Option<QuotaBalance>, StoreError> {
        Ok(self.entries.get(&(employee_id, year)).map(|entry| *entry))
    }

    async fn fetch_or_init(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<QuotaBalance, StoreError> {
        let entry = self
            .entries
            .entry((employee_id, year))
            .or_insert_with(|| QuotaBalance::new(employee_id, year, self.default_allotment));
        Ok(*entry)
    }

    async fn create(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        match self.entries.entry((employee_id, year)) {
            Entry::Occupied(_) => Err(QuotaError::AlreadyExists { employee_id, year }),
            Entry::Vacant(slot) => {
                let entry = slot.insert(QuotaBalance::new(employee_id, year, allotment));
                Ok(*entry)
            }
        }
    }

    async fn deduct(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let mut entry = self
            .entries
            .entry((employee_id, year))
            .or_insert_with(|| QuotaBalance::new(employee_id, year, self.default_allotment));
        entry.deduct(days)?;
        Ok(*entry)
    }

    async fn restore(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let mut entry = self
            .entries
            .entry((employee_id, year))
            .or_insert_with(|| QuotaBalance::new(employee_id, year, self.default_allotment));
        entry.restore(days);
        Ok(*entry)
    }

    async fn set_allotment(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let mut entry = self
            .entries
            .get_mut(&(employee_id, year))
            .ok_or(QuotaError::NotFound { employee_id, year })?;
        entry.set_allotment(allotment);
        Ok(*entry)
    }

    async fn reset_year(&self, year: i32, allotment: u32) -> Result<u64, StoreError> {
        let mut count = 0;
        for mut entry in self.entries.iter_mut().filter(|e| e.key().1 == year) {
            entry.reset(allotment);
            count += 1;
        }
        Ok(count)
    }

    async fn list_year(&self, year: i32) -> Result<Vec<QuotaBalance>, StoreError> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.key().1 == year)
            .map(|e| *e.value())
            .collect();
        entries.sort_by_key(|e| e.employee_id);
        Ok(entries)
    }
}
