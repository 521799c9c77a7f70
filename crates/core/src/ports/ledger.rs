//! Quota ledger port.

use async_trait::async_trait;
use leavedesk_shared::types::EmployeeId;

use super::store::StoreError;
use crate::quota::{QuotaBalance, QuotaError};

/// Per-employee, per-year leave-day ledger.
///
/// Every mutation is atomic per `(employee_id, year)`: concurrent deductions
/// against one key observe each other.
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Days granted when an entry is created lazily.
    fn default_allotment(&self) -> u32;

    /// Finds an entry without creating it.
    async fn find(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Option<QuotaBalance>, StoreError>;

    /// Returns the entry, creating it with the default allotment if absent.
    async fn fetch_or_init(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<QuotaBalance, StoreError>;

    /// Creates an entry. Fails with [`QuotaError::AlreadyExists`] if one exists.
    async fn create(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError>;

    /// Moves `days` from remaining to used.
    ///
    /// Fails with [`QuotaError::InsufficientBalance`] and leaves the entry
    /// untouched when fewer than `days` remain.
    async fn deduct(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError>;

    /// Moves `days` from used back to remaining.
    async fn restore(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError>;

    /// Overwrites the remaining days of an existing entry.
    async fn set_allotment(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError>;

    /// Resets every entry of `year`. Returns the number of entries touched.
    async fn reset_year(&self, year: i32, allotment: u32) -> Result<u64, StoreError>;

    /// Lists every entry of `year`.
    async fn list_year(&self, year: i32) -> Result<Vec<QuotaBalance>, StoreError>;
}
