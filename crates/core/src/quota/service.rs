//! Quota queries and administration.

use std::sync::Arc;

use chrono::Datelike;
use leavedesk_shared::types::EmployeeId;
use tracing::info;

use crate::ports::{Clock, EmployeeDirectory, QuotaLedger};
use crate::quota::error::QuotaError;
use crate::quota::types::{QuotaBalance, QuotaSummary};

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;

/// Reads and administers the quota ledger.
///
/// The request workflows talk to the [`QuotaLedger`] directly; this service
/// is the surface for balance queries and HR corrections.
#[derive(Clone)]
pub struct QuotaService {
    ledger: Arc<dyn QuotaLedger>,
    directory: Arc<dyn EmployeeDirectory>,
    clock: Arc<dyn Clock>,
}

impl QuotaService {
    /// Creates a new quota service.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn QuotaLedger>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            directory,
            clock,
        }
    }

    /// The calendar year according to the service clock.
    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.clock.today().year()
    }

    fn resolve_year(&self, year: Option<i32>) -> Result<i32, QuotaError> {
        let year = year.unwrap_or_else(|| self.current_year());
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(year)
        } else {
            Err(QuotaError::InvalidYear(year))
        }
    }

    /// Remaining days for the employee, creating a default entry if needed.
    /// `year` defaults to the current year.
    pub async fn get_remaining(
        &self,
        employee_id: EmployeeId,
        year: Option<i32>,
    ) -> Result<u32, QuotaError> {
        let year = self.resolve_year(year)?;
        let entry = self.ledger.fetch_or_init(employee_id, year).await?;
        Ok(entry.remaining_days)
    }

    /// Returns true if `days` fit in the employee's remaining balance.
    pub async fn has_sufficient_balance(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<bool, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let entry = self.ledger.fetch_or_init(employee_id, year).await?;
        Ok(entry.has_sufficient(days))
    }

    /// Atomically moves `days` from remaining to used.
    pub async fn deduct(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let entry = self.ledger.deduct(employee_id, year, days).await?;
        info!(%employee_id, year, days, remaining = entry.remaining_days, "Quota deducted");
        Ok(entry)
    }

    /// Atomically moves `days` from used back to remaining.
    pub async fn restore(
        &self,
        employee_id: EmployeeId,
        year: i32,
        days: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let entry = self.ledger.restore(employee_id, year, days).await?;
        info!(%employee_id, year, days, remaining = entry.remaining_days, "Quota restored");
        Ok(entry)
    }

    /// Resets every entry of `year` to `allotment` remaining and zero used.
    pub async fn reset_year(&self, year: i32, allotment: u32) -> Result<u64, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let count = self.ledger.reset_year(year, allotment).await?;
        info!(year, allotment, entries = count, "Quota year reset");
        Ok(count)
    }

    /// Overwrites the remaining days of an existing entry.
    pub async fn set_allotment(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: u32,
    ) -> Result<QuotaBalance, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let entry = self
            .ledger
            .set_allotment(employee_id, year, allotment)
            .await?;
        info!(%employee_id, year, allotment, "Quota allotment set");
        Ok(entry)
    }

    /// Creates the entry for a known employee. The allotment defaults to the
    /// ledger's default.
    pub async fn create_initial(
        &self,
        employee_id: EmployeeId,
        year: i32,
        allotment: Option<u32>,
    ) -> Result<QuotaBalance, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        if self.directory.find_by_id(employee_id).await?.is_none() {
            return Err(QuotaError::EmployeeNotFound(employee_id));
        }

        let allotment = allotment.unwrap_or_else(|| self.ledger.default_allotment());
        let entry = self.ledger.create(employee_id, year, allotment).await?;
        info!(%employee_id, year, allotment, "Quota created");
        Ok(entry)
    }

    /// Balance report for one employee.
    pub async fn summary(
        &self,
        employee_id: EmployeeId,
        year: Option<i32>,
    ) -> Result<QuotaSummary, QuotaError> {
        let year = self.resolve_year(year)?;
        let entry = self.ledger.fetch_or_init(employee_id, year).await?;
        Ok(entry.summary())
    }

    /// Balance reports for every direct report of a supervisor.
    pub async fn team_summaries(
        &self,
        supervisor_id: EmployeeId,
        year: Option<i32>,
    ) -> Result<Vec<QuotaSummary>, QuotaError> {
        let year = self.resolve_year(year)?;
        let team = self.directory.subordinates_of(supervisor_id).await?;

        let mut summaries = Vec::with_capacity(team.len());
        for member in team {
            let entry = self.ledger.fetch_or_init(member.id, year).await?;
            summaries.push(entry.summary());
        }
        Ok(summaries)
    }

    /// Every existing entry of `year`.
    pub async fn list_year(&self, year: i32) -> Result<Vec<QuotaSummary>, QuotaError> {
        let year = self.resolve_year(Some(year))?;
        let entries = self.ledger.list_year(year).await?;
        Ok(entries.iter().map(QuotaBalance::summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::memory::{MemoryDirectory, MemoryQuotaLedger};
    use crate::ports::{Employee, FixedClock};

    struct Fixture {
        service: QuotaService,
        directory: Arc<MemoryDirectory>,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(MemoryDirectory::new());
        let ledger = Arc::new(MemoryQuotaLedger::new(12));
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        Fixture {
            service: QuotaService::new(ledger, directory.clone(), clock),
            directory,
        }
    }

    #[tokio::test]
    async fn test_get_remaining_creates_default_entry() {
        let f = fixture();
        let employee = EmployeeId::new();

        assert_eq!(f.service.get_remaining(employee, None).await.unwrap(), 12);
        assert_eq!(f.service.list_year(2026).await.unwrap().len(), 1);
        assert!(f.service.list_year(2025).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_has_sufficient_balance() {
        let f = fixture();
        let employee = EmployeeId::new();

        assert!(f.service.has_sufficient_balance(employee, 2026, 12).await.unwrap());
        assert!(!f.service.has_sufficient_balance(employee, 2026, 13).await.unwrap());
    }

    #[tokio::test]
    async fn test_deduct_then_restore() {
        let f = fixture();
        let employee = EmployeeId::new();

        let entry = f.service.deduct(employee, 2026, 5).await.unwrap();
        assert_eq!((entry.remaining_days, entry.used_days), (7, 5));

        let entry = f.service.restore(employee, 2026, 5).await.unwrap();
        assert_eq!((entry.remaining_days, entry.used_days), (12, 0));
    }

    #[tokio::test]
    async fn test_deduct_insufficient() {
        let f = fixture();
        let employee = EmployeeId::new();
        f.service.deduct(employee, 2026, 10).await.unwrap();

        let err = f.service.deduct(employee, 2026, 3).await.unwrap_err();
        assert!(matches!(
            err,
            QuotaError::InsufficientBalance {
                available: 2,
                requested: 3
            }
        ));
        assert_eq!(f.service.get_remaining(employee, Some(2026)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_initial() {
        let f = fixture();
        let employee = Employee::new("Rina", None);
        f.directory.add_employee(employee.clone());

        let entry = f
            .service
            .create_initial(employee.id, 2026, Some(15))
            .await
            .unwrap();
        assert_eq!(entry.remaining_days, 15);

        let err = f
            .service
            .create_initial(employee.id, 2026, None)
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::AlreadyExists { year: 2026, .. }));
    }

    #[tokio::test]
    async fn test_create_initial_unknown_employee() {
        let f = fixture();
        let err = f
            .service
            .create_initial(EmployeeId::new(), 2026, None)
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::EmployeeNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_allotment_requires_entry() {
        let f = fixture();
        let err = f
            .service
            .set_allotment(EmployeeId::new(), 2026, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_allotment_keeps_used() {
        let f = fixture();
        let employee = EmployeeId::new();
        f.service.deduct(employee, 2026, 4).await.unwrap();

        let entry = f.service.set_allotment(employee, 2026, 12).await.unwrap();
        assert_eq!(entry.remaining_days, 12);
        assert_eq!(entry.used_days, 4);

        let summary = f.service.summary(employee, Some(2026)).await.unwrap();
        assert_eq!(summary.allotment, 16);
    }

    #[tokio::test]
    async fn test_reset_year_only_touches_that_year() {
        let f = fixture();
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        f.service.deduct(a, 2026, 3).await.unwrap();
        f.service.deduct(b, 2026, 7).await.unwrap();
        f.service.deduct(a, 2025, 1).await.unwrap();

        assert_eq!(f.service.reset_year(2026, 14).await.unwrap(), 2);

        for summary in f.service.list_year(2026).await.unwrap() {
            assert_eq!(summary.remaining_days, 14);
            assert_eq!(summary.used_days, 0);
        }
        assert_eq!(f.service.get_remaining(a, Some(2025)).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_team_summaries() {
        let f = fixture();
        let boss = Employee::new("Boss", None);
        let first = Employee::new("First", Some(boss.id));
        let second = Employee::new("Second", Some(boss.id));
        let outsider = Employee::new("Outsider", None);
        for e in [&boss, &first, &second, &outsider] {
            f.directory.add_employee(e.clone());
        }
        f.service.deduct(first.id, 2026, 6).await.unwrap();

        let team = f.service.team_summaries(boss.id, None).await.unwrap();
        assert_eq!(team.len(), 2);
        let first_summary = team.iter().find(|s| s.employee_id == first.id).unwrap();
        assert_eq!(first_summary.used_days, 6);
        assert_eq!(first_summary.percentage_used, rust_decimal_macros::dec!(50));
    }

    #[tokio::test]
    async fn test_invalid_year() {
        let f = fixture();
        let err = f
            .service
            .get_remaining(EmployeeId::new(), Some(1))
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::InvalidYear(1)));
    }
}
