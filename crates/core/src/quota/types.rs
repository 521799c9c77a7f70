//! Quota ledger entry.
//!
//! An entry stores the days still available and the days already consumed.
//! The allotment is not stored; it is derived as `remaining + used`, so an
//! administrative overwrite of the remaining days shifts the derived
//! allotment as well.

use leavedesk_shared::types::EmployeeId;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::quota::error::QuotaError;

/// One ledger entry, keyed by `(employee_id, year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaBalance {
    /// Owner of the entry.
    pub employee_id: EmployeeId,
    /// Calendar year.
    pub year: i32,
    /// Days still available. Never negative.
    pub remaining_days: u32,
    /// Days consumed by approved requests.
    pub used_days: u32,
}

impl QuotaBalance {
    /// A fresh entry with nothing used.
    #[must_use]
    pub const fn new(employee_id: EmployeeId, year: i32, allotment: u32) -> Self {
        Self {
            employee_id,
            year,
            remaining_days: allotment,
            used_days: 0,
        }
    }

    /// Derived allotment: `remaining + used`.
    #[must_use]
    pub const fn allotment(&self) -> u32 {
        self.remaining_days.saturating_add(self.used_days)
    }

    /// Returns true if `days` can be deducted.
    #[must_use]
    pub const fn has_sufficient(&self, days: u32) -> bool {
        days <= self.remaining_days
    }

    /// Moves `days` from remaining to used.
    ///
    /// # Errors
    ///
    /// Returns `QuotaError::InsufficientBalance` without modifying the entry
    /// if fewer than `days` remain.
    pub fn deduct(&mut self, days: u32) -> Result<(), QuotaError> {
        let Some(remaining) = self.remaining_days.checked_sub(days) else {
            return Err(QuotaError::InsufficientBalance {
                available: self.remaining_days,
                requested: days,
            });
        };
        self.remaining_days = remaining;
        self.used_days = self.used_days.saturating_add(days);
        Ok(())
    }

    /// Moves `days` from used back to remaining. `used_days` floors at zero.
    pub fn restore(&mut self, days: u32) {
        self.remaining_days = self.remaining_days.saturating_add(days);
        self.used_days = self.used_days.saturating_sub(days);
    }

    /// Start-of-year reset.
    pub fn reset(&mut self, allotment: u32) {
        self.remaining_days = allotment;
        self.used_days = 0;
    }

    /// Manual correction: overwrites the remaining days and keeps `used_days`.
    pub fn set_allotment(&mut self, allotment: u32) {
        self.remaining_days = allotment;
    }

    /// Builds the reporting view of this entry.
    #[must_use]
    pub fn summary(&self) -> QuotaSummary {
        let allotment = self.allotment();
        let percentage_used = if allotment == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(self.used_days) * Decimal::ONE_HUNDRED / Decimal::from(allotment))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        QuotaSummary {
            employee_id: self.employee_id,
            year: self.year,
            allotment,
            used_days: self.used_days,
            remaining_days: self.remaining_days,
            percentage_used,
        }
    }
}

/// Balance report for one employee and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSummary {
    /// Owner of the entry.
    pub employee_id: EmployeeId,
    /// Calendar year.
    pub year: i32,
    /// `remaining + used`.
    pub allotment: u32,
    /// Days consumed.
    pub used_days: u32,
    /// Days still available.
    pub remaining_days: u32,
    /// Share of the allotment used, in percent, two decimal places.
    pub percentage_used: Decimal,
}
