//! Per-employee, per-year leave-day ledger.
//!
//! # Modules
//!
//! - `types` - Ledger entry and balance summary
//! - `error` - Quota-specific error types
//! - `service` - Quota queries and administration

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use error::QuotaError;
pub use service::QuotaService;
pub use types::{QuotaBalance, QuotaSummary};
