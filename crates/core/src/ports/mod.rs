//! Traits for the collaborators and stores the domain logic is written against.
//!
//! Production implementations live in `leavedesk-db`; in-memory ones live in
//! [`crate::memory`].

pub mod clock;
pub mod directory;
pub mod ledger;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{City, DestinationDirectory, Employee, EmployeeDirectory};
pub use ledger::QuotaLedger;
pub use store::{LeaveTypeStore, RequestStore, StoreError};
