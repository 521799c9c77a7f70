//! Entity re-exports.

pub use super::cities::Entity as Cities;
pub use super::employees::Entity as Employees;
pub use super::leave_quotas::Entity as LeaveQuotas;
pub use super::leave_types::Entity as LeaveTypes;
pub use super::time_off_requests::Entity as TimeOffRequests;
