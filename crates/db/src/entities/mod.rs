//! `SeaORM` entity definitions.

pub mod prelude;

pub mod cities;
pub mod employees;
pub mod leave_quotas;
pub mod leave_types;
pub mod sea_orm_active_enums;
pub mod time_off_requests;
