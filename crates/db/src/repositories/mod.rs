//! Repository implementations of the core storage ports.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

mod error;

pub mod directory;
pub mod leave_type;
pub mod quota;
pub mod request;

pub use directory::DirectoryRepository;
pub use leave_type::LeaveTypeRepository;
pub use quota::QuotaRepository;
pub use request::{
    DetailColumns, LeaveRequestRepository, RequestRepository, TravelRequestRepository,
};
