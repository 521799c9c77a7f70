//! Leave-type catalogue.
//!
//! # Modules
//!
//! - `types` - Leave type and its duration rules
//! - `error` - Catalogue error types
//! - `service` - Catalogue administration

pub mod error;
pub mod service;
pub mod types;

pub use error::LeaveTypeError;
pub use service::LeaveTypeService;
pub use types::{LeaveType, LeaveTypeInput};
