//! Core business logic for Leavedesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the request lifecycle live here.
//!
//! # Modules
//!
//! - `quota` - Per-employee, per-year leave-day ledger
//! - `workflow` - Leave and business-travel request lifecycle
//! - `leave_type` - Leave-type catalogue
//! - `ports` - Traits for storage and external collaborators
//! - `memory` - In-memory implementations of the storage ports
//! - `notify` - Decision notification sinks

pub mod leave_type;
pub mod memory;
pub mod notify;
pub mod ports;
pub mod quota;
pub mod workflow;
