//! Shared types, errors, and configuration for Leavedesk.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and the JWT service
//! - SMTP email delivery

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::{AppConfig, EmailConfig, JwtSettings, LeaveConfig};
pub use email::{EmailError, EmailService};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
