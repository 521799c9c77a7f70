//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Postgres implementations of the core storage ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    DirectoryRepository, LeaveRequestRepository, LeaveTypeRepository, QuotaRepository,
    TravelRequestRepository,
};

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use leavedesk_core::notify::NotificationSink;
use leavedesk_core::ports::Clock;
use leavedesk_core::workflow::{SubmissionPolicy, WorkflowContext};
use leavedesk_shared::config::DatabaseConfig;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// The full set of Postgres repositories.
#[derive(Debug, Clone)]
pub struct PgBackend {
    /// Employees and cities.
    pub directory: Arc<DirectoryRepository>,
    /// Leave requests.
    pub leave_requests: Arc<LeaveRequestRepository>,
    /// Business-travel requests.
    pub travel_requests: Arc<TravelRequestRepository>,
    /// Leave-type catalogue.
    pub leave_types: Arc<LeaveTypeRepository>,
    /// Quota ledger.
    pub ledger: Arc<QuotaRepository>,
}

impl PgBackend {
    /// Builds every repository over one connection pool.
    #[must_use]
    pub fn new(db: &DatabaseConnection, default_allotment: u32) -> Self {
        Self {
            directory: Arc::new(DirectoryRepository::new(db.clone())),
            leave_requests: Arc::new(LeaveRequestRepository::new(db.clone())),
            travel_requests: Arc::new(TravelRequestRepository::new(db.clone())),
            leave_types: Arc::new(LeaveTypeRepository::new(db.clone())),
            ledger: Arc::new(QuotaRepository::new(db.clone(), default_allotment)),
        }
    }

    /// Wires the repositories into a workflow context.
    #[must_use]
    pub fn context(
        &self,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
        policy: SubmissionPolicy,
    ) -> WorkflowContext {
        WorkflowContext {
            directory: self.directory.clone(),
            destinations: self.directory.clone(),
            leave_requests: self.leave_requests.clone(),
            travel_requests: self.travel_requests.clone(),
            leave_types: self.leave_types.clone(),
            ledger: self.ledger.clone(),
            notifier,
            clock,
            policy,
        }
    }
}
