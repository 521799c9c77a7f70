//! Schema migration runner for Leavedesk, for deployments that start the
//! server with `database.run_migrations = false`.
//!
//! Reads `DATABASE_URL`.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show applied and pending migrations
//!   migrator fresh   - Drop the schema and apply every migration

use leavedesk_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
