//! Leavedesk API Server
//!
//! Main entry point for the leave and business-travel service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leavedesk_api::{AppState, create_router};
use leavedesk_core::notify::{EmailNotifier, LogNotifier, NotificationSink};
use leavedesk_core::ports::SystemClock;
use leavedesk_core::workflow::SubmissionPolicy;
use leavedesk_db::migration::{Migrator, MigratorTrait};
use leavedesk_db::{PgBackend, connect};
use leavedesk_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leavedesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let backend = PgBackend::new(&db, config.leave.default_annual_allotment);

    let notifier: Arc<dyn NotificationSink> = if config.email.enabled {
        info!(
            smtp_host = %config.email.smtp_host,
            smtp_port = %config.email.smtp_port,
            "Decision emails enabled"
        );
        Arc::new(EmailNotifier::new(
            EmailService::new(config.email.clone()),
            backend.directory.clone(),
        ))
    } else {
        Arc::new(LogNotifier)
    };

    let ctx = backend.context(
        Arc::new(SystemClock),
        notifier,
        SubmissionPolicy::from(&config.leave),
    );

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("access_token_expiry_secs out of range")?,
    });

    let app = create_router(AppState::new(&ctx, jwt_service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
