use std::time::Duration;

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use super::migrations::Migrator;
use super::seed_data::SeedRetry;

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);

    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// Connects and brings the schema up to date.
pub async fn setup_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = establish_connection(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// [`setup_database`] on the startup backoff schedule, for databases that are
/// still coming up when the server starts. Returns the last error once the
/// attempts run out.
pub async fn connect_with_retry(database_url: &str, retry: SeedRetry) -> Result<DatabaseConnection> {
    let attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        info!("Connecting to database (attempt {}/{})", attempt, attempts);
        match setup_database(database_url).await {
            Ok(db) => return Ok(db),
            Err(e) if attempt < attempts => {
                warn!("Database connection failed (attempt {}): {}", attempt, e);
                let delay = retry.delay_after(attempt);
                info!("Retrying in {} seconds", delay.as_secs());
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("Max attempts reached. Database is unreachable.");
                return Err(e)
                    .with_context(|| format!("Database unreachable after {} attempts", attempts));
            }
        }
    }
}

pub fn sqlite_url(path: &str) -> String {
    if path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}?mode=rwc", path)
    }
}
