pub mod app;
pub mod handlers;
pub mod middleware;
pub mod requests;

use anyhow::{Context, Result};
use clap::Subcommand;
use sea_orm_migration::prelude::*;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::connection::{connect_with_retry, establish_connection, setup_database};
use crate::database::migrations::Migrator;
use crate::database::seed_data::{seed_defaults, seed_with_retry, SeedRetry};
use crate::storage::MediaStorage;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

pub async fn start_server(
    port: u16,
    config: AppConfig,
    cors_origin: Option<&str>,
    seed_on_start: bool,
) -> Result<()> {
    let db = connect_with_retry(&config.database_url, SeedRetry::default())
        .await
        .context("Failed to prepare database")?;
    info!("Database migrations completed");

    let storage = MediaStorage::from_r2(&config.r2).context("Failed to configure R2 storage")?;

    if seed_on_start {
        let seed_db = db.clone();
        tokio::spawn(async move {
            if seed_with_retry(&seed_db, SeedRetry::default()).await.is_none() {
                warn!("Starting without default content; run `czaplisko seed` once the database is reachable");
            }
        });
    }

    let state = app::AppState::new(db, config.auth, storage, config.public_fallback);
    let app = app::create_app(state, cors_origin)?;

    log_routes(config.public_fallback);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(fallback: crate::services::fallback::FallbackPolicy) {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api/auth/*                 - Login, logout, current user");
    info!("  /api/public/*               - Site content (fallback: {:?})", fallback);
    info!("  /api/admin/*                - Content management (authenticated)");
}

pub async fn migrate_database(database_url: &str, direction: MigrateDirection) -> Result<()> {
    let db = establish_connection(database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}

/// One-shot seeding for the `seed` command; unlike startup seeding it fails loudly.
pub async fn seed_database(database_url: &str) -> Result<()> {
    let db = setup_database(database_url).await?;
    let report = seed_defaults(&db).await?;
    info!("Seeding finished: {:?}", report);
    Ok(())
}
