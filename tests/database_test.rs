//! Database functionality tests
//!
//! Migrations, default content seeding and the startup retry loop.

mod common;

use anyhow::Result;
use czaplisko::database::entities::*;
use czaplisko::database::connection::{connect_with_retry, sqlite_url};
use czaplisko::database::migrations::Migrator;
use czaplisko::database::seed_data::{
    seed_defaults, seed_with_retry, SeedReport, SeedRetry, DEFAULT_APARTMENTS,
    DEFAULT_NAVIGATION, DEFAULT_PRICING, DEFAULT_SEASONS, DEFAULT_SETTINGS,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set, Statement,
};
use sea_orm_migration::MigratorTrait;
use serde_json::json;

use common::test_db;

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = test_db().await?;

    assert_eq!(apartments::Entity::find().count(&db).await?, 0);
    assert_eq!(pricing::Entity::find().count(&db).await?, 0);
    assert_eq!(season_ranges::Entity::find().count(&db).await?, 0);
    assert_eq!(page_content::Entity::find().count(&db).await?, 0);
    assert_eq!(media::Entity::find().count(&db).await?, 0);
    assert_eq!(news::Entity::find().count(&db).await?, 0);
    assert_eq!(navigation_items::Entity::find().count(&db).await?, 0);
    assert_eq!(global_settings::Entity::find().count(&db).await?, 0);
    assert_eq!(pages::Entity::find().count(&db).await?, 0);

    // Running again is a no-op.
    Migrator::up(&db, None).await?;
    Migrator::down(&db, None).await?;
    Migrator::up(&db, None).await?;
    assert_eq!(apartments::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_seed_fills_empty_tables_once() -> Result<()> {
    let (db, _temp_file) = test_db().await?;

    let report = seed_defaults(&db).await?;
    assert_eq!(
        report,
        SeedReport {
            apartments: true,
            settings: true,
            seasons: true,
            navigation: true,
            page_content: true,
        }
    );

    assert_eq!(
        apartments::Entity::find().count(&db).await?,
        DEFAULT_APARTMENTS.len() as u64
    );
    assert_eq!(
        pricing::Entity::find().count(&db).await?,
        (DEFAULT_APARTMENTS.len() * DEFAULT_PRICING.len()) as u64
    );
    assert_eq!(
        season_ranges::Entity::find().count(&db).await?,
        DEFAULT_SEASONS.len() as u64
    );
    assert_eq!(
        navigation_items::Entity::find().count(&db).await?,
        DEFAULT_NAVIGATION.len() as u64
    );
    assert_eq!(
        global_settings::Entity::find().count(&db).await?,
        DEFAULT_SETTINGS.len() as u64
    );

    let again = seed_defaults(&db).await?;
    assert_eq!(again, SeedReport::default());
    assert_eq!(
        apartments::Entity::find().count(&db).await?,
        DEFAULT_APARTMENTS.len() as u64
    );

    Ok(())
}

#[tokio::test]
async fn test_seed_only_touches_empty_tables() -> Result<()> {
    let (db, _temp_file) = test_db().await?;
    let now = chrono::Utc::now();

    apartments::ActiveModel {
        name: Set("Własny".to_string()),
        slug: Set("wlasny".to_string()),
        description: Set("Dodany ręcznie".to_string()),
        amenities: Set(json!([])),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let report = seed_defaults(&db).await?;
    assert!(!report.apartments);
    assert!(report.settings);
    assert_eq!(apartments::Entity::find().count(&db).await?, 1);
    assert_eq!(pricing::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_apartment_delete_cascades() -> Result<()> {
    let (db, _temp_file) = test_db().await?;
    seed_defaults(&db).await?;

    let apartment = apartments::Entity::find()
        .one(&db)
        .await?
        .expect("seeded apartment");
    apartments::Entity::delete_by_id(apartment.id).exec(&db).await?;

    let orphaned = pricing::Entity::find()
        .filter(pricing::Column::ApartmentId.eq(apartment.id))
        .count(&db)
        .await?;
    assert_eq!(orphaned, 0);

    Ok(())
}

#[tokio::test]
async fn test_seed_retry_gives_up_without_panicking() -> Result<()> {
    let (db, _temp_file) = test_db().await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE global_settings".to_string(),
    ))
    .await?;

    assert!(seed_with_retry(&db, SeedRetry::immediate(2)).await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_seed_retry_reports_success() -> Result<()> {
    let (db, _temp_file) = test_db().await?;

    let report = seed_with_retry(&db, SeedRetry::immediate(1)).await;
    assert!(report.map(|r| r.apartments).unwrap_or(false));

    Ok(())
}

#[tokio::test]
async fn test_connect_retry_gives_up_on_unreachable_database() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing").join("czaplisko.db");
    let url = sqlite_url(&missing.display().to_string());

    let err = connect_with_retry(&url, SeedRetry::immediate(3))
        .await
        .expect_err("parent directory does not exist");
    assert!(err.to_string().contains("after 3 attempts"));

    Ok(())
}

#[tokio::test]
async fn test_connect_retry_migrates_reachable_database() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = sqlite_url(&dir.path().join("czaplisko.db").display().to_string());

    let db = connect_with_retry(&url, SeedRetry::immediate(2)).await?;
    assert_eq!(apartments::Entity::find().count(&db).await?, 0);

    Ok(())
}
