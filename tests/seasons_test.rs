//! Season ranges and the pricing calculator built on them.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use czaplisko::database::entities::season_ranges;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn test_overlapping_season_is_rejected_before_any_write() -> Result<()> {
    let app = spawn_app().await?;

    let response = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Test", "startDate": "2025-06-01", "endDate": "2025-06-10" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let first: Value = response.json();
    assert_eq!(first["startDate"], "2025-06-01");

    let response = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Druga", "startDate": "2025-06-05", "endDate": "2025-06-20" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Date range overlaps existing season: Test");

    assert_eq!(season_ranges::Entity::find().count(&app.db).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_touching_ranges_overlap_and_adjacent_ranges_do_not() -> Result<()> {
    let app = spawn_app().await?;

    app.admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Czerwiec", "startDate": "2025-06-01", "endDate": "2025-06-10" }))
        .await;

    let response = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Styk", "startDate": "2025-06-10", "endDate": "2025-06-12" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Obok", "startDate": "2025-06-11", "endDate": "2025-06-12" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_season_update_ignores_itself_but_not_neighbours() -> Result<()> {
    let app = spawn_app().await?;

    let first: Value = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Majówka", "startDate": "2025-05-01", "endDate": "2025-05-04" }))
        .await
        .json();
    app.admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Wakacje", "startDate": "2025-07-01", "endDate": "2025-08-31" }))
        .await;
    let id = first["id"].as_i64().expect("id");

    let response = app
        .admin_put(&format!("/api/admin/seasons/{}", id))
        .json(&json!({ "label": "Majówka", "startDate": "2025-04-30", "endDate": "2025-05-05" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .admin_put(&format!("/api/admin/seasons/{}", id))
        .json(&json!({ "label": "Majówka", "startDate": "2025-04-30", "endDate": "2025-07-02" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Date range overlaps existing season: Wakacje"
    );

    let seasons: Vec<Value> = app.admin_get("/api/admin/seasons").await.json();
    assert_eq!(seasons[0]["endDate"], "2025-05-05");

    Ok(())
}

#[tokio::test]
async fn test_season_dates_are_validated() -> Result<()> {
    let app = spawn_app().await?;

    let response = app
        .admin_post("/api/admin/seasons")
        .json(&json!({ "label": "", "startDate": "2025-6-1", "endDate": "2025-02-30" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let fields = &response.json::<Value>()["data"]["fieldErrors"];
    assert!(fields["label"].is_array());
    assert!(fields["startDate"].is_array());
    assert!(fields["endDate"].is_array());

    let response = app
        .admin_delete("/api/admin/seasons/999")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}
