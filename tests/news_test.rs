//! News posts: slugs, publication timestamps and the public listing.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

async fn create(app: &TestApp, body: Value) -> Value {
    let response = app.admin_post("/api/admin/news").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_repeated_titles_get_numbered_slugs() -> Result<()> {
    let app = spawn_app().await?;

    let first = create(&app, json!({ "title": "Ważne ogłoszenie", "content": "Pierwsze" })).await;
    let second = create(&app, json!({ "title": "Ważne ogłoszenie", "content": "Drugie" })).await;

    assert_eq!(first["slug"], "wazne-ogloszenie");
    assert_eq!(second["slug"], "wazne-ogloszenie-1");

    Ok(())
}

#[tokio::test]
async fn test_published_at_follows_status() -> Result<()> {
    let app = spawn_app().await?;

    let draft = create(&app, json!({ "title": "Szkic", "content": "..." })).await;
    assert_eq!(draft["status"], "draft");
    assert!(draft["publishedAt"].is_null());

    let id = draft["id"].as_i64().expect("id");
    let published: Value = app
        .admin_put(&format!("/api/admin/news/{}", id))
        .json(&json!({ "status": "published" }))
        .await
        .json();
    assert!(published["publishedAt"].is_string());

    let edited: Value = app
        .admin_put(&format!("/api/admin/news/{}", id))
        .json(&json!({ "title": "Poprawiony tytuł", "status": "published" }))
        .await
        .json();
    assert_eq!(edited["publishedAt"], published["publishedAt"]);
    assert_eq!(edited["slug"], "szkic");

    let unpublished: Value = app
        .admin_put(&format!("/api/admin/news/{}", id))
        .json(&json!({ "status": "draft" }))
        .await
        .json();
    assert!(unpublished["publishedAt"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_public_listing_only_shows_published_posts() -> Result<()> {
    let app = spawn_app().await?;
    for n in 0..3 {
        create(
            &app,
            json!({ "title": format!("Wpis {}", n), "content": "Treść", "status": "published" }),
        )
        .await;
    }
    create(&app, json!({ "title": "Ukryty", "content": "Treść" })).await;

    let page: Value = app
        .server
        .get("/api/public/news")
        .add_query_param("page", 1)
        .add_query_param("limit", 2)
        .await
        .json();
    assert_eq!(page["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["pagination"]["total"], 3);
    assert_eq!(page["pagination"]["totalPages"], 2);
    assert!(page["data"][0].get("content").is_none());

    let page: Value = app
        .server
        .get("/api/public/news")
        .add_query_param("page", "abc")
        .add_query_param("limit", 0)
        .await
        .json();
    assert_eq!(page["pagination"]["page"], 1);
    assert_eq!(page["pagination"]["limit"], 10);

    let response = app
        .server
        .get("/api/public/news")
        .add_query_param("page", "99999999999999999999")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(page["pagination"]["total"], 3);

    let post: Value = app.server.get("/api/public/news/wpis-0").await.json();
    assert_eq!(post["content"], "Treść");

    let response = app
        .server
        .get("/api/public/news/ukryty")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let drafts: Vec<Value> = app
        .admin_get("/api/admin/news")
        .add_query_param("status", "draft")
        .await
        .json();
    assert_eq!(drafts.len(), 1);
    let everything: Vec<Value> = app.admin_get("/api/admin/news").await.json();
    assert_eq!(everything.len(), 4);

    let response = app
        .admin_get("/api/admin/news")
        .add_query_param("status", "archived")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_news_validation_and_delete() -> Result<()> {
    let app = spawn_app().await?;

    let response = app
        .admin_post("/api/admin/news")
        .json(&json!({ "title": "", "content": "x", "featureImage": "nie-url" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fields = &response.json::<Value>()["data"]["fieldErrors"];
    assert!(fields["title"].is_array());
    assert!(fields["featureImage"].is_array());

    let post = create(&app, json!({ "title": "Do usunięcia", "content": "x" })).await;
    let id = post["id"].as_i64().expect("id");
    let response = app.admin_delete(&format!("/api/admin/news/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = app
        .admin_get(&format!("/api/admin/news/{}", id))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}
