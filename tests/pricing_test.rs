//! Quotes, the public price list and admin pricing rows.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

/// One apartment with high 400 + 100/bed and low 300 + 50/bed, and a
/// high season covering 2025-07-01 ..= 2025-07-02.
async fn priced_apartment(app: &TestApp) -> Result<i64> {
    let apartment: Value = app
        .admin_post("/api/admin/apartments")
        .json(&json!({ "name": "Czapla Siwa", "description": "Test", "amenities": [] }))
        .await
        .json();
    let id = apartment["id"].as_i64().expect("id");

    for (season, price, bed) in [("high", 400.0, 100.0), ("low", 300.0, 50.0)] {
        let response = app
            .admin_post("/api/admin/pricing")
            .json(&json!({
                "apartmentId": id,
                "seasonType": season,
                "pricePerNight": price,
                "extraBedPrice": bed,
                "minStayNights": 2
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    app.admin_post("/api/admin/seasons")
        .json(&json!({ "label": "Lipiec", "startDate": "2025-07-01", "endDate": "2025-07-02" }))
        .await;

    Ok(id)
}

#[tokio::test]
async fn test_quote_prices_each_night_by_its_season() -> Result<()> {
    let app = spawn_app().await?;
    let id = priced_apartment(&app).await?;

    let response = app
        .server
        .get("/api/public/pricing/quote")
        .add_query_param("apartmentId", id)
        .add_query_param("checkIn", "2025-06-30")
        .add_query_param("checkOut", "2025-07-04")
        .add_query_param("extraBeds", 1)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let quote: Value = response.json();
    let breakdown = quote["breakdown"].as_array().expect("breakdown");
    assert_eq!(quote["nights"], 4);
    assert_eq!(breakdown.len(), 4);

    let seasons: Vec<&str> = breakdown
        .iter()
        .filter_map(|night| night["seasonType"].as_str())
        .collect();
    assert_eq!(seasons, vec!["low", "high", "high", "low"]);
    assert_eq!(breakdown[0]["date"], "2025-06-30");
    assert_eq!(breakdown[1]["price"], 500.0);

    let sum: f64 = breakdown.iter().filter_map(|n| n["price"].as_f64()).sum();
    assert_eq!(quote["totalPrice"].as_f64(), Some(sum));
    assert_eq!(sum, 350.0 + 500.0 + 500.0 + 350.0);

    Ok(())
}

#[tokio::test]
async fn test_quote_rejects_bad_ranges_and_unknown_apartments() -> Result<()> {
    let app = spawn_app().await?;
    let id = priced_apartment(&app).await?;

    let response = app
        .server
        .get("/api/public/pricing/quote")
        .add_query_param("apartmentId", id)
        .add_query_param("checkIn", "2025-07-04")
        .add_query_param("checkOut", "2025-07-04")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get("/api/public/pricing/quote")
        .add_query_param("apartmentId", 999)
        .add_query_param("checkIn", "2025-07-01")
        .add_query_param("checkOut", "2025-07-04")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .get("/api/public/pricing/quote")
        .add_query_param("checkIn", "jutro")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fields = &response.json::<Value>()["data"]["fieldErrors"];
    assert!(fields["apartmentId"].is_array());
    assert!(fields["checkIn"].is_array());
    assert!(fields["checkOut"].is_array());

    Ok(())
}

#[tokio::test]
async fn test_quote_without_pricing_row_is_400() -> Result<()> {
    let app = spawn_app().await?;
    let apartment: Value = app
        .admin_post("/api/admin/apartments")
        .json(&json!({ "name": "Bez cen", "description": "Test", "amenities": [] }))
        .await
        .json();
    let id = apartment["id"].as_i64().expect("id");

    let response = app
        .server
        .get("/api/public/pricing/quote")
        .add_query_param("apartmentId", id)
        .add_query_param("checkIn", "2025-03-01")
        .add_query_param("checkOut", "2025-03-02")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        format!("No pricing configured for apartment {} in low season", id)
    );

    Ok(())
}

#[tokio::test]
async fn test_admin_pricing_rows() -> Result<()> {
    let app = spawn_app().await?;
    let id = priced_apartment(&app).await?;

    let rows: Vec<Value> = app.admin_get("/api/admin/pricing").await.json();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["apartment"]["id"], id);
    assert_eq!(rows[0]["apartment"]["slug"], "czapla-siwa");

    let duplicate = app
        .admin_post("/api/admin/pricing")
        .json(&json!({
            "apartmentId": id,
            "seasonType": "high",
            "pricePerNight": 1.0,
            "extraBedPrice": 0.0,
            "minStayNights": 1
        }))
        .expect_failure()
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);

    let row_id = rows[0]["id"].as_i64().expect("id");
    let updated: Value = app
        .admin_put(&format!("/api/admin/pricing/{}", row_id))
        .json(&json!({ "pricePerNight": 420.0, "extraBedPrice": 90.0, "minStayNights": 3 }))
        .await
        .json();
    assert_eq!(updated["pricePerNight"], 420.0);
    assert_eq!(updated["minStayNights"], 3);

    let invalid = app
        .admin_put(&format!("/api/admin/pricing/{}", row_id))
        .json(&json!({ "pricePerNight": 0.0, "extraBedPrice": -1.0, "minStayNights": 0 }))
        .expect_failure()
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

    let overview: Value = app.server.get("/api/public/pricing").await.json();
    assert_eq!(overview["apartments"][0]["pricing"]["low"]["pricePerNight"], 300.0);
    assert_eq!(overview["seasons"][0]["label"], "Lipiec");

    let response = app
        .admin_delete(&format!("/api/admin/pricing/{}", row_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}
