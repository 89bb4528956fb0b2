mod common;

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use common::{login_as_admin, send, test_app};
use rentora::entities::location;

#[tokio::test]
async fn create_slugifies_name_by_default() {
    let (app, _db) = test_app().await;
    let token = login_as_admin(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "Bandra West", "content": "Pickup point near the station." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["slug"], "bandra-west");
}

#[tokio::test]
async fn duplicate_slug_is_rejected_without_insert() {
    let (app, db) = test_app().await;
    let token = login_as_admin(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "Andheri" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "Andheri" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A location with this slug already exists.");

    let rows = location::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn editing_a_location_keeping_its_own_slug_succeeds() {
    let (app, _db) = test_app().await;
    let token = login_as_admin(&app).await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "Powai", "headline": "Lakeside" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/admin/location/{id}"),
        Some(&token),
        Some(json!({ "slug": "powai", "headline": "Lakeside pickups" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["slug"], "powai");
    assert_eq!(updated["headline"], "Lakeside pickups");
}

#[tokio::test]
async fn editing_onto_another_locations_slug_is_rejected() {
    let (app, _db) = test_app().await;
    let token = login_as_admin(&app).await;

    for name in ["Juhu", "Versova"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/location",
            Some(&token),
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = send(&app, "GET", "/api/admin/location", Some(&token), None).await;
    let second_id = list[1]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/admin/location/{second_id}"),
        Some(&token),
        Some(json!({ "slug": "juhu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_name_is_rejected_before_any_write() {
    let (app, db) = test_app().await;
    let token = login_as_admin(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Location name is required.");

    let rows = location::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(rows, 0);
}
