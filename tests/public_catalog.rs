mod common;

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::json;

use common::{login_as_admin, send, test_app};
use rentora::entities::{brand, car, property, StringList};

async fn seed_brand(db: &DatabaseConnection, name: &str) -> i32 {
    brand::ActiveModel {
        name: Set(name.to_string()),
        logo: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed brand")
    .id
}

async fn seed_car(
    db: &DatabaseConnection,
    name: &str,
    brand_id: i32,
    fuel: car::FuelType,
    transmission: car::Transmission,
    price: f32,
) -> car::Model {
    car::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(rentora::slug::slugify(name)),
        brand_id: Set(brand_id),
        price_per_day: Set(price),
        transmission: Set(transmission),
        fuel_type: Set(fuel),
        seats: Set(5),
        luggage: Set(2),
        mileage: Set(None),
        description: Set(String::new()),
        features: Set(StringList::default()),
        main_image: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed car")
}

async fn seed_fleet(db: &DatabaseConnection) {
    let hyundai = seed_brand(db, "Hyundai").await;
    let tata = seed_brand(db, "Tata").await;
    seed_car(db, "Hyundai i20", hyundai, car::FuelType::Petrol, car::Transmission::Manual, 1500.0).await;
    seed_car(db, "Hyundai Verna", hyundai, car::FuelType::Diesel, car::Transmission::Automatic, 2500.0).await;
    seed_car(db, "Tata Harrier", tata, car::FuelType::Diesel, car::Transmission::Manual, 2000.0).await;
    seed_car(db, "Tata Nexon EV", tata, car::FuelType::Electric, car::Transmission::Automatic, 3500.0).await;
}

#[tokio::test]
async fn fuel_filter_returns_exact_subset() {
    let (app, db) = test_app().await;
    seed_fleet(db.as_ref()).await;

    let (status, body) = send(&app, "GET", "/api/car?fuel=Diesel", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hyundai Verna", "Tata Harrier"]);
}

#[tokio::test]
async fn all_sentinel_matches_everything() {
    let (app, db) = test_app().await;
    seed_fleet(db.as_ref()).await;

    let (_, body) = send(&app, "GET", "/api/car?fuel=All&brand=All", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn price_bounds_are_inclusive_and_combine_with_brand() {
    let (app, db) = test_app().await;
    seed_fleet(db.as_ref()).await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/car?min_price=2000&max_price=2500&brand=tata",
        None,
        None,
    )
    .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Tata Harrier"]);
}

#[tokio::test]
async fn unparseable_price_bound_excludes_all_rows() {
    let (app, db) = test_app().await;
    seed_fleet(db.as_ref()).await;

    let (status, body) = send(&app, "GET", "/api/car?min_price=cheap", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn brands_are_deduplicated_case_insensitively() {
    let (app, db) = test_app().await;
    seed_brand(db.as_ref(), "Hyundai").await;
    seed_brand(db.as_ref(), "HYUNDAI ").await; // unique index sees different bytes
    seed_brand(db.as_ref(), "Tata").await;

    let (_, body) = send(&app, "GET", "/api/brand", None, None).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    // trailing-space variant survives, true case duplicate would not
    assert_eq!(names, ["Hyundai", "HYUNDAI ", "Tata"]);
}

#[tokio::test]
async fn property_filters_apply_listing_type_and_price() {
    let (app, db) = test_app().await;

    for (title, listing, price) in [
        ("2 BHK Andheri", property::ListingType::Rent, 45_000.0_f32),
        ("3 BHK Powai", property::ListingType::Sale, 25_000_000.0),
        ("1 BHK Dadar", property::ListingType::Rent, 30_000.0),
    ] {
        property::ActiveModel {
            title: Set(title.to_string()),
            slug: Set(rentora::slug::slugify(title)),
            price: Set(price),
            listing_type: Set(listing),
            property_type: Set("Apartment".to_string()),
            bedrooms: Set(2),
            bathrooms: Set(2),
            area_sqft: Set(850),
            location: Set("Mumbai".to_string()),
            description: Set(String::new()),
            features: Set(StringList::default()),
            images: Set(StringList::default()),
            is_featured: Set(false),
            is_premium: Set(false),
            availability_status: Set(property::AvailabilityStatus::Available),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .expect("Failed to seed property");
    }

    let (_, body) = send(
        &app,
        "GET",
        "/api/property?listing_type=rent&max_price=40000",
        None,
        None,
    )
    .await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["1 BHK Dadar"]);
}

#[tokio::test]
async fn quote_floors_same_day_rental_at_minimum_days() {
    let (app, db) = test_app().await;
    let brand_id = seed_brand(db.as_ref(), "Hyundai").await;
    seed_car(db.as_ref(), "Hyundai i20", brand_id, car::FuelType::Petrol, car::Transmission::Manual, 1500.0).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/booking/quote?car=hyundai-i20&start=2026-09-01&end=2026-09-01",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["quote"]["total_days"], 2);
    assert_eq!(body["quote"]["rental_cost"], 3000.0);
    assert_eq!(body["quote"]["deposit"], 5000.0);
    assert_eq!(body["quote"]["grand_total"], 8000.0);
    assert!(body["whatsapp_url"].as_str().unwrap().starts_with("https://wa.me/"));
    assert!(body["tel_url"].as_str().unwrap().starts_with("tel:"));
}

#[tokio::test]
async fn quote_clamps_end_before_start() {
    let (app, db) = test_app().await;
    let brand_id = seed_brand(db.as_ref(), "Hyundai").await;
    seed_car(db.as_ref(), "Hyundai Verna", brand_id, car::FuelType::Diesel, car::Transmission::Automatic, 2500.0).await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/booking/quote?car=hyundai-verna&start=2026-09-10&end=2026-09-05",
        None,
        None,
    )
    .await;
    assert_eq!(body["end"], "2026-09-11"); // start + (minimum - 1)
    assert_eq!(body["quote"]["total_days"], 2);
}

#[tokio::test]
async fn quote_for_unknown_car_is_not_found() {
    let (app, _db) = test_app().await;
    let (status, _) = send(&app, "GET", "/api/booking/quote?car=nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_form_requires_name_phone_and_message() {
    let (app, _db) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/contact",
        None,
        Some(json!({ "name": "", "phone": "12", "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/contact",
        None,
        Some(json!({
            "name": "Asha",
            "phone": "9876543210",
            "message": "Looking for a weekend rental."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["whatsapp_url"].as_str().unwrap().contains("Asha"));
}

#[tokio::test]
async fn diagnostics_reports_tables_and_counts() {
    let (app, db) = test_app().await;
    seed_fleet(db.as_ref()).await;

    let (status, body) = send(&app, "GET", "/api/test-db", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["tables"]["cars"]["rows"], 4);
    assert_eq!(body["tables"]["brands"]["rows"], 2);
    assert_eq!(body["sample"]["car"]["name"], "Hyundai i20");
}

#[tokio::test]
async fn car_detail_includes_brand_and_locations() {
    let (app, db) = test_app().await;
    let token = login_as_admin(&app).await;
    let brand_id = seed_brand(db.as_ref(), "Hyundai").await;

    let (_, location) = send(
        &app,
        "POST",
        "/api/admin/location",
        Some(&token),
        Some(json!({ "name": "Andheri" })),
    )
    .await;
    let location_id = location["id"].as_i64().unwrap();

    let (_, created) = send(
        &app,
        "POST",
        "/api/admin/car",
        Some(&token),
        Some(json!({
            "name": "Hyundai Aura",
            "brand_id": brand_id,
            "location_ids": [location_id]
        })),
    )
    .await;

    let slug = created["slug"].as_str().unwrap();
    let (status, detail) = send(&app, "GET", &format!("/api/car/{slug}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["brand"], "Hyundai");
    assert_eq!(detail["locations"][0]["slug"], "andheri");

    // the junction also powers the location landing page
    let (_, landing) = send(&app, "GET", "/api/location/andheri", None, None).await;
    assert_eq!(landing["cars"][0]["name"], "Hyundai Aura");
}
