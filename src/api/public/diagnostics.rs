use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::entities::{
    blog::Entity as BlogEntity,
    brand::Entity as BrandEntity,
    car::Entity as CarEntity,
    car_location::Entity as CarLocationEntity,
    contact_message::Entity as ContactMessageEntity,
    location::Entity as LocationEntity,
    property::Entity as PropertyEntity,
    testimonial::Entity as TestimonialEntity,
};
use crate::middleware::logging::{to_response, ApiError};

/// Manual troubleshooting endpoint, not a public API contract: connection
/// status, per-table row counts, a one-row sample and env-var presence.
pub fn diagnostics_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/test-db", get(test_db))
        .layer(Extension(db))
}

async fn test_db(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let mut tables = serde_json::Map::new();
    let mut connected = true;

    macro_rules! count_table {
        ($name:literal, $entity:ty) => {
            match <$entity>::find().count(db.as_ref()).await {
                Ok(rows) => {
                    tables.insert($name.to_string(), json!({ "exists": true, "rows": rows }));
                }
                Err(err) => {
                    connected = false;
                    tables.insert(
                        $name.to_string(),
                        json!({ "exists": false, "error": err.to_string() }),
                    );
                }
            }
        };
    }

    count_table!("cars", CarEntity);
    count_table!("brands", BrandEntity);
    count_table!("blogs", BlogEntity);
    count_table!("locations", LocationEntity);
    count_table!("properties", PropertyEntity);
    count_table!("testimonials", TestimonialEntity);
    count_table!("contact_messages", ContactMessageEntity);
    count_table!("car_locations", CarLocationEntity);

    let sample_car: Value = match CarEntity::find().one(db.as_ref()).await {
        Ok(Some(car)) => json!(car),
        _ => Value::Null,
    };
    let sample_brand: Value = match BrandEntity::find().one(db.as_ref()).await {
        Ok(Some(brand)) => json!(brand),
        _ => Value::Null,
    };

    // presence only; absence falls back to an empty string at use sites
    let env_presence = json!({
        "DATABASE_URL": !std::env::var("DATABASE_URL").unwrap_or_default().is_empty(),
        "BASE_URL": !std::env::var("BASE_URL").unwrap_or_default().is_empty(),
        "UPLOADS_DIR": !std::env::var("UPLOADS_DIR").unwrap_or_default().is_empty(),
        "WHATSAPP_NUMBER": !std::env::var("WHATSAPP_NUMBER").unwrap_or_default().is_empty(),
    });

    to_response(
        (
            StatusCode::OK,
            Json(json!({
                "connected": connected,
                "tables": tables,
                "sample": { "car": sample_car, "brand": sample_brand },
                "env": env_presence,
            })),
        ),
        if connected {
            Ok(())
        } else {
            Err(ApiError::General("Database diagnostics failed".to_string()))
        },
    )
}
