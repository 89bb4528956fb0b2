use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    car::{self, Entity as CarEntity},
    car_location::{self, Entity as CarLocationEntity},
    location::{self, Entity as LocationEntity},
};
use crate::middleware::logging::{to_response, ApiError};

pub fn location_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/location", get(get_locations))
        .route("/location/:slug", get(get_location))
        .layer(Extension(db))
}

async fn get_locations(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::TransactionCreationFailed),
            );
        }
    };

    match LocationEntity::find().all(&txn).await {
        Ok(locations) => to_response((StatusCode::OK, Json(locations)), Ok(())),
        Err(err) => to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            ),
            Err(ApiError::DbError(err.to_string())),
        ),
    }
}

/// Location landing page payload: the location row plus the cars offered
/// there via the junction table.
async fn get_location(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::TransactionCreationFailed),
            );
        }
    };

    let found = match LocationEntity::find()
        .filter(location::Column::Slug.eq(&*slug))
        .one(&txn)
        .await
    {
        Ok(Some(found)) => found,
        Ok(None) => {
            let tmp = format!("No location with slug '{slug}' was found.");
            return to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": tmp
                    })),
                ),
                Err(ApiError::General(tmp)),
            );
        }
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error."
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    let car_ids: Vec<i32> = match CarLocationEntity::find()
        .filter(car_location::Column::LocationId.eq(found.id))
        .all(&txn)
        .await
    {
        Ok(rows) => rows.into_iter().map(|row| row.car_id).collect(),
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error."
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    let cars = match CarEntity::find()
        .filter(car::Column::Id.is_in(car_ids))
        .all(&txn)
        .await
    {
        Ok(cars) => cars,
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error."
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    to_response(
        (StatusCode::OK, Json(LocationDetailResponse { location: found, cars })),
        Ok(()),
    )
}

#[derive(Serialize)]
struct LocationDetailResponse {
    #[serde(flatten)]
    location: location::Model,
    cars: Vec<car::Model>,
}
