use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::filter::{filter_cars, CarCard, CarListQuery};
use crate::entities::{
    brand::Entity as BrandEntity,
    car::{self, Entity as CarEntity},
    car_location::{self, Entity as CarLocationEntity},
    location::{self, Entity as LocationEntity},
};
use crate::middleware::logging::{to_response, ApiError};

pub fn car_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/car", get(get_cars))
        .route("/car/:slug", get(get_car))
        .layer(Extension(db))
}

/// Full fleet fetch narrowed in memory, exactly like the browse grid:
/// equality keys, inclusive price bounds, `"All"` sentinel, no pagination.
async fn get_cars(
    Query(params): Query<CarListQuery>,
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

    let cars = match CarEntity::find().all(&txn).await {
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

    let brand_names: HashMap<i32, String> = match BrandEntity::find().all(&txn).await {
        Ok(brands) => brands.into_iter().map(|b| (b.id, b.name)).collect(),
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

    let cards: Vec<CarCard> = cars
        .into_iter()
        .map(|car| {
            let brand = brand_names.get(&car.brand_id).cloned().unwrap_or_default();
            CarCard { car, brand }
        })
        .collect();

    to_response((StatusCode::OK, Json(filter_cars(cards, &params))), Ok(()))
}

async fn get_car(
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

    let car = match CarEntity::find()
        .filter(car::Column::Slug.eq(&*slug))
        .one(&txn)
        .await
    {
        Ok(Some(car)) => car,
        Ok(None) => {
            let tmp = format!("No car with slug '{slug}' was found.");
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

    let brand = match BrandEntity::find_by_id(car.brand_id).one(&txn).await {
        Ok(Some(brand)) => brand.name,
        Ok(None) => String::new(),
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

    let location_ids: Vec<i32> = match CarLocationEntity::find()
        .filter(car_location::Column::CarId.eq(car.id))
        .all(&txn)
        .await
    {
        Ok(rows) => rows.into_iter().map(|row| row.location_id).collect(),
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

    let locations = match LocationEntity::find()
        .filter(location::Column::Id.is_in(location_ids))
        .all(&txn)
        .await
    {
        Ok(locations) => locations,
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
        (StatusCode::OK, Json(CarDetailResponse { car, brand, locations })),
        Ok(()),
    )
}

#[derive(Serialize)]
struct CarDetailResponse {
    #[serde(flatten)]
    car: car::Model,
    brand: String,
    locations: Vec<location::Model>,
}
