use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::catalog::filter::{filter_properties, PropertyListQuery};
use crate::entities::property::{self, Entity as PropertyEntity};
use crate::middleware::logging::{to_response, ApiError};

pub fn property_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/property", get(get_properties))
        .route("/property/:slug", get(get_property))
        .layer(Extension(db))
}

async fn get_properties(
    Query(params): Query<PropertyListQuery>,
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

    match PropertyEntity::find().all(&txn).await {
        Ok(properties) => to_response(
            (StatusCode::OK, Json(filter_properties(properties, &params))),
            Ok(()),
        ),
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

async fn get_property(
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

    match PropertyEntity::find()
        .filter(property::Column::Slug.eq(&*slug))
        .one(&txn)
        .await
    {
        Ok(Some(listing)) => to_response((StatusCode::OK, Json(listing)), Ok(())),
        Ok(None) => {
            let tmp = format!("No property with slug '{slug}' was found.");
            to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": tmp
                    })),
                ),
                Err(ApiError::General(tmp)),
            )
        }
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
