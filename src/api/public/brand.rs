use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::entities::brand::{self, Entity as BrandEntity};
use crate::middleware::logging::{to_response, ApiError};

pub fn brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/brand", get(get_brands))
        .layer(Extension(db))
}

/// Brand list de-duplicated by case-insensitive name, first row wins.
async fn get_brands(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
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

    match BrandEntity::find().all(&txn).await {
        Ok(brands) => {
            let mut seen: Vec<String> = Vec::new();
            let deduped: Vec<brand::Model> = brands
                .into_iter()
                .filter(|b| {
                    let folded = b.name.to_lowercase();
                    if seen.contains(&folded) {
                        false
                    } else {
                        seen.push(folded);
                        true
                    }
                })
                .collect();
            to_response((StatusCode::OK, Json(deduped)), Ok(()))
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
