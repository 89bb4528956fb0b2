use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::entities::testimonial::{self, Entity as TestimonialEntity};
use crate::middleware::logging::{to_response, ApiError};

pub fn testimonial_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/testimonial", get(get_testimonials))
        .layer(Extension(db))
}

async fn get_testimonials(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
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

    match TestimonialEntity::find()
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(&txn)
        .await
    {
        Ok(testimonials) => to_response((StatusCode::OK, Json(testimonials)), Ok(())),
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
