use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::public::contact::{contact_phone, whatsapp_number};
use crate::booking::{enquiry_text, quote, tel_link, whatsapp_link, BookingWindow};
use crate::entities::car::{self, Entity as CarEntity};
use crate::middleware::logging::{to_response, ApiError};

/// Every rental is at least this long; shorter selections are floored.
pub const MINIMUM_RENTAL_DAYS: i64 = 2;

pub fn booking_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/booking/quote", get(get_quote))
        .layer(Extension(db))
}

/// Price quote for a car and date range. Purely presentational: the result
/// is a breakdown plus prefilled tel/WhatsApp links, nothing is reserved.
async fn get_quote(
    Query(params): Query<QuoteQuery>,
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
        .filter(car::Column::Slug.eq(&*params.car))
        .one(&txn)
        .await
    {
        Ok(Some(car)) => car,
        Ok(None) => {
            let tmp = format!("No car with slug '{}' was found.", params.car);
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

    let today = Utc::now().date_naive();
    let mut window = BookingWindow::new(params.start.unwrap_or(today), MINIMUM_RENTAL_DAYS);
    if let Some(end) = params.end {
        window.set_end(end);
    }

    let quote = quote(&window, car.price_per_day);
    let text = enquiry_text(&car.name, &window, &quote);

    to_response(
        (
            StatusCode::OK,
            Json(json!({
                "car": car.slug,
                "start": window.start(),
                "end": window.end(),
                "quote": quote,
                "whatsapp_url": whatsapp_link(&whatsapp_number(), &text),
                "tel_url": tel_link(&contact_phone()),
            })),
        ),
        Ok(()),
    )
}

#[derive(Deserialize)]
struct QuoteQuery {
    car: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}
