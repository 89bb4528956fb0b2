use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::booking::{tel_link, whatsapp_link};
use crate::entities::contact_message;
use crate::middleware::logging::{to_response, ApiError};

pub fn contact_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/contact", post(create_contact_message))
        .layer(Extension(db))
}

/// Stores the lead and hands back the tel/WhatsApp deep links the site
/// renders as the "contact us" buttons.
async fn create_contact_message(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateContactMessage>,
) -> Response {
    if let Some(err) = payload.validate().err() {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Name, phone and message are required."
                })),
            ),
            Err(ApiError::ValidationFail(err.to_string())),
        );
    }

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

    let new_message = contact_message::ActiveModel {
        name: Set(payload.name.clone()),
        phone: Set(payload.phone.clone()),
        email: Set(payload.email.clone()),
        message: Set(payload.message.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_message.insert(&txn).await {
        Ok(saved) => match txn.commit().await {
            Ok(_) => {
                let text = format!("Hi, this is {}. {}", saved.name, saved.message);
                to_response(
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "message": "Message received. We will get back to you shortly.",
                            "whatsapp_url": whatsapp_link(&whatsapp_number(), &text),
                            "tel_url": tel_link(&contact_phone()),
                        })),
                    ),
                    Ok(()),
                )
            }
            Err(err) => to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            ),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to store your message"
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            )
        }
    }
}

#[derive(Deserialize, Validate, Clone, Debug)]
struct CreateContactMessage {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 7))]
    phone: String,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 1))]
    message: String,
}

pub fn whatsapp_number() -> String {
    dotenvy::dotenv().ok();
    std::env::var("WHATSAPP_NUMBER").unwrap_or_else(|_| "919876543210".to_string())
}

pub fn contact_phone() -> String {
    dotenvy::dotenv().ok();
    std::env::var("CONTACT_PHONE").unwrap_or_else(|_| "+919876543210".to_string())
}
