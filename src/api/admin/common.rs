//! Pieces shared by every admin panel: response shorthands, required-field
//! validation and the multipart image intake. The per-entity handlers stay
//! thin instantiations of the same workflow instead of three copies of it.

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::Response,
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

use crate::middleware::logging::{to_response, ApiError};
use crate::notify::NotificationQueue;
use crate::storage::{allowed_content_types, object_key, Bucket};

pub fn txn_failed() -> Response {
    to_response(
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
        Err(ApiError::TransactionCreationFailed),
    )
}

pub fn db_failed(err: DbErr) -> Response {
    to_response(
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        ),
        Err(ApiError::DbError(err.to_string())),
    )
}

pub fn not_found(message: String) -> Response {
    to_response(
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": message
            })),
        ),
        Err(ApiError::General(message.clone())),
    )
}

/// Required-field failure: rejected before any database work, surfaced as an
/// error notice the way the old panels raised a toast.
pub fn validation_failed(notify: &NotificationQueue, message: &str) -> Response {
    notify.error(message);
    to_response(
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": message
            })),
        ),
        Err(ApiError::ValidationFail(message.to_string())),
    )
}

pub fn conflict(notify: &NotificationQueue, message: &str) -> Response {
    notify.error(message);
    to_response(
        (
            StatusCode::CONFLICT,
            Json(json!({
                "error": message
            })),
        ),
        Err(ApiError::General(message.to_string())),
    )
}

/// Non-empty after trimming, or `None`.
pub fn required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        None => None,
    }
}

#[derive(Error, Debug)]
pub enum UploadIntakeError {
    #[error("No file field in the request")]
    NoField,
    #[error("Content type is not set")]
    NoContentType,
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),
    #[error("Failed to read file bytes: {0}")]
    Read(String),
}

/// Pulls the first multipart field, validates MIME type and size against the
/// bucket's policy and returns the timestamped storage key plus the bytes.
pub async fn read_image_upload(
    multipart: &mut Multipart,
    bucket: Bucket,
) -> Result<(String, Vec<u8>), UploadIntakeError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|err| UploadIntakeError::Read(err.to_string()))?
        .ok_or(UploadIntakeError::NoField)?;

    let content_type = field
        .content_type()
        .map(|ct| ct.to_owned())
        .ok_or(UploadIntakeError::NoContentType)?;

    let extension = allowed_content_types()
        .get(content_type.as_str())
        .copied()
        .ok_or_else(|| UploadIntakeError::UnsupportedContentType(content_type.clone()))?;

    let file_name = field
        .file_name()
        .map(|name| name.to_owned())
        .or_else(|| field.name().map(|name| name.to_owned()))
        .unwrap_or_else(|| "image".to_string());

    let data = field
        .bytes()
        .await
        .map_err(|err| UploadIntakeError::Read(err.to_string()))?;

    if data.len() > bucket.size_limit() {
        return Err(UploadIntakeError::TooLarge(bucket.size_limit()));
    }

    Ok((object_key(&file_name, extension), data.to_vec()))
}
