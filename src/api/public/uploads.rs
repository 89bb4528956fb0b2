use axum::{
    extract::Path,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::middleware::logging::{to_response, ApiError};
use crate::storage::{open_object, uploads_dir, Bucket};

/// Streams stored images back under the same `/uploads/<bucket>/<key>`
/// paths the admin upload handlers hand out as public URLs.
pub fn uploads_router() -> Router {
    Router::new().route("/:bucket/:key", get(print_image))
}

pub async fn print_image(Path((bucket, key)): Path<(String, String)>) -> Response {
    let bucket = match Bucket::from_dir(&bucket) {
        Some(bucket) => bucket,
        None => {
            let tmp = format!("Unknown bucket '{bucket}'");
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
    };

    let (file, path) = match open_object(&uploads_dir(), bucket, &key).await {
        Ok(opened) => opened,
        Err(err) => {
            return to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "Not found"
                    })),
                ),
                Err(ApiError::StorageError(err.to_string())),
            );
        }
    };

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    to_response((headers, body), Ok(()))
}
