use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::middleware::logging::to_response;
use crate::notify::NotificationQueue;

/// Read side of the notification queue: the admin shell polls this and
/// renders whatever is still live as toasts.
pub fn admin_notifications_router() -> Router {
    Router::new().route("/notifications", get(get_notifications))
}

async fn get_notifications(Extension(notify): Extension<Arc<NotificationQueue>>) -> Response {
    to_response((StatusCode::OK, Json(notify.active())), Ok(()))
}
