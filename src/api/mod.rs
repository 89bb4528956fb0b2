pub mod admin;
pub mod public;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::logging::logging_middleware;
use crate::notify::NotificationQueue;

use admin::admin_api_router;
use public::public_api_router;
use public::uploads::uploads_router;

pub fn create_api_router(
    db: Arc<DatabaseConnection>,
    notify: Arc<NotificationQueue>,
) -> Router {
    Router::new()
        .nest("/api", public_api_router(db.clone()))
        .nest("/api/admin", admin_api_router(db.clone(), notify))
        .nest("/uploads", uploads_router())
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
