pub mod blog;
pub mod car;
pub mod common;
pub mod location;
pub mod notifications;

use axum::{extract::Extension, middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use blog::admin_blog_router;
use car::admin_car_router;
use location::admin_location_router;
use notifications::admin_notifications_router;

use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};
use crate::notify::NotificationQueue;

pub fn admin_api_router(
    db: Arc<DatabaseConnection>,
    notify: Arc<NotificationQueue>,
) -> Router {
    let admin_car_router = admin_car_router(db.clone());
    let admin_blog_router = admin_blog_router(db.clone());
    let admin_location_router = admin_location_router(db.clone());
    let admin_notifications_router = admin_notifications_router();

    Router::new()
        .merge(admin_car_router)
        .merge(admin_blog_router)
        .merge(admin_location_router)
        .merge(admin_notifications_router)
        .layer(Extension(notify))
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Role::Admin,
            },
            auth_middleware,
        ))
}
