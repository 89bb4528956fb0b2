pub mod auth;
pub mod blog;
pub mod booking;
pub mod brand;
pub mod car;
pub mod contact;
pub mod diagnostics;
pub mod location;
pub mod property;
pub mod testimonial;
pub mod uploads;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use auth::auth_router;
use blog::blog_router;
use booking::booking_router;
use brand::brand_router;
use car::car_router;
use contact::contact_router;
use diagnostics::diagnostics_router;
use location::location_router;
use property::property_router;
use testimonial::testimonial_router;

pub fn public_api_router(db: Arc<DatabaseConnection>) -> Router {
    let auth_router = auth_router(db.clone());
    let car_router = car_router(db.clone());
    let brand_router = brand_router(db.clone());
    let property_router = property_router(db.clone());
    let blog_router = blog_router(db.clone());
    let location_router = location_router(db.clone());
    let testimonial_router = testimonial_router(db.clone());
    let contact_router = contact_router(db.clone());
    let booking_router = booking_router(db.clone());
    let diagnostics_router = diagnostics_router(db.clone());

    Router::new()
        .merge(auth_router)
        .merge(car_router)
        .merge(brand_router)
        .merge(property_router)
        .merge(blog_router)
        .merge(location_router)
        .merge(testimonial_router)
        .merge(contact_router)
        .merge(booking_router)
        .merge(diagnostics_router)
}
