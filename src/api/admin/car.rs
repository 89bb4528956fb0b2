use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::api::admin::common::{
    db_failed, not_found, read_image_upload, required, txn_failed, validation_failed,
};
use crate::entities::{
    brand::Entity as BrandEntity,
    car::{self, Entity as CarEntity, FuelType, Transmission},
    car_location::{self, Entity as CarLocationEntity},
    StringList,
};
use crate::middleware::logging::{to_response, ApiError};
use crate::notify::NotificationQueue;
use crate::slug::slugify;
use crate::storage::{delete_object, resolve_image, save_object, uploads_dir, Bucket, ResolvedImage};

//ROUTERS
pub fn admin_car_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/car", get(list_cars).post(create_car))
        .route(
            "/car/:id",
            get(admin_get_car).patch(patch_car).delete(delete_car),
        )
        .route("/car/:id/image", post(upload_car_image))
        .layer(Extension(db))
}

//ROUTES
async fn list_cars(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match CarEntity::find().all(db.as_ref()).await {
        Ok(cars) => to_response((StatusCode::OK, Json(cars)), Ok(())),
        Err(err) => db_failed(err),
    }
}

async fn admin_get_car(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match CarEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(car)) => to_response((StatusCode::OK, Json(car)), Ok(())),
        Ok(None) => not_found(format!("No car with {id} id was found.")),
        Err(err) => db_failed(err),
    }
}

async fn create_car(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<CreateCar>,
) -> Response {
    // required fields are rejected before any database work
    let name = match required(&payload.name) {
        Some(name) => name.to_string(),
        None => return validation_failed(&notify, "Car name is required."),
    };
    let brand_id = match payload.brand_id {
        Some(brand_id) => brand_id,
        None => return validation_failed(&notify, "Brand is required."),
    };
    let price_per_day = payload.price_per_day.unwrap_or(0.0);
    if price_per_day < 0.0 {
        return validation_failed(&notify, "Price per day cannot be negative.");
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    match BrandEntity::find_by_id(brand_id).one(&txn).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("Brand with id {brand_id} not found"));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    }

    let new_car = car::ActiveModel {
        slug: Set(slugify(&name)),
        name: Set(name),
        brand_id: Set(brand_id),
        price_per_day: Set(price_per_day),
        transmission: Set(payload.transmission.unwrap_or(Transmission::Manual)),
        fuel_type: Set(payload.fuel_type.unwrap_or(FuelType::Petrol)),
        seats: Set(payload.seats.unwrap_or(5)),
        luggage: Set(payload.luggage.unwrap_or(2)),
        mileage: Set(payload.mileage),
        description: Set(payload.description.unwrap_or_default()),
        features: Set(StringList::deduped(payload.features.unwrap_or_default())),
        main_image: Set(payload.main_image),
        ..Default::default()
    };

    let inserted_id = match CarEntity::insert(new_car).exec(&txn).await {
        Ok(res) => res.last_insert_id,
        Err(err) => {
            let _ = txn.rollback().await;
            notify.error("Failed to create car.");
            return db_failed(err);
        }
    };

    if let Some(location_ids) = &payload.location_ids {
        if let Err(err) = rewrite_locations(&txn, inserted_id, location_ids).await {
            let _ = txn.rollback().await;
            notify.error("Failed to link car locations.");
            return db_failed(err);
        }
    }

    // re-fetch the saved row so the caller gets exactly what was stored
    let saved = match CarEntity::find_by_id(inserted_id).one(&txn).await {
        Ok(Some(saved)) => saved,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No car with {inserted_id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    match txn.commit().await {
        Ok(_) => {
            notify.success(format!("Car '{}' created.", saved.name));
            to_response((StatusCode::CREATED, Json(saved)), Ok(()))
        }
        Err(err) => db_failed(err),
    }
}

async fn patch_car(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<PatchCar>,
) -> Response {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return validation_failed(&notify, "Car name is required.");
        }
    }
    if let Some(price) = payload.price_per_day {
        if price < 0.0 {
            return validation_failed(&notify, "Price per day cannot be negative.");
        }
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let existing = match CarEntity::find_by_id(id).one(&txn).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No car with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let mut car: car::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        // the slug always tracks the current name, whatever the client sent
        car.slug = Set(slugify(name.trim()));
        car.name = Set(name.trim().to_string());
    }

    if let Some(brand_id) = payload.brand_id {
        match BrandEntity::find_by_id(brand_id).one(&txn).await {
            Ok(Some(_)) => car.brand_id = Set(brand_id),
            Ok(None) => {
                let _ = txn.rollback().await;
                return not_found(format!("Brand with id {brand_id} not found"));
            }
            Err(err) => {
                let _ = txn.rollback().await;
                return db_failed(err);
            }
        }
    }

    if let Some(price_per_day) = payload.price_per_day {
        car.price_per_day = Set(price_per_day);
    }
    if let Some(transmission) = payload.transmission {
        car.transmission = Set(transmission);
    }
    if let Some(fuel_type) = payload.fuel_type {
        car.fuel_type = Set(fuel_type);
    }
    if let Some(seats) = payload.seats {
        car.seats = Set(seats);
    }
    if let Some(luggage) = payload.luggage {
        car.luggage = Set(luggage);
    }
    if let Some(mileage) = payload.mileage {
        car.mileage = Set(Some(mileage));
    }
    if let Some(description) = payload.description {
        car.description = Set(description);
    }
    if let Some(features) = payload.features {
        car.features = Set(StringList::deduped(features));
    }

    let updated = match car.update(&txn).await {
        Ok(updated) => updated,
        Err(err) => {
            let _ = txn.rollback().await;
            notify.error("Failed to update car.");
            return db_failed(err);
        }
    };

    if let Some(location_ids) = &payload.location_ids {
        if let Err(err) = rewrite_locations(&txn, updated.id, location_ids).await {
            let _ = txn.rollback().await;
            notify.error("Failed to link car locations.");
            return db_failed(err);
        }
    }

    match txn.commit().await {
        Ok(_) => {
            notify.success(format!("Car '{}' updated.", updated.name));
            to_response((StatusCode::OK, Json(updated)), Ok(()))
        }
        Err(err) => db_failed(err),
    }
}

async fn delete_car(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let car = match CarEntity::find_by_id(id).one(&txn).await {
        Ok(Some(car)) => car,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No car with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let image = car.main_image.clone();
    let name = car.name.clone();

    if let Err(err) = CarLocationEntity::delete_many()
        .filter(car_location::Column::CarId.eq(id))
        .exec(&txn)
        .await
    {
        let _ = txn.rollback().await;
        return db_failed(err);
    }

    let car: car::ActiveModel = car.into();
    if let Err(err) = car.delete(&txn).await {
        let _ = txn.rollback().await;
        notify.error("Failed to delete car.");
        return db_failed(err);
    }

    if let Err(err) = txn.commit().await {
        return db_failed(err);
    }

    // at-most-effort cleanup; a missing object never blocks the row delete
    if let Some(url) = image {
        if let Err(err) = delete_object(&uploads_dir(), Bucket::CarImages, &url).await {
            warn!(error = %err, url = %url, "failed to delete stored car image");
        }
    }

    notify.success(format!("Car '{name}' deleted."));
    to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Resource deleted successfully."
            })),
        ),
        Ok(()),
    )
}

/// Replaces the car's main image. A failed write falls back to the previous
/// URL when one exists; without one the save is aborted.
async fn upload_car_image(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    mut multipart: Multipart,
) -> Response {
    let car = match CarEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(car)) => car,
        Ok(None) => return not_found(format!("No car with {id} id was found.")),
        Err(err) => return db_failed(err),
    };

    let (key, data) = match read_image_upload(&mut multipart, Bucket::CarImages).await {
        Ok(upload) => upload,
        Err(err) => return validation_failed(&notify, &err.to_string()),
    };

    let upload_result = save_object(&uploads_dir(), Bucket::CarImages, &key, &data).await;
    let resolved = match resolve_image(Some(upload_result), car.main_image.clone()) {
        Ok(resolved) => resolved,
        Err(err) => {
            notify.error("Image upload failed.");
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to upload file to the server"
                    })),
                ),
                Err(ApiError::StorageError(err.to_string())),
            );
        }
    };

    let image = match resolved {
        ResolvedImage::Keep(image) => image,
        ResolvedImage::FallBack(previous) => {
            warn!(car_id = id, "image upload failed, previous image kept");
            Some(previous)
        }
    };

    let mut active: car::ActiveModel = car.into();
    active.main_image = Set(image);

    match active.update(db.as_ref()).await {
        Ok(updated) => {
            notify.success(format!("Image for '{}' saved.", updated.name));
            to_response((StatusCode::OK, Json(updated)), Ok(()))
        }
        Err(err) => {
            notify.error("Failed to save car image.");
            db_failed(err)
        }
    }
}

async fn rewrite_locations(
    txn: &DatabaseTransaction,
    car_id: i32,
    location_ids: &[i32],
) -> Result<(), DbErr> {
    CarLocationEntity::delete_many()
        .filter(car_location::Column::CarId.eq(car_id))
        .exec(txn)
        .await?;

    for location_id in location_ids {
        let link = car_location::ActiveModel {
            car_id: Set(car_id),
            location_id: Set(*location_id),
        };
        CarLocationEntity::insert(link).exec(txn).await?;
    }

    Ok(())
}

//Structs
#[derive(Deserialize, Clone, Debug)]
struct CreateCar {
    name: Option<String>,
    brand_id: Option<i32>,
    price_per_day: Option<f32>,
    transmission: Option<Transmission>,
    fuel_type: Option<FuelType>,
    seats: Option<i32>,
    luggage: Option<i32>,
    mileage: Option<f32>,
    description: Option<String>,
    features: Option<Vec<String>>,
    main_image: Option<String>,
    location_ids: Option<Vec<i32>>,
}

#[derive(Deserialize, Clone, Debug)]
struct PatchCar {
    name: Option<String>,
    brand_id: Option<i32>,
    price_per_day: Option<f32>,
    transmission: Option<Transmission>,
    fuel_type: Option<FuelType>,
    seats: Option<i32>,
    luggage: Option<i32>,
    mileage: Option<f32>,
    description: Option<String>,
    features: Option<Vec<String>>,
    location_ids: Option<Vec<i32>>,
}
