use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::admin::common::{
    conflict, db_failed, not_found, required, txn_failed, validation_failed,
};
use crate::entities::{
    car_location::{self, Entity as CarLocationEntity},
    location::{self, Entity as LocationEntity},
};
use crate::middleware::logging::to_response;
use crate::notify::NotificationQueue;
use crate::slug::slugify;

//ROUTERS
pub fn admin_location_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/location", get(list_locations).post(create_location))
        .route(
            "/location/:id",
            get(admin_get_location)
                .patch(patch_location)
                .delete(delete_location),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_locations(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match LocationEntity::find().all(db.as_ref()).await {
        Ok(locations) => to_response((StatusCode::OK, Json(locations)), Ok(())),
        Err(err) => db_failed(err),
    }
}

async fn admin_get_location(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match LocationEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(found)) => to_response((StatusCode::OK, Json(found)), Ok(())),
        Ok(None) => not_found(format!("No location with {id} id was found.")),
        Err(err) => db_failed(err),
    }
}

async fn create_location(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<CreateLocation>,
) -> Response {
    let name = match required(&payload.name) {
        Some(name) => name.to_string(),
        None => return validation_failed(&notify, "Location name is required."),
    };

    let slug = payload
        .slug
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    // pre-insert scan, so a duplicate never issues the insert; the unique
    // index backstops whatever slips through between scan and write
    match slug_taken(&txn, &slug, None).await {
        Ok(false) => {}
        Ok(true) => {
            let _ = txn.rollback().await;
            return conflict(&notify, "A location with this slug already exists.");
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    }

    let new_location = location::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        headline: Set(payload.headline),
        content: Set(payload.content.unwrap_or_default()),
        ..Default::default()
    };

    let inserted_id = match LocationEntity::insert(new_location).exec(&txn).await {
        Ok(res) => res.last_insert_id,
        Err(_) => {
            // unique index violation between the scan and the write
            let _ = txn.rollback().await;
            return conflict(&notify, "A location with this slug already exists.");
        }
    };

    let saved = match LocationEntity::find_by_id(inserted_id).one(&txn).await {
        Ok(Some(saved)) => saved,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No location with {inserted_id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    match txn.commit().await {
        Ok(_) => {
            notify.success(format!("Location '{}' created.", saved.name));
            to_response((StatusCode::CREATED, Json(saved)), Ok(()))
        }
        Err(err) => db_failed(err),
    }
}

async fn patch_location(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<PatchLocation>,
) -> Response {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return validation_failed(&notify, "Location name is required.");
        }
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let existing = match LocationEntity::find_by_id(id).one(&txn).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No location with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let new_slug = match (&payload.slug, &payload.name) {
        (Some(slug), _) => Some(slugify(slug)),
        (None, Some(name)) => Some(slugify(name.trim())),
        (None, None) => None,
    };

    if let Some(slug) = &new_slug {
        // keeping your own slug is fine; colliding with another row is not
        if slug != &existing.slug {
            match slug_taken(&txn, slug, Some(id)).await {
                Ok(false) => {}
                Ok(true) => {
                    let _ = txn.rollback().await;
                    return conflict(&notify, "A location with this slug already exists.");
                }
                Err(err) => {
                    let _ = txn.rollback().await;
                    return db_failed(err);
                }
            }
        }
    }

    let mut found: location::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        found.name = Set(name.trim().to_string());
    }
    if let Some(slug) = new_slug {
        found.slug = Set(slug);
    }
    if let Some(headline) = payload.headline {
        found.headline = Set(Some(headline));
    }
    if let Some(content) = payload.content {
        found.content = Set(content);
    }

    match found.update(&txn).await {
        Ok(updated) => match txn.commit().await {
            Ok(_) => {
                notify.success(format!("Location '{}' updated.", updated.name));
                to_response((StatusCode::OK, Json(updated)), Ok(()))
            }
            Err(err) => db_failed(err),
        },
        Err(_) => {
            let _ = txn.rollback().await;
            conflict(&notify, "A location with this slug already exists.")
        }
    }
}

async fn delete_location(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let found = match LocationEntity::find_by_id(id).one(&txn).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No location with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let name = found.name.clone();

    if let Err(err) = CarLocationEntity::delete_many()
        .filter(car_location::Column::LocationId.eq(id))
        .exec(&txn)
        .await
    {
        let _ = txn.rollback().await;
        return db_failed(err);
    }

    let found: location::ActiveModel = found.into();
    if let Err(err) = found.delete(&txn).await {
        let _ = txn.rollback().await;
        notify.error("Failed to delete location.");
        return db_failed(err);
    }

    match txn.commit().await {
        Ok(_) => {
            notify.success(format!("Location '{name}' deleted."));
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
        Err(err) => db_failed(err),
    }
}

/// Full-list scan for a case-sensitive slug match, excluding the record
/// being edited.
async fn slug_taken<C: sea_orm::ConnectionTrait>(
    conn: &C,
    slug: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sea_orm::DbErr> {
    let all = LocationEntity::find().all(conn).await?;
    Ok(all
        .iter()
        .any(|loc| loc.slug == slug && Some(loc.id) != exclude_id))
}

//Structs
#[derive(Deserialize, Clone, Debug)]
struct CreateLocation {
    name: Option<String>,
    slug: Option<String>,
    headline: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
struct PatchLocation {
    name: Option<String>,
    slug: Option<String>,
    headline: Option<String>,
    content: Option<String>,
}
