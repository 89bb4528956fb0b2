use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::api::admin::common::{
    db_failed, not_found, read_image_upload, required, txn_failed, validation_failed,
};
use crate::entities::{
    blog::{self, Entity as BlogEntity},
    StringList,
};
use crate::middleware::logging::{to_response, ApiError};
use crate::notify::NotificationQueue;
use crate::slug::slugify;
use crate::storage::{delete_object, resolve_image, save_object, uploads_dir, Bucket, ResolvedImage};

//ROUTERS
pub fn admin_blog_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/blog", get(list_blogs).post(create_blog))
        .route(
            "/blog/:id",
            get(admin_get_blog).patch(patch_blog).delete(delete_blog),
        )
        .route("/blog/:id/image", post(upload_blog_cover))
        .layer(Extension(db))
}

//ROUTES

/// Admin list includes drafts, unlike the public feed.
async fn list_blogs(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match BlogEntity::find()
        .order_by_desc(blog::Column::CreatedAt)
        .all(db.as_ref())
        .await
    {
        Ok(blogs) => to_response((StatusCode::OK, Json(blogs)), Ok(())),
        Err(err) => db_failed(err),
    }
}

async fn admin_get_blog(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match BlogEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(post)) => to_response((StatusCode::OK, Json(post)), Ok(())),
        Ok(None) => not_found(format!("No blog with {id} id was found.")),
        Err(err) => db_failed(err),
    }
}

async fn create_blog(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<CreateBlog>,
) -> Response {
    let title = match required(&payload.title) {
        Some(title) => title.to_string(),
        None => return validation_failed(&notify, "Blog title is required."),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let now = Utc::now();
    let new_blog = blog::ActiveModel {
        slug: Set(slugify(&title)),
        title: Set(title),
        content: Set(payload.content.unwrap_or_default()),
        excerpt: Set(payload.excerpt),
        cover_image: Set(payload.cover_image),
        author: Set(payload.author.unwrap_or_else(|| "Team".to_string())),
        category: Set(payload.category),
        tags: Set(StringList::deduped(payload.tags.unwrap_or_default())),
        views: Set(0),
        created_at: Set(now),
        published_at: Set(if payload.published.unwrap_or(false) {
            Some(now)
        } else {
            None
        }),
        ..Default::default()
    };

    let inserted_id = match BlogEntity::insert(new_blog).exec(&txn).await {
        Ok(res) => res.last_insert_id,
        Err(err) => {
            let _ = txn.rollback().await;
            notify.error("Failed to create blog post.");
            return db_failed(err);
        }
    };

    let saved = match BlogEntity::find_by_id(inserted_id).one(&txn).await {
        Ok(Some(saved)) => saved,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No blog with {inserted_id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    match txn.commit().await {
        Ok(_) => {
            notify.success(format!("Blog '{}' created.", saved.title));
            to_response((StatusCode::CREATED, Json(saved)), Ok(()))
        }
        Err(err) => db_failed(err),
    }
}

async fn patch_blog(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    Json(payload): Json<PatchBlog>,
) -> Response {
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return validation_failed(&notify, "Blog title is required.");
        }
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let existing = match BlogEntity::find_by_id(id).one(&txn).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No blog with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let mut post: blog::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        // slug tracks the title; the client-facing slug field is inert
        post.slug = Set(slugify(title.trim()));
        post.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        post.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        post.excerpt = Set(Some(excerpt));
    }
    if let Some(author) = payload.author {
        post.author = Set(author);
    }
    if let Some(category) = payload.category {
        post.category = Set(Some(category));
    }
    if let Some(tags) = payload.tags {
        post.tags = Set(StringList::deduped(tags));
    }
    if let Some(published) = payload.published {
        post.published_at = Set(if published { Some(Utc::now()) } else { None });
    }

    match post.update(&txn).await {
        Ok(updated) => match txn.commit().await {
            Ok(_) => {
                notify.success(format!("Blog '{}' updated.", updated.title));
                to_response((StatusCode::OK, Json(updated)), Ok(()))
            }
            Err(err) => db_failed(err),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            notify.error("Failed to update blog post.");
            db_failed(err)
        }
    }
}

async fn delete_blog(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return txn_failed(),
    };

    let post = match BlogEntity::find_by_id(id).one(&txn).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            let _ = txn.rollback().await;
            return not_found(format!("No blog with {id} id was found."));
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return db_failed(err);
        }
    };

    let cover = post.cover_image.clone();
    let title = post.title.clone();

    let post: blog::ActiveModel = post.into();
    if let Err(err) = post.delete(&txn).await {
        let _ = txn.rollback().await;
        notify.error("Failed to delete blog post.");
        return db_failed(err);
    }

    if let Err(err) = txn.commit().await {
        return db_failed(err);
    }

    if let Some(url) = cover {
        if let Err(err) = delete_object(&uploads_dir(), Bucket::BlogImages, &url).await {
            warn!(error = %err, url = %url, "failed to delete stored blog cover");
        }
    }

    notify.success(format!("Blog '{title}' deleted."));
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

async fn upload_blog_cover(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notify): Extension<Arc<NotificationQueue>>,
    mut multipart: Multipart,
) -> Response {
    let post = match BlogEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found(format!("No blog with {id} id was found.")),
        Err(err) => return db_failed(err),
    };

    let (key, data) = match read_image_upload(&mut multipart, Bucket::BlogImages).await {
        Ok(upload) => upload,
        Err(err) => return validation_failed(&notify, &err.to_string()),
    };

    let upload_result = save_object(&uploads_dir(), Bucket::BlogImages, &key, &data).await;
    let resolved = match resolve_image(Some(upload_result), post.cover_image.clone()) {
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

    let cover = match resolved {
        ResolvedImage::Keep(cover) => cover,
        ResolvedImage::FallBack(previous) => {
            warn!(blog_id = id, "cover upload failed, previous image kept");
            Some(previous)
        }
    };

    let mut active: blog::ActiveModel = post.into();
    active.cover_image = Set(cover);

    match active.update(db.as_ref()).await {
        Ok(updated) => {
            notify.success(format!("Cover for '{}' saved.", updated.title));
            to_response((StatusCode::OK, Json(updated)), Ok(()))
        }
        Err(err) => {
            notify.error("Failed to save blog cover.");
            db_failed(err)
        }
    }
}

//Structs
#[derive(Deserialize, Clone, Debug)]
struct CreateBlog {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    cover_image: Option<String>,
    author: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    published: Option<bool>,
}

#[derive(Deserialize, Clone, Debug)]
struct PatchBlog {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    author: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    published: Option<bool>,
}
