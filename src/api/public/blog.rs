use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::entities::blog::{self, Entity as BlogEntity};
use crate::middleware::logging::{to_response, ApiError};

pub fn blog_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/blog", get(get_blogs))
        .route("/blog/:slug", get(get_blog))
        .layer(Extension(db))
}

/// Published posts only, newest first. Drafts stay admin-only.
async fn get_blogs(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
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

    let result = BlogEntity::find()
        .filter(blog::Column::PublishedAt.is_not_null())
        .order_by_desc(blog::Column::CreatedAt)
        .all(&txn)
        .await;

    match result {
        Ok(blogs) => to_response((StatusCode::OK, Json(blogs)), Ok(())),
        Err(err) => to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            ),
            Err(ApiError::DbError(err.to_string())),
        ),
    }
}

/// Detail fetch bumps the view counter read-then-write, same as the
/// original page. A lost increment under concurrent reads is accepted.
async fn get_blog(
    Path(slug): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
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

    let post = match BlogEntity::find()
        .filter(blog::Column::Slug.eq(&*slug))
        .filter(blog::Column::PublishedAt.is_not_null())
        .one(&txn)
        .await
    {
        Ok(Some(post)) => post,
        Ok(None) => {
            let tmp = format!("No blog with slug '{slug}' was found.");
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
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error."
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    let views = post.views + 1;
    let mut counter: blog::ActiveModel = post.into();
    counter.views = Set(views);

    match counter.update(&txn).await {
        Ok(updated) => match txn.commit().await {
            Ok(_) => to_response((StatusCode::OK, Json(updated)), Ok(())),
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
            // the page still renders when the counter write fails
            warn!(error = %err, slug = %slug, "failed to bump blog views");
            let _ = txn.rollback().await;

            let fallback = BlogEntity::find()
                .filter(blog::Column::Slug.eq(&*slug))
                .one(db.as_ref())
                .await;
            match fallback {
                Ok(Some(post)) => to_response((StatusCode::OK, Json(post)), Ok(())),
                _ => to_response(
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "Internal server error."
                        })),
                    ),
                    Err(ApiError::DbError(err.to_string())),
                ),
            }
        }
    }
}
