use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use rentora::entities::{primary_setup, setup_schema};
use rentora::notify::NotificationQueue;
use rentora::storage::{uploads_dir, Bucket};
use rentora::create_api_router;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db: DatabaseConnection = Database::connect(&database_url)
        .await
        .expect("Failed to connect to the database");
    setup_schema(&db).await.expect("Failed to create schema");

    let shared_db = Arc::new(db);

    primary_setup(shared_db.clone())
        .await
        .expect("Failed to seed the admin user");

    let base = uploads_dir();
    for bucket in [Bucket::CarImages, Bucket::BlogImages] {
        tokio::fs::create_dir_all(base.join(bucket.dir()))
            .await
            .expect("Failed to create uploads directory");
    }

    let notify = Arc::new(NotificationQueue::default());
    let app = create_api_router(shared_db, notify);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind 0.0.0.0:3000");
    tracing::info!("Running at {:?}", listener);
    axum::serve(listener, app).await.expect("Server exited");
}
