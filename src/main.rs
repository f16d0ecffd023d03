use axum::{extract::Extension, Router};
use dotenv::dotenv;
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod model;
mod routes;
mod sewa;

use routes::admin_users::admin_users_router;
use routes::auth::auth_router;
use routes::dashboard::dashboard_router;
use routes::kategori::kategori_router;
use routes::kostum::kostum_router;
use routes::orders::order_router;
use routes::settings::settings_router;
use routes::tracking::tracking_router;
use routes::upload::upload_router;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Connect to PostgreSQL
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let serve_dir = ServeDir::new("../fe/dist")
        .not_found_service(ServeFile::new("../fe/dist/index.html"));

    let app = Router::new()
        // Auth + gerbang admin
        .merge(auth_router())
        // Order sewa (admin) + tracking publik
        .merge(order_router())
        .merge(tracking_router())
        // Katalog kostum & kategori
        .merge(kostum_router())
        .merge(kategori_router())
        // Pengaturan situs & roster admin
        .merge(settings_router())
        .merge(admin_users_router())
        .merge(dashboard_router())
        // Upload gambar kostum / logo
        .merge(upload_router())
        // File hasil upload dilayani statis
        .nest_service("/uploads", ServeDir::new("uploads"))
        // Frontend build menangani sisanya
        .fallback_service(serve_dir)
        .layer(Extension(pool))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    tracing::info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server error");
}
