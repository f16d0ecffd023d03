use axum::{
    Router,
    routing::get,
    extract::Extension,
    http::HeaderMap,
    response::Json as RespJson,
};
use sqlx::PgPool;

use crate::routes::auth::require_admin;
use crate::routes::{db_error, ApiError};

pub fn dashboard_router() -> Router {
    Router::new().route("/api/dashboard", get(ringkasan))
}

// Angka ringkas untuk halaman dashboard admin
async fn ringkasan(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;

    let (total_kostum,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kostum")
        .fetch_one(&pool)
        .await
        .map_err(db_error)?;
    let (total_kategori,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kategori")
        .fetch_one(&pool)
        .await
        .map_err(db_error)?;
    let (total_order,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&pool)
        .await
        .map_err(db_error)?;

    let per_status: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM orders GROUP BY status")
            .fetch_all(&pool)
            .await
            .map_err(db_error)?;

    let mut order_per_status = serde_json::Map::new();
    for status in ["aktif", "selesai", "terlambat", "dibatalkan"] {
        let jumlah = per_status
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        order_per_status.insert(status.to_string(), jumlah.into());
    }

    Ok(RespJson(serde_json::json!({
        "total_kostum": total_kostum,
        "total_kategori": total_kategori,
        "total_order": total_order,
        "order_per_status": order_per_status,
    })))
}
