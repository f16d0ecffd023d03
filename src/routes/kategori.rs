use axum::{
    Router,
    routing::{get, post, put, delete},
    extract::{Extension, Json, Path},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::kategori::{Kategori, KategoriRequest};
use crate::routes::auth::require_admin;
use crate::routes::{api_error, db_error, ApiError};

pub fn kategori_router() -> Router {
    Router::new()
        .route("/api/kategori", get(list_kategori))
        .route("/api/kategori", post(create_kategori))
        .route("/api/kategori/:id", put(update_kategori))
        .route("/api/kategori/:id", delete(delete_kategori))
}

async fn list_kategori(
    Extension(pool): Extension<PgPool>,
) -> Result<RespJson<Vec<Kategori>>, ApiError> {
    let rows = sqlx::query_as::<_, Kategori>(
        "SELECT id, nama, created_at FROM kategori ORDER BY nama ASC",
    )
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    Ok(RespJson(rows))
}

async fn create_kategori(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<KategoriRequest>,
) -> Result<RespJson<Kategori>, ApiError> {
    require_admin(&headers, &pool).await?;

    if payload.nama.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Nama kategori harus diisi"));
    }

    let kategori = sqlx::query_as::<_, Kategori>(
        "INSERT INTO kategori (id, nama) VALUES ($1, $2) RETURNING id, nama, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(payload.nama.trim())
    .fetch_one(&pool)
    .await
    .map_err(db_error)?;

    Ok(RespJson(kategori))
}

async fn update_kategori(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(kategori_id): Path<Uuid>,
    Json(payload): Json<KategoriRequest>,
) -> Result<RespJson<Kategori>, ApiError> {
    require_admin(&headers, &pool).await?;

    if payload.nama.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Nama kategori harus diisi"));
    }

    let kategori = sqlx::query_as::<_, Kategori>(
        "UPDATE kategori SET nama = $2 WHERE id = $1 RETURNING id, nama, created_at",
    )
    .bind(kategori_id)
    .bind(payload.nama.trim())
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?;

    kategori
        .map(RespJson)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kategori tidak ditemukan"))
}

// Kostum yang memakai kategori ini tidak ikut terhapus;
// kategori_id-nya jadi NULL (ON DELETE SET NULL)
async fn delete_kategori(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(kategori_id): Path<Uuid>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;

    let hasil = sqlx::query("DELETE FROM kategori WHERE id = $1")
        .bind(kategori_id)
        .execute(&pool)
        .await
        .map_err(db_error)?;

    if hasil.rows_affected() == 0 {
        return Err(api_error(StatusCode::NOT_FOUND, "Kategori tidak ditemukan"));
    }
    Ok(RespJson(serde_json::json!({ "success": true })))
}
