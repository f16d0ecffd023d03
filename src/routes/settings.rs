use axum::{
    Router,
    routing::get,
    extract::{Extension, Json},
    http::HeaderMap,
    response::Json as RespJson,
};
use sqlx::PgPool;

use crate::model::settings::Pengaturan;
use crate::routes::auth::require_admin;
use crate::routes::{db_error, ApiError};

pub fn settings_router() -> Router {
    Router::new().route("/api/settings", get(get_settings).put(put_settings))
}

// Publik: dipakai halaman depan (nomor WA, profil perusahaan, logo)
async fn get_settings(
    Extension(pool): Extension<PgPool>,
) -> Result<RespJson<Pengaturan>, ApiError> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
        .fetch_all(&pool)
        .await
        .map_err(db_error)?;

    Ok(RespJson(Pengaturan::dari_baris(rows)))
}

// Simpan semua field sekaligus; last write wins
async fn put_settings(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<Pengaturan>,
) -> Result<RespJson<Pengaturan>, ApiError> {
    require_admin(&headers, &pool).await?;

    let mut tx = pool.begin().await.map_err(db_error)?;
    for (key, value) in payload.sebagai_baris() {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
        )
        .bind(key)
        .bind(value)
        .execute(&mut tx)
        .await
        .map_err(db_error)?;
    }
    tx.commit().await.map_err(db_error)?;

    tracing::info!("pengaturan situs disimpan");
    Ok(RespJson(payload))
}
