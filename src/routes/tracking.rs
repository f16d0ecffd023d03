use axum::{
    Router,
    routing::get,
    extract::{Extension, Query},
    http::StatusCode,
    response::Json as RespJson,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::model::orders::OrderRow;
use crate::routes::{api_error, db_error, ApiError};

pub fn tracking_router() -> Router {
    Router::new().route("/api/tracking", get(lacak_order))
}

#[derive(Debug, Deserialize)]
pub struct TrackingQuery {
    pub kode_order: String,
    pub no_hp: String,
}

// Lookup publik: kode order (dinormalisasi uppercase) DAN nomor HP harus
// sama-sama cocok. Salah satu meleset -> "tidak ditemukan" yang seragam,
// tanpa membocorkan field mana yang salah.
async fn lacak_order(
    Extension(pool): Extension<PgPool>,
    Query(params): Query<TrackingQuery>,
) -> Result<RespJson<OrderRow>, ApiError> {
    let kode = params.kode_order.trim().to_uppercase();

    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT o.*, k.nama AS kostum_nama \
         FROM orders o JOIN kostum k ON k.id = o.kostum_id \
         WHERE o.kode_order = $1 AND o.no_hp = $2",
    )
    .bind(&kode)
    .bind(params.no_hp.trim())
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?;

    row.map(RespJson).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "Pesanan tidak ditemukan. Pastikan kode order dan nomor HP sudah benar.",
        )
    })
}
