use axum::{
    Router,
    routing::{get, post, put, delete},
    extract::{Extension, Json, Path, Query},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::orders::{CreateOrderRequest, Order, OrderQuery, OrderRow, UpdateOrderRequest};
use crate::routes::auth::require_admin;
use crate::routes::{api_error, db_error, ApiError};
use crate::sewa::{self, StatusOrder};

pub fn order_router() -> Router {
    Router::new()
        .route("/api/orders", get(list_orders))
        .route("/api/orders", post(create_order))
        .route("/api/orders/:id", get(get_order))
        .route("/api/orders/:id", put(update_order))
        .route("/api/orders/:id", delete(delete_order))
}

const ORDER_COLUMNS: &str = "id, kode_order, nama_penyewa, no_hp, kostum_id, kuantitas, \
     tanggal_sewa, tanggal_kembali_rencana, tanggal_kembali_aktual, \
     harga_sewa, denda, total_bayar, status, catatan, created_at, updated_at";

fn parse_status(s: &str) -> Result<StatusOrder, ApiError> {
    StatusOrder::parse(s).map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))
}

// Buat order baru: harga di-snapshot dari kostum, denda/total dihitung server,
// stok dialokasikan lewat satu update kondisional di transaksi yang sama.
// Stok kurang -> transaksi batal, tidak ada baris order yang tertulis.
async fn create_order(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<RespJson<Order>, ApiError> {
    require_admin(&headers, &pool).await?;

    let kuantitas = payload.kuantitas.unwrap_or(1);
    if kuantitas < 1 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Kuantitas minimal 1"));
    }
    let status = parse_status(payload.status.as_deref().unwrap_or("aktif"))?;

    let mut tx = pool.begin().await.map_err(db_error)?;

    let harga: Option<(f64,)> =
        sqlx::query_as("SELECT harga_sewa FROM kostum WHERE id = $1 FOR UPDATE")
            .bind(payload.kostum_id)
            .fetch_optional(&mut tx)
            .await
            .map_err(db_error)?;
    let (harga_sewa,) =
        harga.ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kostum tidak ditemukan"))?;

    let denda = sewa::hitung_denda(
        harga_sewa,
        payload.tanggal_kembali_rencana,
        payload.tanggal_kembali_aktual,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
    let total_bayar = sewa::hitung_total(harga_sewa, denda);

    // Hanya status aktif yang mengalokasikan stok
    if status == StatusOrder::Aktif {
        let hasil = sqlx::query(
            "UPDATE kostum SET \
                 kuantitas_tersedia = kuantitas_tersedia - $2, \
                 status_ketersediaan = CASE WHEN kuantitas_tersedia - $2 > 0 \
                     THEN 'tersedia' ELSE 'disewa' END, \
                 updated_at = now() \
             WHERE id = $1 AND kuantitas_tersedia >= $2",
        )
        .bind(payload.kostum_id)
        .bind(kuantitas)
        .execute(&mut tx)
        .await
        .map_err(db_error)?;

        if hasil.rows_affected() == 0 {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Kuantitas melebihi stok tersedia",
            ));
        }
    }

    let kode_order = sewa::generate_kode_order();
    let insert = format!(
        "INSERT INTO orders ({ORDER_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now(), NULL) \
         RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&insert)
        .bind(Uuid::new_v4())
        .bind(&kode_order)
        .bind(&payload.nama_penyewa)
        .bind(&payload.no_hp)
        .bind(payload.kostum_id)
        .bind(kuantitas)
        .bind(payload.tanggal_sewa)
        .bind(payload.tanggal_kembali_rencana)
        .bind(payload.tanggal_kembali_aktual)
        .bind(harga_sewa)
        .bind(denda)
        .bind(total_bayar)
        .bind(status.as_str())
        .bind(&payload.catatan)
        .fetch_one(&mut tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!("order {} dibuat untuk kostum {}", order.kode_order, order.kostum_id);
    Ok(RespJson(order))
}

// Edit order: harga di-snapshot ulang, denda/total dihitung ulang, lalu
// stok direkonsiliasi sesuai transisi status. Kuantitas dan flag
// ketersediaan ditulis dalam satu statement supaya tidak pernah terbaca
// saling bertentangan.
async fn update_order(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<RespJson<Order>, ApiError> {
    require_admin(&headers, &pool).await?;

    if payload.kuantitas < 1 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Kuantitas minimal 1"));
    }
    let status_baru = parse_status(&payload.status)?;

    let mut tx = pool.begin().await.map_err(db_error)?;

    let lama: Option<(String, i32)> =
        sqlx::query_as("SELECT status, kuantitas FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut tx)
            .await
            .map_err(db_error)?;
    let (status_lama, kuantitas_lama) =
        lama.ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Order tidak ditemukan"))?;
    let status_lama = parse_status(&status_lama)?;

    let kostum: Option<(f64, i32, i32)> = sqlx::query_as(
        "SELECT harga_sewa, kuantitas_tersedia, kuantitas_total \
         FROM kostum WHERE id = $1 FOR UPDATE",
    )
    .bind(payload.kostum_id)
    .fetch_optional(&mut tx)
    .await
    .map_err(db_error)?;
    let (harga_sewa, tersedia, total) =
        kostum.ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kostum tidak ditemukan"))?;

    let denda = sewa::hitung_denda(
        harga_sewa,
        payload.tanggal_kembali_rencana,
        payload.tanggal_kembali_aktual,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
    let total_bayar = sewa::hitung_total(harga_sewa, denda);

    let update = format!(
        "UPDATE orders SET \
             nama_penyewa = $2, no_hp = $3, kostum_id = $4, kuantitas = $5, \
             tanggal_sewa = $6, tanggal_kembali_rencana = $7, tanggal_kembali_aktual = $8, \
             harga_sewa = $9, denda = $10, total_bayar = $11, status = $12, catatan = $13, \
             updated_at = now() \
         WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&update)
        .bind(order_id)
        .bind(&payload.nama_penyewa)
        .bind(&payload.no_hp)
        .bind(payload.kostum_id)
        .bind(payload.kuantitas)
        .bind(payload.tanggal_sewa)
        .bind(payload.tanggal_kembali_rencana)
        .bind(payload.tanggal_kembali_aktual)
        .bind(harga_sewa)
        .bind(denda)
        .bind(total_bayar)
        .bind(status_baru.as_str())
        .bind(&payload.catatan)
        .fetch_one(&mut tx)
        .await
        .map_err(db_error)?;

    let tersedia_baru = sewa::stok_setelah_edit(
        tersedia,
        total,
        status_lama,
        kuantitas_lama,
        status_baru,
        payload.kuantitas,
    );
    if tersedia_baru != tersedia {
        sqlx::query(
            "UPDATE kostum SET kuantitas_tersedia = $2, status_ketersediaan = $3, \
             updated_at = now() WHERE id = $1",
        )
        .bind(payload.kostum_id)
        .bind(tersedia_baru)
        .bind(sewa::status_ketersediaan(tersedia_baru))
        .execute(&mut tx)
        .await
        .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "order {} diupdate: {} -> {}",
        order.kode_order,
        status_lama.as_str(),
        status_baru.as_str()
    );
    Ok(RespJson(order))
}

async fn get_order(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(order_id): Path<Uuid>,
) -> Result<RespJson<OrderRow>, ApiError> {
    require_admin(&headers, &pool).await?;

    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT o.*, k.nama AS kostum_nama \
         FROM orders o JOIN kostum k ON k.id = o.kostum_id WHERE o.id = $1",
    )
    .bind(order_id)
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?;

    row.map(RespJson)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Order tidak ditemukan"))
}

async fn list_orders(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Query(params): Query<OrderQuery>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;

    let rows = match &params.status {
        Some(status) => {
            parse_status(status)?;
            sqlx::query_as::<_, OrderRow>(
                "SELECT o.*, k.nama AS kostum_nama \
                 FROM orders o JOIN kostum k ON k.id = o.kostum_id \
                 WHERE o.status = $1 ORDER BY o.created_at DESC",
            )
            .bind(status)
            .fetch_all(&pool)
            .await
        }
        None => {
            sqlx::query_as::<_, OrderRow>(
                "SELECT o.*, k.nama AS kostum_nama \
                 FROM orders o JOIN kostum k ON k.id = o.kostum_id \
                 ORDER BY o.created_at DESC",
            )
            .fetch_all(&pool)
            .await
        }
    }
    .map_err(db_error)?;

    let total = rows.len();
    Ok(RespJson(serde_json::json!({ "data": rows, "total": total })))
}

// Hapus order TIDAK mengembalikan stok; rekonsiliasi stok hanya
// terjadi lewat transisi status.
async fn delete_order(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(order_id): Path<Uuid>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;

    let hasil = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order_id)
        .execute(&pool)
        .await
        .map_err(db_error)?;

    if hasil.rows_affected() == 0 {
        return Err(api_error(StatusCode::NOT_FOUND, "Order tidak ditemukan"));
    }
    Ok(RespJson(serde_json::json!({ "success": true })))
}
