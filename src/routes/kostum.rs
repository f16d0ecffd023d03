use std::collections::HashMap;

use axum::{
    Router,
    routing::{get, post, put, delete},
    extract::{Extension, Json, Path, Query},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::model::kostum::{
    CreateKostumRequest, GambarKostum, Kostum, KostumDetail, KostumQuery, UpdateKostumRequest,
};
use crate::routes::auth::require_admin;
use crate::routes::{api_error, db_error, ApiError};
use crate::sewa;

pub fn kostum_router() -> Router {
    Router::new()
        .route("/api/kostum", get(list_kostum))
        .route("/api/kostum", post(create_kostum))
        .route("/api/kostum/:id", get(get_kostum))
        .route("/api/kostum/:id", put(update_kostum))
        .route("/api/kostum/:id", delete(delete_kostum))
}

const KOSTUM_COLUMNS: &str = "id, kategori_id, nama, ukuran, harga_sewa, kuantitas_total, \
     kuantitas_tersedia, status_ketersediaan, deskripsi, created_at, updated_at";

async fn gambar_untuk(
    pool: &PgPool,
    kostum_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<GambarKostum>>, ApiError> {
    let rows = sqlx::query_as::<_, GambarKostum>(
        "SELECT id, kostum_id, path, is_primary, created_at \
         FROM gambar_kostum WHERE kostum_id = ANY($1) \
         ORDER BY is_primary DESC, created_at ASC",
    )
    .bind(kostum_ids)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let mut peta: HashMap<Uuid, Vec<GambarKostum>> = HashMap::new();
    for g in rows {
        peta.entry(g.kostum_id).or_default().push(g);
    }
    Ok(peta)
}

// Simpan ulang daftar gambar: hapus semua lalu insert urut, gambar pertama
// jadi primary. Selalu tepat satu primary selama daftar tidak kosong.
async fn simpan_gambar(
    tx: &mut Transaction<'_, Postgres>,
    kostum_id: Uuid,
    paths: &[String],
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM gambar_kostum WHERE kostum_id = $1")
        .bind(kostum_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    for (i, path) in paths.iter().enumerate() {
        sqlx::query(
            "INSERT INTO gambar_kostum (id, kostum_id, path, is_primary) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(kostum_id)
        .bind(path)
        .bind(i == 0)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    }
    Ok(())
}

// Katalog publik, filter opsional kategori/ketersediaan/nama
async fn list_kostum(
    Extension(pool): Extension<PgPool>,
    Query(params): Query<KostumQuery>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    let mut where_clauses = Vec::new();
    let mut param_count = 1;

    if params.kategori_id.is_some() {
        where_clauses.push(format!("k.kategori_id = ${param_count}"));
        param_count += 1;
    }
    if params.tersedia_saja.unwrap_or(false) {
        where_clauses.push("k.kuantitas_tersedia > 0".to_string());
    }
    if params.cari.is_some() {
        where_clauses.push(format!("k.nama ILIKE ${param_count}"));
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let fetch_query = format!(
        "SELECT k.id, k.kategori_id, k.nama, k.ukuran, k.harga_sewa, k.kuantitas_total, \
                k.kuantitas_tersedia, k.status_ketersediaan, k.deskripsi, k.created_at, \
                k.updated_at, kat.nama AS kategori_nama \
         FROM kostum k LEFT JOIN kategori kat ON kat.id = k.kategori_id \
         {where_clause} ORDER BY k.nama ASC"
    );

    let mut query = sqlx::query_as::<_, KostumDenganKategori>(&fetch_query);
    if let Some(kategori_id) = params.kategori_id {
        query = query.bind(kategori_id);
    }
    if let Some(cari) = &params.cari {
        query = query.bind(format!("%{cari}%"));
    }

    let rows = query.fetch_all(&pool).await.map_err(db_error)?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.kostum.id).collect();
    let mut gambar = gambar_untuk(&pool, &ids).await?;

    let data: Vec<KostumDetail> = rows
        .into_iter()
        .map(|r| KostumDetail {
            gambar: gambar.remove(&r.kostum.id).unwrap_or_default(),
            kategori_nama: r.kategori_nama,
            kostum: r.kostum,
        })
        .collect();

    let total = data.len();
    Ok(RespJson(serde_json::json!({ "data": data, "total": total })))
}

#[derive(sqlx::FromRow)]
struct KostumDenganKategori {
    #[sqlx(flatten)]
    kostum: Kostum,
    kategori_nama: Option<String>,
}

async fn get_kostum(
    Extension(pool): Extension<PgPool>,
    Path(kostum_id): Path<Uuid>,
) -> Result<RespJson<KostumDetail>, ApiError> {
    let row = sqlx::query_as::<_, KostumDenganKategori>(
        "SELECT k.id, k.kategori_id, k.nama, k.ukuran, k.harga_sewa, k.kuantitas_total, \
                k.kuantitas_tersedia, k.status_ketersediaan, k.deskripsi, k.created_at, \
                k.updated_at, kat.nama AS kategori_nama \
         FROM kostum k LEFT JOIN kategori kat ON kat.id = k.kategori_id WHERE k.id = $1",
    )
    .bind(kostum_id)
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?;

    let row =
        row.ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kostum tidak ditemukan"))?;
    let mut gambar = gambar_untuk(&pool, &[kostum_id]).await?;

    Ok(RespJson(KostumDetail {
        gambar: gambar.remove(&kostum_id).unwrap_or_default(),
        kategori_nama: row.kategori_nama,
        kostum: row.kostum,
    }))
}

async fn create_kostum(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateKostumRequest>,
) -> Result<RespJson<Kostum>, ApiError> {
    require_admin(&headers, &pool).await?;

    if !payload.harga_sewa.is_finite() || payload.harga_sewa < 0.0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Harga sewa tidak valid"));
    }

    let total = payload.kuantitas_total.unwrap_or(1).max(0);
    // Tersedia tidak boleh keluar dari [0, total]
    let tersedia = payload
        .kuantitas_tersedia
        .unwrap_or(total)
        .clamp(0, total);

    let mut tx = pool.begin().await.map_err(db_error)?;

    let insert = format!(
        "INSERT INTO kostum ({KOSTUM_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), NULL) \
         RETURNING {KOSTUM_COLUMNS}"
    );
    let kostum = sqlx::query_as::<_, Kostum>(&insert)
        .bind(Uuid::new_v4())
        .bind(payload.kategori_id)
        .bind(&payload.nama)
        .bind(&payload.ukuran)
        .bind(payload.harga_sewa)
        .bind(total)
        .bind(tersedia)
        .bind(sewa::status_ketersediaan(tersedia))
        .bind(&payload.deskripsi)
        .fetch_one(&mut tx)
        .await
        .map_err(db_error)?;

    if let Some(paths) = &payload.gambar {
        simpan_gambar(&mut tx, kostum.id, paths).await?;
    }

    tx.commit().await.map_err(db_error)?;
    tracing::info!("kostum {} dibuat", kostum.nama);
    Ok(RespJson(kostum))
}

async fn update_kostum(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(kostum_id): Path<Uuid>,
    Json(payload): Json<UpdateKostumRequest>,
) -> Result<RespJson<Kostum>, ApiError> {
    require_admin(&headers, &pool).await?;

    let mut tx = pool.begin().await.map_err(db_error)?;

    let select = format!("SELECT {KOSTUM_COLUMNS} FROM kostum WHERE id = $1 FOR UPDATE");
    let lama = sqlx::query_as::<_, Kostum>(&select)
        .bind(kostum_id)
        .fetch_optional(&mut tx)
        .await
        .map_err(db_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kostum tidak ditemukan"))?;

    let harga_sewa = payload.harga_sewa.unwrap_or(lama.harga_sewa);
    if !harga_sewa.is_finite() || harga_sewa < 0.0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Harga sewa tidak valid"));
    }

    let total = payload.kuantitas_total.unwrap_or(lama.kuantitas_total).max(0);
    let tersedia = payload
        .kuantitas_tersedia
        .unwrap_or(lama.kuantitas_tersedia)
        .clamp(0, total);

    let update = format!(
        "UPDATE kostum SET kategori_id = $2, nama = $3, ukuran = $4, harga_sewa = $5, \
             kuantitas_total = $6, kuantitas_tersedia = $7, status_ketersediaan = $8, \
             deskripsi = $9, updated_at = now() \
         WHERE id = $1 RETURNING {KOSTUM_COLUMNS}"
    );
    let kostum = sqlx::query_as::<_, Kostum>(&update)
        .bind(kostum_id)
        .bind(payload.kategori_id.or(lama.kategori_id))
        .bind(payload.nama.as_deref().unwrap_or(&lama.nama))
        .bind(payload.ukuran.as_deref().or(lama.ukuran.as_deref()))
        .bind(harga_sewa)
        .bind(total)
        .bind(tersedia)
        .bind(sewa::status_ketersediaan(tersedia))
        .bind(payload.deskripsi.as_deref().or(lama.deskripsi.as_deref()))
        .fetch_one(&mut tx)
        .await
        .map_err(db_error)?;

    if let Some(paths) = &payload.gambar {
        simpan_gambar(&mut tx, kostum_id, paths).await?;
    }

    tx.commit().await.map_err(db_error)?;
    Ok(RespJson(kostum))
}

async fn delete_kostum(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(kostum_id): Path<Uuid>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;

    // gambar_kostum ikut terhapus lewat ON DELETE CASCADE
    let hasil = sqlx::query("DELETE FROM kostum WHERE id = $1")
        .bind(kostum_id)
        .execute(&pool)
        .await
        .map_err(db_error)?;

    if hasil.rows_affected() == 0 {
        return Err(api_error(StatusCode::NOT_FOUND, "Kostum tidak ditemukan"));
    }
    Ok(RespJson(serde_json::json!({ "success": true })))
}
