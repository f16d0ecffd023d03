use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Kostum {
    pub id: Uuid,
    pub kategori_id: Option<Uuid>,
    pub nama: String,
    pub ukuran: Option<String>,
    pub harga_sewa: f64,
    pub kuantitas_total: i32,
    pub kuantitas_tersedia: i32,
    pub status_ketersediaan: String,
    pub deskripsi: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GambarKostum {
    pub id: Uuid,
    pub kostum_id: Uuid,
    pub path: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// Detail untuk halaman katalog: kostum + kategori + daftar gambar
#[derive(Debug, Serialize)]
pub struct KostumDetail {
    #[serde(flatten)]
    pub kostum: Kostum,
    pub kategori_nama: Option<String>,
    pub gambar: Vec<GambarKostum>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKostumRequest {
    pub kategori_id: Option<Uuid>,
    pub nama: String,
    pub ukuran: Option<String>,
    pub harga_sewa: f64,
    pub kuantitas_total: Option<i32>,
    pub kuantitas_tersedia: Option<i32>,
    pub deskripsi: Option<String>,
    // path hasil upload, urutan menentukan gambar utama
    pub gambar: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKostumRequest {
    pub kategori_id: Option<Uuid>,
    pub nama: Option<String>,
    pub ukuran: Option<String>,
    pub harga_sewa: Option<f64>,
    pub kuantitas_total: Option<i32>,
    pub kuantitas_tersedia: Option<i32>,
    pub deskripsi: Option<String>,
    pub gambar: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct KostumQuery {
    pub kategori_id: Option<Uuid>,
    pub tersedia_saja: Option<bool>,
    pub cari: Option<String>,
}
