use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Model utama order sewa (sesuai tabel orders)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub kode_order: String,

    // Data penyewa
    pub nama_penyewa: String,
    pub no_hp: String,

    // Data sewa
    pub kostum_id: Uuid,
    pub kuantitas: i32,
    pub tanggal_sewa: NaiveDate,
    pub tanggal_kembali_rencana: NaiveDate,
    pub tanggal_kembali_aktual: Option<NaiveDate>,

    // Harga di-snapshot dari kostum saat order dibuat/diedit;
    // denda dan total selalu dihitung server, tidak bisa diedit langsung
    pub harga_sewa: f64,
    pub denda: f64,
    pub total_bayar: f64,

    pub status: String,
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub nama_penyewa: String,
    pub no_hp: String,
    pub kostum_id: Uuid,
    pub kuantitas: Option<i32>,
    pub tanggal_sewa: NaiveDate,
    pub tanggal_kembali_rencana: NaiveDate,
    pub tanggal_kembali_aktual: Option<NaiveDate>,
    pub status: Option<String>,
    pub catatan: Option<String>,
}

// Form edit mengirim field lengkap, seperti form admin aslinya
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub nama_penyewa: String,
    pub no_hp: String,
    pub kostum_id: Uuid,
    pub kuantitas: i32,
    pub tanggal_sewa: NaiveDate,
    pub tanggal_kembali_rencana: NaiveDate,
    pub tanggal_kembali_aktual: Option<NaiveDate>,
    pub status: String,
    pub catatan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
}

// Baris listing admin: order + nama kostum
#[derive(Debug, Serialize, FromRow)]
pub struct OrderRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub kostum_nama: String,
}
