use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Denda keterlambatan: 10% dari harga sewa per hari terlambat.
pub const TARIF_DENDA_PER_HARI: f64 = 0.10;

#[derive(Debug, Error)]
pub enum SewaError {
    #[error("harga sewa tidak valid: {0}")]
    HargaInvalid(f64),
    #[error("status order tidak dikenal: {0}")]
    StatusInvalid(String),
}

/// Status order. Nilai wire mengikuti database: aktif/selesai/terlambat/dibatalkan.
/// Hanya `aktif` yang memegang alokasi stok.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOrder {
    #[serde(rename = "aktif")]
    Aktif,
    #[serde(rename = "selesai")]
    Selesai,
    #[serde(rename = "terlambat")]
    Terlambat,
    #[serde(rename = "dibatalkan")]
    Dibatalkan,
}

impl StatusOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusOrder::Aktif => "aktif",
            StatusOrder::Selesai => "selesai",
            StatusOrder::Terlambat => "terlambat",
            StatusOrder::Dibatalkan => "dibatalkan",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SewaError> {
        match s {
            "aktif" => Ok(StatusOrder::Aktif),
            "selesai" => Ok(StatusOrder::Selesai),
            "terlambat" => Ok(StatusOrder::Terlambat),
            "dibatalkan" => Ok(StatusOrder::Dibatalkan),
            other => Err(SewaError::StatusInvalid(other.to_string())),
        }
    }
}

/// Hitung hari terlambat: selisih hari utuh, tidak pernah negatif.
/// Belum dikembalikan (aktual = None) berarti 0.
pub fn hari_terlambat(rencana: NaiveDate, aktual: Option<NaiveDate>) -> i64 {
    match aktual {
        Some(tanggal) => (tanggal - rencana).num_days().max(0),
        None => 0,
    }
}

/// Denda = hari terlambat x (harga sewa x 10%). Tanpa batas atas.
pub fn hitung_denda(
    harga_sewa: f64,
    rencana: NaiveDate,
    aktual: Option<NaiveDate>,
) -> Result<f64, SewaError> {
    if !harga_sewa.is_finite() || harga_sewa < 0.0 {
        return Err(SewaError::HargaInvalid(harga_sewa));
    }
    let hari = hari_terlambat(rencana, aktual);
    Ok(hari as f64 * (harga_sewa * TARIF_DENDA_PER_HARI))
}

pub fn hitung_total(harga_sewa: f64, denda: f64) -> f64 {
    harga_sewa + denda
}

/// Kode order: ORD + tahun 2 digit + bulan 2 digit + 4 digit acak.
/// Tidak ada pengecekan tabrakan saat generate; keunikan dijaga oleh
/// constraint UNIQUE di tabel orders.
pub fn generate_kode_order() -> String {
    let sekarang = Utc::now().date_naive();
    kode_order_untuk(sekarang, rand::thread_rng().gen_range(0..10000))
}

pub fn kode_order_untuk(tanggal: NaiveDate, acak: u32) -> String {
    format!(
        "ORD{:02}{:02}{:04}",
        tanggal.year() % 100,
        tanggal.month(),
        acak % 10000
    )
}

/// Stok setelah order baru berstatus aktif dialokasikan.
/// Route create memakai conditional update, jadi hasil minus tidak akan
/// tersimpan; floor 0 di sini menjaga fungsi tetap total.
pub fn stok_setelah_buat(tersedia: i32, kuantitas: i32) -> i32 {
    (tersedia - kuantitas).max(0)
}

/// Rekonsiliasi stok saat edit order, mengikuti tabel transisi:
/// aktif->selesai mengembalikan kuantitas lama (dibatasi total),
/// selesai->aktif mengambil kuantitas baru (floor 0),
/// aktif->aktif dengan kuantitas berubah menyesuaikan selisih (clamp 0..total).
/// Transisi lain (aktif->terlambat, aktif->dibatalkan, dibatalkan->apapun)
/// sengaja tidak menyentuh stok.
pub fn stok_setelah_edit(
    tersedia: i32,
    total: i32,
    status_lama: StatusOrder,
    kuantitas_lama: i32,
    status_baru: StatusOrder,
    kuantitas_baru: i32,
) -> i32 {
    use StatusOrder::*;
    match (status_lama, status_baru) {
        (Aktif, Selesai) => (tersedia + kuantitas_lama).min(total),
        (Selesai, Aktif) => (tersedia - kuantitas_baru).max(0),
        (Aktif, Aktif) if kuantitas_lama != kuantitas_baru => {
            let selisih = kuantitas_baru - kuantitas_lama;
            (tersedia - selisih).clamp(0, total)
        }
        _ => tersedia,
    }
}

/// Flag ketersediaan turunan dari kuantitas, ditulis atomik bersama stok.
pub fn status_ketersediaan(tersedia: i32) -> &'static str {
    if tersedia > 0 {
        "tersedia"
    } else {
        "disewa"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tgl(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn denda_tiga_hari_terlambat() {
        let denda =
            hitung_denda(100_000.0, tgl(2024, 1, 10), Some(tgl(2024, 1, 13))).unwrap();
        assert!((denda - 30_000.0).abs() < 1e-6);
        assert!((hitung_total(100_000.0, denda) - 130_000.0).abs() < 1e-6);
    }

    #[test]
    fn denda_nol_saat_tepat_waktu_atau_lebih_awal() {
        let rencana = tgl(2024, 1, 10);
        assert_eq!(hitung_denda(50_000.0, rencana, Some(rencana)).unwrap(), 0.0);
        assert_eq!(
            hitung_denda(50_000.0, rencana, Some(tgl(2024, 1, 8))).unwrap(),
            0.0
        );
    }

    #[test]
    fn denda_nol_saat_belum_dikembalikan() {
        assert_eq!(hitung_denda(75_000.0, tgl(2024, 3, 1), None).unwrap(), 0.0);
    }

    #[test]
    fn harga_negatif_atau_nan_ditolak() {
        let rencana = tgl(2024, 1, 10);
        assert!(hitung_denda(-1.0, rencana, None).is_err());
        assert!(hitung_denda(f64::NAN, rencana, None).is_err());
        assert!(hitung_denda(f64::INFINITY, rencana, None).is_err());
    }

    #[test]
    fn kode_order_deterministik() {
        assert_eq!(kode_order_untuk(tgl(2024, 3, 7), 42), "ORD24030042");
    }

    #[test]
    fn kode_order_pola_ord_dan_digit() {
        let kode = generate_kode_order();
        assert_eq!(kode.len(), 11);
        assert!(kode.starts_with("ORD"));
        assert!(kode[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn kode_order_bulan_dan_tahun_dua_digit() {
        assert!(kode_order_untuk(tgl(2025, 12, 31), 9999).starts_with("ORD2512"));
        assert!(kode_order_untuk(tgl(2030, 1, 1), 0).starts_with("ORD3001"));
        assert!(kode_order_untuk(tgl(2024, 6, 15), 12345).ends_with("2345"));
    }

    #[test]
    fn stok_buat_mengurangi_dan_floor_nol() {
        assert_eq!(stok_setelah_buat(5, 2), 3);
        assert_eq!(stok_setelah_buat(1, 3), 0);
    }

    #[test]
    fn transisi_aktif_ke_selesai_dibatasi_total() {
        // kuantitas lama 2, tersedia 1, total 5 -> 3
        assert_eq!(
            stok_setelah_edit(1, 5, StatusOrder::Aktif, 2, StatusOrder::Selesai, 2),
            3
        );
        // pengembalian yang melebihi total di-cap
        assert_eq!(
            stok_setelah_edit(4, 5, StatusOrder::Aktif, 3, StatusOrder::Selesai, 3),
            5
        );
    }

    #[test]
    fn transisi_selesai_ke_aktif_floor_nol() {
        assert_eq!(
            stok_setelah_edit(2, 5, StatusOrder::Selesai, 1, StatusOrder::Aktif, 3),
            0
        );
        assert_eq!(
            stok_setelah_edit(4, 5, StatusOrder::Selesai, 1, StatusOrder::Aktif, 3),
            1
        );
    }

    #[test]
    fn aktif_ke_aktif_menyesuaikan_selisih() {
        // kuantitas naik 2 -> stok turun 2
        assert_eq!(
            stok_setelah_edit(3, 5, StatusOrder::Aktif, 1, StatusOrder::Aktif, 3),
            1
        );
        // kuantitas turun 1 -> stok naik 1, clamp ke total
        assert_eq!(
            stok_setelah_edit(5, 5, StatusOrder::Aktif, 2, StatusOrder::Aktif, 1),
            5
        );
        // kuantitas sama -> tidak berubah
        assert_eq!(
            stok_setelah_edit(3, 5, StatusOrder::Aktif, 2, StatusOrder::Aktif, 2),
            3
        );
    }

    #[test]
    fn transisi_lain_tidak_menyentuh_stok() {
        let kasus = [
            (StatusOrder::Aktif, StatusOrder::Terlambat),
            (StatusOrder::Aktif, StatusOrder::Dibatalkan),
            (StatusOrder::Dibatalkan, StatusOrder::Aktif),
            (StatusOrder::Terlambat, StatusOrder::Selesai),
            (StatusOrder::Selesai, StatusOrder::Selesai),
        ];
        for (lama, baru) in kasus {
            assert_eq!(stok_setelah_edit(2, 5, lama, 3, baru, 4), 2);
        }
    }

    #[test]
    fn invarian_stok_selalu_dalam_batas() {
        for tersedia in 0..=5 {
            for lama in 1..=4 {
                for baru in 1..=4 {
                    let hasil = stok_setelah_edit(
                        tersedia,
                        5,
                        StatusOrder::Aktif,
                        lama,
                        StatusOrder::Selesai,
                        baru,
                    );
                    assert!((0..=5).contains(&hasil));
                }
            }
        }
    }

    #[test]
    fn flag_ketersediaan_turunan() {
        assert_eq!(status_ketersediaan(1), "tersedia");
        assert_eq!(status_ketersediaan(0), "disewa");
    }

    #[test]
    fn status_parse_dan_as_str() {
        for s in ["aktif", "selesai", "terlambat", "dibatalkan"] {
            assert_eq!(StatusOrder::parse(s).unwrap().as_str(), s);
        }
        assert!(StatusOrder::parse("pending").is_err());
    }
}
