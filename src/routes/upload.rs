use axum::{
    Router,
    routing::post,
    extract::{DefaultBodyLimit, Extension, Multipart},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::routes::auth::require_admin;
use crate::routes::{api_error, db_error, ApiError};

pub const MAKS_GAMBAR_KOSTUM: usize = 5 * 1024 * 1024;
pub const MAKS_LOGO: usize = 2 * 1024 * 1024;

const MIME_KOSTUM: &[&str] = &["image/jpeg", "image/png", "image/webp"];
const MIME_LOGO: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/svg+xml"];

pub fn upload_router() -> Router {
    Router::new()
        .route("/api/upload/kostum", post(upload_kostum))
        .route("/api/upload/logo", post(upload_logo))
        // limit default axum 2MB terlalu kecil untuk gambar kostum
        .layer(DefaultBodyLimit::max(MAKS_GAMBAR_KOSTUM + 64 * 1024))
}

fn mime_diizinkan(content_type: &str, diizinkan: &[&str]) -> bool {
    diizinkan.contains(&content_type)
}

fn ekstensi_untuk(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

// content-type dari klien, atau tebakan dari nama file kalau tidak ada
fn deteksi_mime(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    if let Some(ct) = content_type {
        return Some(ct.to_string());
    }
    file_name
        .and_then(|nama| mime_guess::from_path(nama).first())
        .map(|m| m.essence_str().to_string())
}

async fn simpan_berkas(
    multipart: &mut Multipart,
    direktori: &str,
    maks: usize,
    diizinkan: &[&str],
) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Upload tidak valid"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let mime = deteksi_mime(field.content_type(), field.file_name())
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Tipe file tidak dikenal"))?;

        if !mime_diizinkan(&mime, diizinkan) {
            return Err(api_error(StatusCode::BAD_REQUEST, "File harus berupa gambar"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Upload tidak valid"))?;

        if data.len() > maks {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Ukuran file melebihi batas maksimal",
            ));
        }

        let nama = format!("{}.{}", Uuid::new_v4(), ekstensi_untuk(&mime));
        let dir = format!("uploads/{direktori}");
        let path = format!("{dir}/{nama}");

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!("gagal membuat direktori upload: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Gagal menyimpan file")
        })?;
        tokio::fs::write(&path, &data).await.map_err(|e| {
            tracing::error!("gagal menulis file upload: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Gagal menyimpan file")
        })?;

        // path publik, dilayani ServeDir di main
        return Ok(format!("/{path}"));
    }

    Err(api_error(StatusCode::BAD_REQUEST, "Field file tidak ditemukan"))
}

async fn upload_kostum(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    mut multipart: Multipart,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;
    let path = simpan_berkas(&mut multipart, "kostum", MAKS_GAMBAR_KOSTUM, MIME_KOSTUM).await?;
    Ok(RespJson(serde_json::json!({ "path": path })))
}

// Logo sekaligus disimpan ke setting logo_url supaya halaman publik
// langsung memakai yang baru
async fn upload_logo(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    mut multipart: Multipart,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_admin(&headers, &pool).await?;
    let path = simpan_berkas(&mut multipart, "logo", MAKS_LOGO, MIME_LOGO).await?;

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES ('logo_url', $1, now()) \
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
    )
    .bind(&path)
    .execute(&pool)
    .await
    .map_err(db_error)?;

    Ok(RespJson(serde_json::json!({ "path": path })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_kostum_tanpa_svg() {
        assert!(mime_diizinkan("image/jpeg", MIME_KOSTUM));
        assert!(mime_diizinkan("image/webp", MIME_KOSTUM));
        assert!(!mime_diizinkan("image/svg+xml", MIME_KOSTUM));
        assert!(!mime_diizinkan("application/pdf", MIME_KOSTUM));
    }

    #[test]
    fn mime_logo_menerima_svg() {
        assert!(mime_diizinkan("image/svg+xml", MIME_LOGO));
    }

    #[test]
    fn deteksi_mime_dari_nama_file() {
        assert_eq!(
            deteksi_mime(None, Some("foto.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            deteksi_mime(Some("image/webp"), Some("foto.png")).as_deref(),
            Some("image/webp")
        );
        assert_eq!(deteksi_mime(None, None), None);
    }

    #[test]
    fn batas_ukuran_sesuai_kontrak() {
        assert_eq!(MAKS_GAMBAR_KOSTUM, 5 * 1024 * 1024);
        assert_eq!(MAKS_LOGO, 2 * 1024 * 1024);
    }
}
