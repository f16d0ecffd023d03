use axum::{http::StatusCode, response::Json as RespJson};

pub mod admin_users;
pub mod auth;
pub mod dashboard;
pub mod kategori;
pub mod kostum;
pub mod orders;
pub mod settings;
pub mod tracking;
pub mod upload;

pub type ApiError = (StatusCode, RespJson<serde_json::Value>);

pub fn api_error(status: StatusCode, pesan: &str) -> ApiError {
    (status, RespJson(serde_json::json!({ "error": pesan })))
}

// Kegagalan store tidak pernah bocor mentah ke klien
pub fn db_error(e: sqlx::Error) -> ApiError {
    tracing::error!("database error: {e}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Terjadi kesalahan. Silakan coba lagi.")
}
