use axum::{
    Router,
    routing::{get, post},
    extract::{Extension, Json},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::admin_user::AdminUser;
use crate::model::user::User;
use crate::routes::{api_error, db_error, ApiError};

const TOKEN_PREFIX: &str = "sesi_";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn auth_router() -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/me", get(me))
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn token_untuk(user_id: Uuid) -> String {
    format!("{TOKEN_PREFIX}{user_id}")
}

fn user_id_dari_token(token: &str) -> Option<Uuid> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|id| Uuid::parse_str(id).ok())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

// Ambil user dari header Authorization, verifikasi masih ada di database
pub async fn get_user_from_token(headers: &HeaderMap, pool: &PgPool) -> Result<Uuid, StatusCode> {
    let user_id = bearer_token(headers)
        .and_then(user_id_dari_token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let exists = sqlx::query("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .is_some();

    if !exists {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(user_id)
}

/// Gerbang admin: sesi valid SAJA tidak cukup, harus ada baris admin_users
/// aktif yang terhubung ke identitas sesi tersebut.
pub async fn require_admin(headers: &HeaderMap, pool: &PgPool) -> Result<AdminUser, ApiError> {
    let user_id = get_user_from_token(headers, pool)
        .await
        .map_err(|status| api_error(status, "Autentikasi diperlukan"))?;

    let admin = sqlx::query_as::<_, AdminUser>(
        "SELECT id, user_id, email, name, role, is_active, created_by, created_at
         FROM admin_users WHERE user_id = $1 AND is_active = TRUE",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    admin.ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Autentikasi diperlukan"))
}

pub async fn require_super_admin(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<AdminUser, ApiError> {
    let admin = require_admin(headers, pool).await?;
    if !admin.is_super_admin() {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "Hanya super admin yang dapat melakukan aksi ini",
        ));
    }
    Ok(admin)
}

async fn login(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> Result<RespJson<TokenResponse>, ApiError> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND password_hash = $2")
            .bind(&payload.email)
            .bind(hash_password(&payload.password))
            .fetch_optional(&pool)
            .await
            .map_err(db_error)?;

    match row {
        Some((user_id,)) => {
            tracing::info!("login berhasil untuk user {user_id}");
            Ok(RespJson(TokenResponse { token: token_untuk(user_id) }))
        }
        None => Err(api_error(StatusCode::UNAUTHORIZED, "Email atau password salah")),
    }
}

// Info sesi + roster untuk frontend; admin null kalau bukan admin aktif
async fn me(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    let user_id = get_user_from_token(&headers, &pool)
        .await
        .map_err(|status| api_error(status, "Autentikasi diperlukan"))?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .map_err(db_error)?;

    let admin = sqlx::query_as::<_, AdminUser>(
        "SELECT id, user_id, email, name, role, is_active, created_by, created_at
         FROM admin_users WHERE user_id = $1 AND is_active = TRUE",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await
    .map_err(db_error)?;

    let is_super_admin = admin.as_ref().map(|a| a.is_super_admin()).unwrap_or(false);
    Ok(RespJson(serde_json::json!({
        "user_id": user.id,
        "email": user.email,
        "admin": admin,
        "is_super_admin": is_super_admin,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_bolak_balik() {
        let id = Uuid::new_v4();
        assert_eq!(user_id_dari_token(&token_untuk(id)), Some(id));
    }

    #[test]
    fn token_rusak_ditolak() {
        assert_eq!(user_id_dari_token("sesi_bukan-uuid"), None);
        assert_eq!(user_id_dari_token("lain_prefix"), None);
        assert_eq!(user_id_dari_token(""), None);
    }

    #[test]
    fn hash_password_deterministik_hex() {
        let h = hash_password("rahasia");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_password("rahasia"));
        assert_ne!(h, hash_password("rahasia2"));
    }
}
