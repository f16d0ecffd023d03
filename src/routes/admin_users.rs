use axum::{
    Router,
    routing::{get, put},
    extract::{Extension, Json, Path},
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::admin_user::{
    AdminUser, CreateAdminRequest, UpdateAdminRequest, ROLE_ADMIN, ROLE_SUPER_ADMIN,
};
use crate::routes::auth::{hash_password, require_admin, require_super_admin};
use crate::routes::{api_error, db_error, ApiError};

pub fn admin_users_router() -> Router {
    Router::new()
        .route("/api/admin-users", get(list_admins).post(create_admin))
        .route(
            "/api/admin-users/:id",
            put(update_admin).delete(delete_admin),
        )
        .route("/api/admin-users/:id/toggle", put(toggle_admin))
}

const ADMIN_COLUMNS: &str = "id, user_id, email, name, role, is_active, created_by, created_at";

fn validasi_role(role: &str) -> Result<(), ApiError> {
    if role != ROLE_ADMIN && role != ROLE_SUPER_ADMIN {
        return Err(api_error(StatusCode::BAD_REQUEST, "Role tidak dikenal"));
    }
    Ok(())
}

async fn list_admins(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
) -> Result<RespJson<Vec<AdminUser>>, ApiError> {
    require_admin(&headers, &pool).await?;

    let query = format!("SELECT {ADMIN_COLUMNS} FROM admin_users ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, AdminUser>(&query)
        .fetch_all(&pool)
        .await
        .map_err(db_error)?;

    Ok(RespJson(rows))
}

// Buat admin baru: sekaligus provisioning identitas login + baris roster
async fn create_admin(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<RespJson<AdminUser>, ApiError> {
    let pembuat = require_super_admin(&headers, &pool).await?;

    if payload.email.trim().is_empty() || payload.password.is_empty() || payload.name.trim().is_empty()
    {
        return Err(api_error(StatusCode::BAD_REQUEST, "Semua field harus diisi"));
    }
    validasi_role(&payload.role)?;

    let mut tx = pool.begin().await.map_err(db_error)?;

    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(payload.email.trim())
        .bind(hash_password(&payload.password))
        .execute(&mut tx)
        .await
        .map_err(|e| {
            tracing::warn!("gagal membuat user: {e}");
            api_error(StatusCode::CONFLICT, "Email sudah terdaftar")
        })?;

    let insert = format!(
        "INSERT INTO admin_users (id, user_id, email, name, role, is_active, created_by) \
         VALUES ($1, $2, $3, $4, $5, TRUE, $6) RETURNING {ADMIN_COLUMNS}"
    );
    let admin = sqlx::query_as::<_, AdminUser>(&insert)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(payload.email.trim())
        .bind(payload.name.trim())
        .bind(&payload.role)
        .bind(pembuat.user_id)
        .fetch_one(&mut tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;
    tracing::info!("admin {} dibuat oleh {}", admin.email, pembuat.email);
    Ok(RespJson(admin))
}

async fn update_admin(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(admin_id): Path<Uuid>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<RespJson<AdminUser>, ApiError> {
    require_super_admin(&headers, &pool).await?;

    if let Some(role) = &payload.role {
        validasi_role(role)?;
    }

    let update = format!(
        "UPDATE admin_users SET \
             name = COALESCE($2, name), \
             role = COALESCE($3, role), \
             is_active = COALESCE($4, is_active) \
         WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
    );
    let admin = sqlx::query_as::<_, AdminUser>(&update)
        .bind(admin_id)
        .bind(payload.name.as_deref())
        .bind(payload.role.as_deref())
        .bind(payload.is_active)
        .fetch_optional(&pool)
        .await
        .map_err(db_error)?;

    admin
        .map(RespJson)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Admin tidak ditemukan"))
}

async fn toggle_admin(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(admin_id): Path<Uuid>,
) -> Result<RespJson<AdminUser>, ApiError> {
    require_super_admin(&headers, &pool).await?;

    let update = format!(
        "UPDATE admin_users SET is_active = NOT is_active \
         WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
    );
    let admin = sqlx::query_as::<_, AdminUser>(&update)
        .bind(admin_id)
        .fetch_optional(&pool)
        .await
        .map_err(db_error)?;

    admin
        .map(RespJson)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Admin tidak ditemukan"))
}

async fn delete_admin(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Path(admin_id): Path<Uuid>,
) -> Result<RespJson<serde_json::Value>, ApiError> {
    require_super_admin(&headers, &pool).await?;

    // Super admin terakhir tidak boleh dihapus, supaya roster tidak terkunci
    let hasil = sqlx::query(
        "DELETE FROM admin_users WHERE id = $1 AND NOT ( \
             role = 'super_admin' AND \
             (SELECT COUNT(*) FROM admin_users WHERE role = 'super_admin') <= 1)",
    )
    .bind(admin_id)
    .execute(&pool)
    .await
    .map_err(db_error)?;

    if hasil.rows_affected() == 0 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Admin tidak ditemukan atau super admin terakhir tidak dapat dihapus",
        ));
    }
    Ok(RespJson(serde_json::json!({ "success": true })))
}
