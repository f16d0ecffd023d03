use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

// Roster otorisasi: login saja tidak cukup, harus ada baris aktif di sini
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn roster(role: &str) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "admin@contoh.id".into(),
            name: "Admin".into(),
            role: role.into(),
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hanya_super_admin_yang_lolos_cek_role() {
        assert!(roster(ROLE_SUPER_ADMIN).is_super_admin());
        assert!(!roster(ROLE_ADMIN).is_super_admin());
    }
}
