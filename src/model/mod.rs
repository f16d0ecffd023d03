pub mod admin_user;
pub mod kategori;
pub mod kostum;
pub mod orders;
pub mod settings;
pub mod user;
