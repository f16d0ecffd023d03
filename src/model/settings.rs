use serde::{Deserialize, Serialize};

/// Pengaturan situs. Di database tetap tabel key/value datar, tapi ke
/// seluruh aplikasi dipetakan jadi record bertipe dengan field bernama.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pengaturan {
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub prosedur_sewa: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_description: String,
    #[serde(default)]
    pub facebook_url: String,
    #[serde(default)]
    pub instagram_url: String,
    #[serde(default)]
    pub google_maps_embed: String,
    #[serde(default)]
    pub google_maps_link: String,
    #[serde(default)]
    pub logo_url: String,
}

impl Pengaturan {
    /// Baris yang tidak ada di tabel terbaca sebagai string kosong.
    pub fn dari_baris<I>(baris: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut p = Pengaturan::default();
        for (key, value) in baris {
            match key.as_str() {
                "whatsapp_number" => p.whatsapp_number = value,
                "prosedur_sewa" => p.prosedur_sewa = value,
                "company_name" => p.company_name = value,
                "company_address" => p.company_address = value,
                "company_description" => p.company_description = value,
                "facebook_url" => p.facebook_url = value,
                "instagram_url" => p.instagram_url = value,
                "google_maps_embed" => p.google_maps_embed = value,
                "google_maps_link" => p.google_maps_link = value,
                "logo_url" => p.logo_url = value,
                // key asing dibiarkan, last-write-wins tetap di tabel
                _ => {}
            }
        }
        p
    }

    pub fn sebagai_baris(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("whatsapp_number", self.whatsapp_number.as_str()),
            ("prosedur_sewa", self.prosedur_sewa.as_str()),
            ("company_name", self.company_name.as_str()),
            ("company_address", self.company_address.as_str()),
            ("company_description", self.company_description.as_str()),
            ("facebook_url", self.facebook_url.as_str()),
            ("instagram_url", self.instagram_url.as_str()),
            ("google_maps_embed", self.google_maps_embed.as_str()),
            ("google_maps_link", self.google_maps_link.as_str()),
            ("logo_url", self.logo_url.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baris_kosong_jadi_default() {
        assert_eq!(Pengaturan::dari_baris(vec![]), Pengaturan::default());
    }

    #[test]
    fn pemetaan_bolak_balik() {
        let p = Pengaturan {
            whatsapp_number: "6281234567890".into(),
            company_name: "Roro Kostum".into(),
            logo_url: "/uploads/logo/logo.png".into(),
            ..Default::default()
        };
        let baris: Vec<(String, String)> = p
            .sebagai_baris()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(baris.len(), 10);
        assert_eq!(Pengaturan::dari_baris(baris), p);
    }

    #[test]
    fn key_asing_diabaikan() {
        let p = Pengaturan::dari_baris(vec![
            ("tema_warna".to_string(), "merah".to_string()),
            ("company_name".to_string(), "Roro Kostum".to_string()),
        ]);
        assert_eq!(p.company_name, "Roro Kostum");
        assert_eq!(p.whatsapp_number, "");
    }
}
