use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::mosques::Mosque;
use shared::prayer_times::PrayerTimeRecord;

#[derive(Serialize, specta::Type)]
pub struct ApiInfoResponse {
    pub message: String,
}

#[derive(Serialize, specta::Type)]
pub struct PrayerTimeResponse {
    pub id: String,
    pub mosque_id: String,
    pub date: String,
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PrayerTimeRecord> for PrayerTimeResponse {
    fn from(r: PrayerTimeRecord) -> Self {
        Self {
            id: r.id.to_string(),
            mosque_id: r.mosque_id,
            date: r.date,
            fajr: r.fajr,
            dhuhr: r.dhuhr,
            asr: r.asr,
            maghrib: r.maghrib,
            isha: r.isha,
            is_manual: r.is_manual,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, specta::Type)]
pub struct MosqueResponse {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub address: String,
    pub district: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<Mosque> for MosqueResponse {
    fn from(m: Mosque) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            alternate_phone: m.alternate_phone,
            address: m.address,
            district: m.district,
            city: m.city,
            state: m.state,
            country: m.country,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: m.created_at,
        }
    }
}
