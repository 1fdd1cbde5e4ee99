use crate::api::db::{MosqueDirectory, PrayerTimeStore};
use crate::api::resolution::{PrayerTimeService, TimingsProvider};
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub prayer_times: PrayerTimeService,
    pub mosques: Arc<dyn MosqueDirectory>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PrayerTimeStore>,
        mosques: Arc<dyn MosqueDirectory>,
        provider: Arc<dyn TimingsProvider>,
    ) -> Self {
        Self {
            prayer_times: PrayerTimeService::new(store, mosques.clone(), provider),
            mosques,
        }
    }
}
