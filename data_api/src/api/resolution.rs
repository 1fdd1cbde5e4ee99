use crate::api::db::{MosqueDirectory, PrayerTimeStore, QueryError};
use async_trait::async_trait;
use shared::aladhan::{AladhanClient, ProviderError};
use shared::mosques::Coordinates;
use shared::prayer_times::{DailyTimings, ManualPrayerTimes, PrayerTimeRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[async_trait]
pub trait TimingsProvider: Send + Sync {
    async fn fetch_timings(
        &self,
        date: &str,
        coordinates: Coordinates,
    ) -> Result<DailyTimings, ProviderError>;
}

#[async_trait]
impl TimingsProvider for AladhanClient {
    async fn fetch_timings(
        &self,
        date: &str,
        coordinates: Coordinates,
    ) -> Result<DailyTimings, ProviderError> {
        AladhanClient::fetch_timings(self, date, coordinates).await
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("mosque {0} not found")]
    MosqueNotFound(String),
    #[error("prayer-time provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Resolves the prayer times for a mosque and date: a manual record wins, then a
/// previously cached fetch, then a fresh provider fetch which is cached.
#[derive(Clone)]
pub struct PrayerTimeService {
    store: Arc<dyn PrayerTimeStore>,
    mosques: Arc<dyn MosqueDirectory>,
    provider: Arc<dyn TimingsProvider>,
}

impl PrayerTimeService {
    pub fn new(
        store: Arc<dyn PrayerTimeStore>,
        mosques: Arc<dyn MosqueDirectory>,
        provider: Arc<dyn TimingsProvider>,
    ) -> Self {
        Self {
            store,
            mosques,
            provider,
        }
    }

    /// `date` is expected in `YYYY-MM-DD` form and is used verbatim as the store key
    /// and in the provider request. Cached records are never refreshed.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        mosque_id: &str,
        date: &str,
    ) -> Result<PrayerTimeRecord, ResolveError> {
        if let Some(manual) = self.store.find_prayer_times(mosque_id, date, true).await? {
            debug!(name: "prayer_times.resolved.manual", "resolved manual prayer times");
            return Ok(manual);
        }

        if let Some(cached) = self.store.find_prayer_times(mosque_id, date, false).await? {
            debug!(name: "prayer_times.resolved.cached", "resolved cached prayer times");
            return Ok(cached);
        }

        let mosque = self
            .mosques
            .find_mosque(mosque_id)
            .await?
            .ok_or_else(|| ResolveError::MosqueNotFound(mosque_id.to_string()))?;

        if mosque.latitude.is_none() || mosque.longitude.is_none() {
            warn!(name: "prayer_times.coordinates.missing", "mosque has no coordinates, requesting timings for 0,0");
        }

        let timings = self
            .provider
            .fetch_timings(date, mosque.coordinates())
            .await?;

        let fetched = PrayerTimeRecord::new(mosque_id, date, timings, false);
        let record = match self.store.insert_cached_if_absent(fetched.clone()).await? {
            Some(record) => record,
            None => {
                debug!(name: "prayer_times.cached.replaced", "cached record replaced by a manual submission");
                self.store
                    .find_prayer_times(mosque_id, date, true)
                    .await?
                    .unwrap_or(fetched)
            }
        };
        info!(name: "prayer_times.resolved.fetched", id = %record.id, "fetched and cached prayer times");

        Ok(record)
    }

    /// Unconditional overwrite: every record for the mosque and date is replaced.
    #[instrument(skip(self, manual), fields(mosque_id = %manual.mosque_id, date = %manual.date))]
    pub async fn set_manual(
        &self,
        manual: ManualPrayerTimes,
    ) -> Result<PrayerTimeRecord, QueryError> {
        let record = PrayerTimeRecord::new(manual.mosque_id, manual.date, manual.timings, true);
        let stored = self.store.replace_with_manual(record).await?;
        info!(name: "prayer_times.manual.stored", id = %stored.id, "stored manual prayer times");
        Ok(stored)
    }
}
