//! In-memory store for exercising the service and routes without Postgres.

use crate::api::db::{MosqueDirectory, PrayerTimeStore, QueryError};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::mosques::{Mosque, MosqueFilter};
use shared::prayer_times::PrayerTimeRecord;
use std::sync::Arc;

#[derive(Default)]
struct Tables {
    prayer_times: Vec<PrayerTimeRecord>,
    mosques: Vec<Mosque>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn with_mosques(mosques: impl IntoIterator<Item = Mosque>) -> Self {
        let store = Self::default();
        store.tables.write().mosques.extend(mosques);
        store
    }

    pub fn seed_prayer_times(&self, record: PrayerTimeRecord) {
        self.tables.write().prayer_times.push(record);
    }

    pub fn prayer_times_for(&self, mosque_id: &str, date: &str) -> Vec<PrayerTimeRecord> {
        self.tables
            .read()
            .prayer_times
            .iter()
            .filter(|r| r.mosque_id == mosque_id && r.date == date)
            .cloned()
            .collect()
    }

    pub fn prayer_time_count(&self) -> usize {
        self.tables.read().prayer_times.len()
    }
}

#[async_trait]
impl PrayerTimeStore for MemoryStore {
    async fn find_prayer_times(
        &self,
        mosque_id: &str,
        date: &str,
        is_manual: bool,
    ) -> Result<Option<PrayerTimeRecord>, QueryError> {
        Ok(self
            .tables
            .read()
            .prayer_times
            .iter()
            .find(|r| r.mosque_id == mosque_id && r.date == date && r.is_manual == is_manual)
            .cloned())
    }

    async fn insert_cached_if_absent(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<Option<PrayerTimeRecord>, QueryError> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables
            .prayer_times
            .iter()
            .find(|r| r.mosque_id == record.mosque_id && r.date == record.date && !r.is_manual)
        {
            return Ok(Some(existing.clone()));
        }
        tables.prayer_times.push(record.clone());
        Ok(Some(record))
    }

    async fn replace_with_manual(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<PrayerTimeRecord, QueryError> {
        let mut tables = self.tables.write();
        tables
            .prayer_times
            .retain(|r| !(r.mosque_id == record.mosque_id && r.date == record.date));
        tables.prayer_times.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl MosqueDirectory for MemoryStore {
    async fn list_mosques(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, QueryError> {
        let mut mosques: Vec<Mosque> = self
            .tables
            .read()
            .mosques
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        mosques.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(mosques)
    }

    async fn find_mosque(&self, id: &str) -> Result<Option<Mosque>, QueryError> {
        Ok(self
            .tables
            .read()
            .mosques
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn insert_mosque(&self, mosque: Mosque) -> Result<Mosque, QueryError> {
        self.tables.write().mosques.push(mosque.clone());
        Ok(mosque)
    }
}
