#[cfg(test)]
pub mod memory;
pub mod queries;

use async_trait::async_trait;
use shared::mosques::{Mosque, MosqueFilter};
use shared::prayer_times::PrayerTimeRecord;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Prayer-time records keyed by `(mosque_id, date, is_manual)`.
#[async_trait]
pub trait PrayerTimeStore: Send + Sync {
    async fn find_prayer_times(
        &self,
        mosque_id: &str,
        date: &str,
        is_manual: bool,
    ) -> Result<Option<PrayerTimeRecord>, QueryError>;

    /// Stores a provider-fetched record unless a cached record already exists for
    /// the same mosque and date. Returns whichever cached record ends up stored,
    /// or `None` if a manual replacement removed the existing one before it could
    /// be read back.
    async fn insert_cached_if_absent(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<Option<PrayerTimeRecord>, QueryError>;

    /// Deletes every record for the mosque and date, then stores `record` as the
    /// manual entry.
    async fn replace_with_manual(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<PrayerTimeRecord, QueryError>;
}

#[async_trait]
pub trait MosqueDirectory: Send + Sync {
    /// Mosques matching `filter`, ordered by name ignoring case.
    async fn list_mosques(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, QueryError>;

    async fn find_mosque(&self, id: &str) -> Result<Option<Mosque>, QueryError>;

    async fn insert_mosque(&self, mosque: Mosque) -> Result<Mosque, QueryError>;
}
