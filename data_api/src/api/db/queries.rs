use crate::api::db::{MosqueDirectory, PrayerTimeStore, QueryError};
use async_trait::async_trait;
use shared::mosques::{Mosque, MosqueFilter};
use shared::prayer_times::PrayerTimeRecord;
use sqlx::{Pool, Postgres};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrayerTimeStore for PgStore {
    #[instrument(skip(self))]
    async fn find_prayer_times(
        &self,
        mosque_id: &str,
        date: &str,
        is_manual: bool,
    ) -> Result<Option<PrayerTimeRecord>, QueryError> {
        let record = sqlx::query_as::<_, PrayerTimeRecord>(
            r"
            SELECT id, mosque_id, date, fajr, dhuhr, asr, maghrib, isha, is_manual, created_at
            FROM prayer_times
            WHERE mosque_id = $1 AND date = $2 AND is_manual = $3
            LIMIT 1
            ",
        )
        .bind(mosque_id)
        .bind(date)
        .bind(is_manual)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[instrument(skip(self, record), fields(mosque_id = %record.mosque_id, date = %record.date))]
    async fn insert_cached_if_absent(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<Option<PrayerTimeRecord>, QueryError> {
        let inserted = sqlx::query_as::<_, PrayerTimeRecord>(
            r"
            INSERT INTO prayer_times (id, mosque_id, date, fajr, dhuhr, asr, maghrib, isha, is_manual, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
            ON CONFLICT (mosque_id, date, is_manual) DO NOTHING
            RETURNING id, mosque_id, date, fajr, dhuhr, asr, maghrib, isha, is_manual, created_at
            ",
        )
        .bind(record.id)
        .bind(&record.mosque_id)
        .bind(&record.date)
        .bind(&record.fajr)
        .bind(&record.dhuhr)
        .bind(&record.asr)
        .bind(&record.maghrib)
        .bind(&record.isha)
        .bind(record.created_at)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_some() {
            return Ok(inserted);
        }

        // Lost the race to a concurrent fetch; the statement above cannot see the
        // winner's row, so re-read in a fresh snapshot. A manual submission may have
        // deleted it in between.
        debug!(name: "db.prayer_times.insert.conflict", "cached record already present");
        self.find_prayer_times(&record.mosque_id, &record.date, false)
            .await
    }

    #[instrument(skip(self, record), fields(mosque_id = %record.mosque_id, date = %record.date))]
    async fn replace_with_manual(
        &self,
        record: PrayerTimeRecord,
    ) -> Result<PrayerTimeRecord, QueryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM prayer_times WHERE mosque_id = $1 AND date = $2")
            .bind(&record.mosque_id)
            .bind(&record.date)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        debug!(name: "db.prayer_times.deleted", count = deleted, "deleted existing records");

        // The conflict arm only fires when another submission for the same key
        // commits between our delete and insert. Last write wins.
        let stored = sqlx::query_as::<_, PrayerTimeRecord>(
            r"
            INSERT INTO prayer_times (id, mosque_id, date, fajr, dhuhr, asr, maghrib, isha, is_manual, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
            ON CONFLICT (mosque_id, date, is_manual) DO UPDATE SET
                id = EXCLUDED.id,
                fajr = EXCLUDED.fajr,
                dhuhr = EXCLUDED.dhuhr,
                asr = EXCLUDED.asr,
                maghrib = EXCLUDED.maghrib,
                isha = EXCLUDED.isha,
                created_at = EXCLUDED.created_at
            RETURNING id, mosque_id, date, fajr, dhuhr, asr, maghrib, isha, is_manual, created_at
            ",
        )
        .bind(record.id)
        .bind(&record.mosque_id)
        .bind(&record.date)
        .bind(&record.fajr)
        .bind(&record.dhuhr)
        .bind(&record.asr)
        .bind(&record.maghrib)
        .bind(&record.isha)
        .bind(record.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }
}

#[async_trait]
impl MosqueDirectory for PgStore {
    #[instrument(skip(self))]
    async fn list_mosques(&self, filter: &MosqueFilter) -> Result<Vec<Mosque>, QueryError> {
        let mosques = sqlx::query_as::<_, Mosque>(
            r"
            SELECT id, name, phone, alternate_phone, address, district, city, state, country,
                   latitude, longitude, created_at
            FROM mosques
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
              AND ($2::TEXT IS NULL OR city ILIKE $2)
            ORDER BY lower(name), name
            ",
        )
        .bind(filter.search_pattern())
        .bind(filter.city_pattern())
        .fetch_all(&self.pool)
        .await?;

        Ok(mosques)
    }

    #[instrument(skip(self))]
    async fn find_mosque(&self, id: &str) -> Result<Option<Mosque>, QueryError> {
        let mosque = sqlx::query_as::<_, Mosque>(
            r"
            SELECT id, name, phone, alternate_phone, address, district, city, state, country,
                   latitude, longitude, created_at
            FROM mosques
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mosque)
    }

    #[instrument(skip(self, mosque), fields(id = %mosque.id))]
    async fn insert_mosque(&self, mosque: Mosque) -> Result<Mosque, QueryError> {
        let stored = sqlx::query_as::<_, Mosque>(
            r"
            INSERT INTO mosques (id, name, phone, alternate_phone, address, district, city, state,
                                 country, latitude, longitude, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, name, phone, alternate_phone, address, district, city, state, country,
                      latitude, longitude, created_at
            ",
        )
        .bind(&mosque.id)
        .bind(&mosque.name)
        .bind(&mosque.phone)
        .bind(&mosque.alternate_phone)
        .bind(&mosque.address)
        .bind(&mosque.district)
        .bind(&mosque.city)
        .bind(&mosque.state)
        .bind(&mosque.country)
        .bind(mosque.latitude)
        .bind(mosque.longitude)
        .bind(mosque.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
