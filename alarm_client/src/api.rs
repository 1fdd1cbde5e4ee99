use chrono::NaiveDate;
use reqwest::{Client, Url};
use shared::prayer_times::{DATE_FORMAT, PrayerTimeRecord};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("prayer times request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Reads resolved prayer times from the data API.
pub struct PrayerTimesClient {
    http: Client,
    base_url: Url,
}

impl PrayerTimesClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a hierarchical url".to_string()));
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// `{base}/api/prayer-times/{mosque_id}?date=YYYY-MM-DD`, with the id
    /// percent-encoded as a single path segment.
    pub fn prayer_times_url(&self, mosque_id: &str, date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "prayer-times", mosque_id]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("date", &date.format(DATE_FORMAT).to_string());
        url
    }

    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        mosque_id: &str,
        date: NaiveDate,
    ) -> Result<PrayerTimeRecord, ClientError> {
        Ok(self
            .http
            .get(self.prayer_times_url(mosque_id, date))
            .send()
            .await?
            .error_for_status()?
            .json::<PrayerTimeRecord>()
            .await?)
    }
}
