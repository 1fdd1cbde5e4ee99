use crate::mosques::Coordinates;
use crate::prayer_times::DailyTimings;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "http://api.aladhan.com";
/// Islamic Society of North America.
pub const DEFAULT_METHOD: u8 = 2;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("timings deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct TimingsResponse {
    data: TimingsData,
}

#[derive(Deserialize)]
struct TimingsData {
    timings: Timings,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Timings {
    fajr: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

impl From<Timings> for DailyTimings {
    fn from(t: Timings) -> Self {
        Self {
            fajr: t.fajr,
            dhuhr: t.dhuhr,
            asr: t.asr,
            maghrib: t.maghrib,
            isha: t.isha,
        }
    }
}

/// Decodes a `/v1/timings` body. Keys other than the five prayers are ignored.
pub fn parse_timings(body: &str) -> Result<DailyTimings, serde_json::Error> {
    let resp: TimingsResponse = serde_json::from_str(body)?;
    Ok(resp.data.timings.into())
}

pub fn timings_url(base_url: &str, date: &str, coordinates: Coordinates, method: u8) -> String {
    format!(
        "{}/v1/timings/{date}?latitude={}&longitude={}&method={method}",
        base_url.trim_end_matches('/'),
        coordinates.latitude,
        coordinates.longitude,
    )
}

#[derive(Clone)]
pub struct AladhanClient {
    http: Client,
    base_url: String,
    method: u8,
}

impl AladhanClient {
    pub fn new(http: Client, base_url: impl Into<String>, method: u8) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            method,
        }
    }

    /// `date` is forwarded verbatim.
    #[instrument(skip(self))]
    pub async fn fetch_timings(
        &self,
        date: &str,
        coordinates: Coordinates,
    ) -> Result<DailyTimings, ProviderError> {
        let url = timings_url(&self.base_url, date, coordinates, self.method);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let timings = parse_timings(&body)?;
        debug!(name: "provider.timings.fetched", url = url, "fetched timings from provider");
        Ok(timings)
    }
}
