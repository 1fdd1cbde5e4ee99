use crate::api::api_models::PrayerTimeResponse;
use crate::api::error::ApiError;
use crate::api::extractors::params::PrayerDate;
use crate::api::resolution::PrayerTimeService;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use shared::prayer_times::{ManualPrayerTimes, ManualPrayerTimesRequest};

/// Resolved prayer times for `mosque_id` on `?date=`. Fetches from the provider
/// and caches the result when nothing is stored yet.
pub async fn get_prayer_times(
    State(service): State<PrayerTimeService>,
    Path(mosque_id): Path<String>,
    PrayerDate(date): PrayerDate,
) -> Result<Json<PrayerTimeResponse>, ApiError> {
    let record = service.resolve(&mosque_id, &date).await?;
    Ok(Json(record.into()))
}

/// Replaces whatever is stored for the mosque and date with a manual record.
pub async fn set_manual_prayer_times(
    State(service): State<PrayerTimeService>,
    payload: Result<Json<ManualPrayerTimesRequest>, JsonRejection>,
) -> Result<Json<PrayerTimeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let manual = ManualPrayerTimes::try_from(request)?;
    let record = service.set_manual(manual).await?;
    Ok(Json(record.into()))
}
