use crate::api::error::ErrorMessage;
use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;
use shared::mosques::MosqueFilter;
use shared::prayer_times::validate_date;

#[derive(Debug, Deserialize)]
struct RawDate {
    date: Option<String>,
}

/// `?date=YYYY-MM-DD` query parameter. The validated string is kept as sent.
#[derive(Debug, Clone)]
pub struct PrayerDate(pub String);

impl<S> FromRequestParts<S> for PrayerDate
where
    S: Send + Sync,
{
    type Rejection = ErrorMessage;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<RawDate>::from_request_parts(parts, state)
            .await
            .map_err(|e| ErrorMessage::from((StatusCode::BAD_REQUEST, e.body_text())))?;

        let Some(date) = params.date.filter(|d| !d.trim().is_empty()) else {
            return Err(ErrorMessage::from((
                StatusCode::BAD_REQUEST,
                "date query parameter is required",
            )));
        };

        validate_date(&date)
            .map_err(|e| ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())))?;

        Ok(Self(date))
    }
}

#[derive(Debug, Deserialize)]
struct RawMosqueQuery {
    search: Option<String>,
    city: Option<String>,
}

/// `?search=` (name) and `?city=` filters for the mosque directory.
#[derive(Debug, Clone)]
pub struct MosqueQuery(pub MosqueFilter);

impl<S> FromRequestParts<S> for MosqueQuery
where
    S: Send + Sync,
{
    type Rejection = ErrorMessage;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<RawMosqueQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ErrorMessage::from((StatusCode::BAD_REQUEST, e.body_text())))?;

        Ok(Self(MosqueFilter::new(params.search, params.city)))
    }
}
