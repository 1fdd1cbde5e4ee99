use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use uuid::Uuid;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fajr => "fajr",
            Self::Dhuhr => "dhuhr",
            Self::Asr => "asr",
            Self::Maghrib => "maghrib",
            Self::Isha => "isha",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }
}

impl Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The five daily times exactly as entered or as returned by the provider,
/// e.g. `"04:12"` or `"04:12 (+03)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTimings {
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrayerTimeRecord {
    pub id: Uuid,
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

impl PrayerTimeRecord {
    pub fn new(
        mosque_id: impl Into<String>,
        date: impl Into<String>,
        timings: DailyTimings,
        is_manual: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            mosque_id: mosque_id.into(),
            date: date.into(),
            fajr: timings.fajr,
            dhuhr: timings.dhuhr,
            asr: timings.asr,
            maghrib: timings.maghrib,
            isha: timings.isha,
            is_manual,
            created_at: Utc::now(),
        }
    }

    pub fn time_for(&self, prayer: Prayer) -> &str {
        match prayer {
            Prayer::Fajr => &self.fajr,
            Prayer::Dhuhr => &self.dhuhr,
            Prayer::Asr => &self.asr,
            Prayer::Maghrib => &self.maghrib,
            Prayer::Isha => &self.isha,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("date must be in YYYY-MM-DD form, got {0:?}")]
    InvalidDate(String),
    #[error("{field} must start with HH:MM, got {value:?}")]
    InvalidTime { field: &'static str, value: String },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Parses a provider or admin time string. Anything after the first whitespace
/// (a zone annotation such as `(+03)`) is ignored.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let head = value.split_whitespace().next()?;
    NaiveTime::parse_from_str(head, TIME_FORMAT)
        .ok()
        // same padding rule as dates: "5:10" and "05:1" are rejected
        .filter(|t| t.format(TIME_FORMAT).to_string() == head)
}

/// Checks that `date` is a calendar date in `YYYY-MM-DD` form. The string itself
/// is what gets stored and sent upstream.
pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        // chrono accepts unpadded fields, the wire format does not
        .filter(|d| d.format(DATE_FORMAT).to_string() == date)
        .ok_or_else(|| ValidationError::InvalidDate(date.to_string()))
}

pub(crate) fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn required_time(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    if parse_time_of_day(value).is_none() {
        return Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Admin submission body for a manual override, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualPrayerTimesRequest {
    pub mosque_id: Option<String>,
    pub date: Option<String>,
    pub fajr: Option<String>,
    pub dhuhr: Option<String>,
    pub asr: Option<String>,
    pub maghrib: Option<String>,
    pub isha: Option<String>,
}

/// A validated manual override. Times are not checked for chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPrayerTimes {
    pub mosque_id: String,
    pub date: String,
    pub timings: DailyTimings,
}

impl TryFrom<ManualPrayerTimesRequest> for ManualPrayerTimes {
    type Error = ValidationError;

    fn try_from(req: ManualPrayerTimesRequest) -> Result<Self, Self::Error> {
        let mosque_id = required("mosque_id", req.mosque_id.as_deref())?.to_string();
        let date = required("date", req.date.as_deref())?.to_string();
        validate_date(&date)?;

        let timings = DailyTimings {
            fajr: required_time("fajr", req.fajr.as_deref())?,
            dhuhr: required_time("dhuhr", req.dhuhr.as_deref())?,
            asr: required_time("asr", req.asr.as_deref())?,
            maghrib: required_time("maghrib", req.maghrib.as_deref())?,
            isha: required_time("isha", req.isha.as_deref())?,
        };

        Ok(Self {
            mosque_id,
            date,
            timings,
        })
    }
}
