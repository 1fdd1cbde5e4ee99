use crate::prayer_times::{ValidationError, required};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mosque {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub address: String,
    pub district: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Mosque {
    /// Coordinates sent to the prayer-time provider. A missing (or zero) value
    /// is sent as `0`.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude.unwrap_or(0.0),
            longitude: self.longitude.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMosqueRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewMosqueRequest {
    pub fn into_mosque(self) -> Result<Mosque, ValidationError> {
        let name = required("name", self.name.as_deref())?.to_string();
        let address = required("address", self.address.as_deref())?.to_string();
        let city = required("city", self.city.as_deref())?.to_string();
        let country = required("country", self.country.as_deref())?.to_string();

        if let Some(lat) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(ValidationError::OutOfRange {
                field: "latitude",
                value: lat,
            });
        }
        if let Some(lng) = self.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(ValidationError::OutOfRange {
                field: "longitude",
                value: lng,
            });
        }

        Ok(Mosque {
            id: Uuid::now_v7().to_string(),
            name,
            phone: non_blank(self.phone),
            alternate_phone: non_blank(self.alternate_phone),
            address,
            district: non_blank(self.district),
            city,
            state: non_blank(self.state),
            country,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: Utc::now(),
        })
    }
}

/// Directory search. Both filters are case-insensitive substring matches, and
/// blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MosqueFilter {
    pub search: Option<String>,
    pub city: Option<String>,
}

impl MosqueFilter {
    pub fn new(search: Option<String>, city: Option<String>) -> Self {
        Self {
            search: non_blank(search),
            city: non_blank(city),
        }
    }

    pub fn matches(&self, mosque: &Mosque) -> bool {
        contains_ignore_case(&mosque.name, self.search.as_deref())
            && contains_ignore_case(&mosque.city, self.city.as_deref())
    }

    /// `ILIKE` pattern for the name filter.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(like_pattern)
    }

    /// `ILIKE` pattern for the city filter.
    pub fn city_pattern(&self) -> Option<String> {
        self.city.as_deref().map(like_pattern)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

// Matches `value` literally anywhere; `\` is the default LIKE escape.
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
