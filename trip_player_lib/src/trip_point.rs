use chrono::{DateTime, NaiveDateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One row as the trip data provider sends it. Every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the provider sent no timestamp or one we could not parse.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TripPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Some(timestamp),
        }
    }

    pub fn untimed(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: None,
        }
    }

    /// x is longitude, y is latitude.
    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    pub fn has_valid_position(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl TryFrom<&TripRecord> for TripPoint {
    type Error = &'static str;

    /// Fails only on missing or invalid coordinates. A bad timestamp yields an untimed point.
    fn try_from(record: &TripRecord) -> Result<Self, Self::Error> {
        let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) else {
            return Err("Trip record is missing coordinates");
        };

        let point = Self {
            latitude,
            longitude,
            timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
        };

        if !point.has_valid_position() {
            return Err("Trip record has out-of-range coordinates");
        }

        Ok(point)
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339, and the space separated variants pandas emits.
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Ok(timestamp) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(timestamp.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
