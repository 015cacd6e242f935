use chrono::TimeDelta;
use geo_types::{Point, Rect};
use serde::Deserialize;

use crate::{
    geo::{bounding_rect, haversine_distance},
    trip_point::{TripPoint, TripRecord},
};

/// The recorded points of one trip, always in chronological order.
///
/// Deserializes straight from the provider's JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<TripRecord>")]
pub struct Trip {
    points: Vec<TripPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripSummary {
    pub points: usize,
    pub duration: Option<TimeDelta>,
    pub distance_km: f64,
}

impl Trip {
    /// Sorts the points by timestamp.
    ///
    /// An untimed point sorts with the closest timed point before it in the input, right after
    /// it, so it keeps its place along the route. Untimed points at the very start stay first.
    pub fn new(points: Vec<TripPoint>) -> Self {
        let mut last_seen = None;
        let mut keyed: Vec<_> = points
            .into_iter()
            .map(|point| {
                if point.timestamp.is_some() {
                    last_seen = point.timestamp;
                }
                (last_seen, point)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);

        Self {
            points: keyed.into_iter().map(|(_, point)| point).collect(),
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TripRecord>) -> Self {
        let mut dropped = 0;
        let mut untimed = 0;

        let points = records
            .into_iter()
            .filter_map(|record| match TripPoint::try_from(record) {
                Ok(point) => {
                    if point.timestamp.is_none() {
                        untimed += 1;
                    }
                    Some(point)
                }
                Err(_) => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        if dropped > 0 {
            tracing::warn!(dropped, "Dropped trip records with missing or invalid coordinates");
        }
        if untimed > 0 {
            tracing::warn!(untimed, "Trip records without a usable timestamp, their segments use the fallback duration");
        }

        Self::new(points)
    }

    pub fn points(&self) -> &[TripPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TripPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TripPoint> {
        self.points.last()
    }

    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(TripPoint::position).collect()
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&TripPoint, &TripPoint)> {
        self.points.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn bounds(&self) -> Option<Rect> {
        bounding_rect(self.points.iter().map(TripPoint::position))
    }

    /// Time between the first and last timed point.
    pub fn duration(&self) -> Option<TimeDelta> {
        let mut timestamps = self.points.iter().filter_map(|p| p.timestamp);
        let first = timestamps.next()?;
        let last = timestamps.last().unwrap_or(first);
        Some(last - first)
    }

    pub fn distance_km(&self) -> f64 {
        self.segments()
            .map(|(a, b)| haversine_distance(a.position(), b.position()))
            .sum()
    }

    pub fn summary(&self) -> TripSummary {
        TripSummary {
            points: self.len(),
            duration: self.duration(),
            distance_km: self.distance_km(),
        }
    }
}

impl From<Vec<TripRecord>> for Trip {
    fn from(records: Vec<TripRecord>) -> Self {
        Self::from_records(&records)
    }
}

impl From<Vec<TripPoint>> for Trip {
    fn from(points: Vec<TripPoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[test]
    fn sorts_points_chronologically() {
        let trip = Trip::new(vec![
            TripPoint::new(3.0, 3.0, at(30)),
            TripPoint::new(1.0, 1.0, at(10)),
            TripPoint::new(2.0, 2.0, at(20)),
        ]);

        let lats: Vec<f64> = trip.points().iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn untimed_points_follow_their_timed_predecessor() {
        let trip = Trip::new(vec![
            TripPoint::untimed(9.0, 0.0),
            TripPoint::new(2.0, 0.0, at(20)),
            TripPoint::untimed(8.0, 0.0),
            TripPoint::new(1.0, 0.0, at(10)),
        ]);

        let lats: Vec<f64> = trip.points().iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![9.0, 1.0, 2.0, 8.0]);
    }

    #[test]
    fn untimed_point_mid_route_stays_in_place() {
        let trip = Trip::new(vec![
            TripPoint::new(1.0, 0.0, at(0)),
            TripPoint::untimed(2.0, 0.0),
            TripPoint::new(3.0, 0.0, at(2)),
            TripPoint::new(4.0, 0.0, at(3)),
        ]);

        let lats: Vec<f64> = trip.points().iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn deserializes_provider_payload() {
        let json = r#"[
            {"latitude": 43.25, "longitude": 76.95, "timestamp": "2024-03-01 08:00:20"},
            {"latitude": 43.24, "longitude": 76.94, "timestamp": "2024-03-01 08:00:10"},
            {"latitude": null, "longitude": 76.94, "timestamp": "2024-03-01 08:00:15"},
            {"latitude": 143.0, "longitude": 76.94, "timestamp": "2024-03-01 08:00:16"},
            {"latitude": 43.26, "longitude": 76.96}
        ]"#;

        let trip: Trip = serde_json::from_str(json).unwrap();

        assert_eq!(trip.len(), 3);
        assert_eq!(trip.points()[0], TripPoint::new(43.24, 76.94, at(10)));
        assert_eq!(trip.points()[1], TripPoint::new(43.25, 76.95, at(20)));
        assert_eq!(trip.points()[2], TripPoint::untimed(43.26, 76.96));
    }

    #[test]
    fn summary_of_trip() {
        let trip = Trip::new(vec![
            TripPoint::new(43.0, 76.0, at(0)),
            TripPoint::new(43.0, 76.01, at(60)),
            TripPoint::new(43.0, 76.02, at(3660)),
        ]);

        let summary = trip.summary();
        assert_eq!(summary.points, 3);
        assert_eq!(summary.duration, Some(TimeDelta::seconds(3660)));
        // 0.02 degrees of longitude at 43N is about 1.6 km
        assert!((1.5..1.7).contains(&summary.distance_km), "got {}", summary.distance_km);
    }

    #[test]
    fn duration_of_untimed_trip_is_unknown() {
        let trip = Trip::new(vec![TripPoint::untimed(1.0, 1.0), TripPoint::untimed(2.0, 2.0)]);
        assert_eq!(trip.duration(), None);
        assert_eq!(Trip::default().duration(), None);
    }

    #[test]
    fn bounds_cover_trip() {
        let trip = Trip::new(vec![
            TripPoint::new(43.2, 76.9, at(0)),
            TripPoint::new(43.3, 76.8, at(1)),
        ]);

        let bounds = trip.bounds().unwrap();
        assert_eq!(bounds.min().x, 76.8);
        assert_eq!(bounds.max().y, 43.3);
        assert!(Trip::default().bounds().is_none());
    }
}
