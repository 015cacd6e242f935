use geo_types::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::{
    config::FIT_PADDING,
    geo::bounding_rect,
    surface::{MapSurface, MarkerStyle},
    trip_point::{TripPoint, TripRecord},
};

/// A sampled pickup location in an area of elevated demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotzone {
    pub lat: f64,
    pub lon: f64,
}

impl Hotzone {
    pub fn position(&self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// The single point of a simulated trip, if the record carries a usable position.
    pub fn from_simulated(record: &TripRecord) -> Option<Self> {
        let point = TripPoint::try_from(record).ok()?;
        Some(Self {
            lat: point.latitude,
            lon: point.longitude,
        })
    }

    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

pub fn hotzone_marker_style() -> MarkerStyle {
    MarkerStyle {
        radius: 4.0,
        color: "rgb(0, 96, 255)".into(),
        weight: 1.0,
        opacity: 0.9,
        fill_opacity: 0.35,
    }
}

/// The hotzone points currently drawn on a surface.
pub struct HotzoneLayer<M: MapSurface> {
    group: Option<M::Group>,
    bounds: Option<Rect>,
    style: MarkerStyle,
    fit_padding: f64,
}

impl<M: MapSurface> Default for HotzoneLayer<M> {
    fn default() -> Self {
        Self::new(FIT_PADDING)
    }
}

impl<M: MapSurface> HotzoneLayer<M> {
    pub fn new(fit_padding: f64) -> Self {
        Self {
            group: None,
            bounds: None,
            style: hotzone_marker_style(),
            fit_padding,
        }
    }

    /// Replaces the drawn hotzones and fits the view to them.
    /// Returns false, leaving the map empty, when there is nothing valid to draw.
    pub fn show(&mut self, surface: &mut M, hotzones: &[Hotzone]) -> bool {
        self.clear(surface);

        let positions: Vec<Point> = hotzones
            .iter()
            .filter(|hotzone| hotzone.is_valid())
            .map(Hotzone::position)
            .collect();

        if positions.len() < hotzones.len() {
            tracing::warn!(
                dropped = hotzones.len() - positions.len(),
                "Skipped hotzones with invalid coordinates"
            );
        }

        let Some(bounds) = bounding_rect(positions.iter().copied()) else {
            return false;
        };

        let group = surface.create_group();
        for position in &positions {
            surface.add_marker(&group, *position, &self.style);
        }
        surface.fit_bounds(bounds, self.fit_padding);
        self.group = Some(group);
        self.bounds = Some(bounds);

        tracing::debug!(hotzones = positions.len(), "Showing hotzones");
        true
    }

    /// Fits the view to the drawn hotzones again. False when nothing is drawn.
    pub fn fit(&self, surface: &mut M) -> bool {
        match self.bounds {
            Some(bounds) => {
                surface.fit_bounds(bounds, self.fit_padding);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, surface: &mut M) {
        self.bounds = None;
        if let Some(group) = self.group.take() {
            surface.remove_group(group);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.group.is_some()
    }
}
