//! Capabilities the player needs from its host: something to draw on, a way to get called
//! back once per displayed frame, and a place to put the skip button.

use geo_types::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// A map canvas. All points are x = longitude, y = latitude.
pub trait MapSurface {
    /// A set of layers that is added to and removed from the map as one.
    type Group;
    type Marker;
    type Path;

    /// Creates an empty group that is already shown on the map.
    fn create_group(&mut self) -> Self::Group;
    fn remove_group(&mut self, group: Self::Group);

    fn add_marker(&mut self, group: &Self::Group, at: Point, style: &MarkerStyle) -> Self::Marker;
    fn move_marker(&mut self, marker: &Self::Marker, to: Point);

    fn add_path(&mut self, group: &Self::Group, style: &PathStyle) -> Self::Path;
    fn extend_path(&mut self, path: &Self::Path, point: Point);
    fn set_path(&mut self, path: &Self::Path, points: &[Point]);

    /// Recenters the view on `bounds`, grown by `padding` times its size on every side.
    fn fit_bounds(&mut self, bounds: Rect, padding: f64);
}

/// Display synchronised callbacks, one per requested frame.
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self, callback: Box<dyn FnOnce()>) -> Self::Handle;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Hosts the single skip control of a playback.
pub trait SkipControlHost {
    /// Shows the control, replacing any control shown before.
    fn show_skip_control(&mut self, on_activate: Box<dyn Fn()>);
    fn hide_skip_control(&mut self);
}
