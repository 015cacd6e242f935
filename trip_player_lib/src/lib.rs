pub mod config;
pub mod geo;
pub mod hotzone;
pub mod playback;
pub mod player;
pub mod surface;
pub mod trip;
pub mod trip_point;

pub use config::PlaybackConfig;
pub use player::{PlayerError, TripPlayer};
pub use trip::Trip;
pub use trip_point::TripPoint;

/// A trip needs at least one segment to be animated.
pub const MIN_TRIP_POINTS: usize = 2;
