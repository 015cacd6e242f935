//! The frame-by-frame playback state machine, free of any rendering or scheduling.

use geo_types::Point;

use crate::{
    config::{PlaybackConfig, MIN_SEGMENT_STEPS},
    geo::interpolate,
    trip::Trip,
    trip_point::TripPoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// `step` is the frame within `segment`, from 0 up to the segment's step budget.
    Playing { segment: usize, step: u32 },
    Finished,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}

/// Seconds between two points, never less than `min_segment_secs`.
pub fn segment_duration_secs(from: &TripPoint, to: &TripPoint, config: &PlaybackConfig) -> f64 {
    let secs = match (from.timestamp, to.timestamp) {
        (Some(from), Some(to)) => (to - from).num_milliseconds() as f64 / 1000.0,
        _ => config.fallback_segment_secs,
    };

    let secs = if secs.is_finite() { secs } else { config.fallback_segment_secs };
    secs.max(config.min_segment_secs)
}

/// Frame budget of a segment lasting `secs`. Never below one step, whatever the config says.
pub fn segment_steps(secs: f64, config: &PlaybackConfig) -> f64 {
    (secs.max(config.min_segment_secs) * config.frames_per_second)
        .min(config.max_segment_steps)
        .max(MIN_SEGMENT_STEPS)
}

/// Step budget of every segment of one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    steps: Vec<f64>,
}

impl Timeline {
    pub fn new(trip: &Trip, config: &PlaybackConfig) -> Self {
        let steps = trip
            .segments()
            .map(|(from, to)| segment_steps(segment_duration_secs(from, to, config), config))
            .collect();

        Self { steps }
    }

    pub fn segment_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self, segment: usize) -> Option<f64> {
        self.steps.get(segment).copied()
    }

    /// Frames rendered for the whole trip, one per step 0..=steps of each segment.
    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|steps| steps.floor() as usize + 1).sum()
    }

    pub fn start(&self) -> PlaybackState {
        if self.steps.is_empty() {
            PlaybackState::Finished
        } else {
            PlaybackState::Playing { segment: 0, step: 0 }
        }
    }

    /// The state after rendering one frame of `state`.
    pub fn advance(&self, state: PlaybackState) -> PlaybackState {
        let PlaybackState::Playing { segment, step } = state else {
            return state;
        };

        let Some(steps) = self.steps(segment) else {
            return PlaybackState::Finished;
        };

        let step = step + 1;
        if f64::from(step) <= steps {
            PlaybackState::Playing { segment, step }
        } else if segment + 1 < self.steps.len() {
            PlaybackState::Playing {
                segment: segment + 1,
                step: 0,
            }
        } else {
            PlaybackState::Finished
        }
    }

    /// Where the marker is drawn for a playing state.
    pub fn position(&self, trip: &Trip, state: PlaybackState) -> Option<Point> {
        let PlaybackState::Playing { segment, step } = state else {
            return None;
        };

        let steps = self.steps(segment)?;
        let from = trip.points().get(segment)?;
        let to = trip.points().get(segment + 1)?;

        Some(interpolate(
            from.position(),
            to.position(),
            f64::from(step) / steps,
        ))
    }
}
