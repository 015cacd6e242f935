use serde::{Deserialize, Serialize};

use crate::surface::{MarkerStyle, PathStyle};

pub const FRAMES_PER_SECOND: f64 = 5.0;
pub const MAX_SEGMENT_STEPS: f64 = 100.0;
pub const MIN_SEGMENT_STEPS: f64 = 1.0;
pub const MIN_SEGMENT_SECS: f64 = 1.0;
pub const FALLBACK_SEGMENT_SECS: f64 = 1.0;
pub const FIT_PADDING: f64 = 0.2;

/// Tuning of the trip animation and how it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frames per real second of a segment.
    pub frames_per_second: f64,
    /// No segment animates for more frames than this, whatever its real duration.
    pub max_segment_steps: f64,
    pub min_segment_secs: f64,
    /// Duration used for a segment when one of its timestamps is unknown.
    pub fallback_segment_secs: f64,
    pub fit_padding: f64,
    pub start_marker: MarkerStyle,
    pub end_marker: MarkerStyle,
    pub path: PathStyle,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frames_per_second: FRAMES_PER_SECOND,
            max_segment_steps: MAX_SEGMENT_STEPS,
            min_segment_secs: MIN_SEGMENT_SECS,
            fallback_segment_secs: FALLBACK_SEGMENT_SECS,
            fit_padding: FIT_PADDING,
            start_marker: MarkerStyle {
                radius: 6.0,
                color: "rgb(41, 138, 67)".into(),
                weight: 2.0,
                opacity: 1.0,
                fill_opacity: 0.9,
            },
            end_marker: MarkerStyle {
                radius: 6.0,
                color: "rgb(217, 83, 79)".into(),
                weight: 2.0,
                opacity: 1.0,
                fill_opacity: 0.9,
            },
            path: PathStyle {
                color: "rgb(0, 96, 255)".into(),
                weight: 4.0,
                opacity: 0.8,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"frames_per_second": 10.0, "fit_padding": 0.1}"#).unwrap();

        assert_eq!(config.frames_per_second, 10.0);
        assert_eq!(config.fit_padding, 0.1);
        assert_eq!(config.max_segment_steps, MAX_SEGMENT_STEPS);
        assert_eq!(config.path, PlaybackConfig::default().path);
    }
}
