//! Core types for playback control

use cadence_audio::GraphConfig;
use serde::{Deserialize, Serialize};

/// Transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No live source
    #[default]
    Stopped,

    /// Live source attached, start instant recorded
    Playing,

    /// No live source, paused offset recorded
    Paused,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Advance to the next track when one finishes (default: true)
    pub autoplay: bool,

    /// Effect graph construction parameters
    pub graph: GraphConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            graph: GraphConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert!(config.autoplay);
        assert_eq!(config.graph.fft_size, 256);
        assert_eq!(config.graph.low_shelf_hz, 320.0);
        assert_eq!(config.graph.high_shelf_hz, 3200.0);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"autoplay": false, "graph": {"fft_size": 512}}"#).unwrap();
        assert!(!config.autoplay);
        assert_eq!(config.graph.fft_size, 512);
        assert_eq!(config.graph.curve_samples, 44_100);
    }

    #[test]
    fn status_defaults_to_stopped() {
        assert_eq!(PlaybackStatus::default(), PlaybackStatus::Stopped);
    }
}
