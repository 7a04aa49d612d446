//! Cadence - Playback Control
//!
//! Platform-agnostic playback engine. The host audio runtime is supplied
//! through [`cadence_audio::AudioHost`]; everything here only issues graph
//! construction and parameter calls.
//!
//! This crate provides:
//! - Transport state machine (Stopped / Playing / Paused) with restart-based seek
//! - Clock-derived elapsed time and progress
//! - Sequencer with wraparound navigation and identity-based refresh
//! - Autoplay on natural track completion
//! - Split load API for hosts that decode off the control thread
//! - Per-frame visualizer sampling
//!
//! # Example
//!
//! ```rust
//! use cadence_audio::test_utils::{wav_bytes, RecordingHost};
//! use cadence_core::Track;
//! use cadence_playback::{PlaybackConfig, PlaybackController, PlaybackStatus};
//!
//! let mut controller =
//!     PlaybackController::new(RecordingHost::new(8_000), PlaybackConfig::default());
//! controller.refresh_tracks(vec![Track::new("song.mp3", wav_bytes(8_000, 2, 1.0))]);
//!
//! controller.toggle_play_pause().unwrap();
//! assert_eq!(controller.status(), PlaybackStatus::Playing);
//! assert_eq!(controller.label(), Some("song"));
//!
//! controller.host_mut().advance(0.5);
//! controller.pause();
//! assert_eq!(controller.elapsed(), 0.5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod error;
mod events;
mod sequencer;
mod session;
pub mod types;
mod visualizer;

// Public exports
pub use controller::{elapsed_seconds, LoadRequest, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use sequencer::{RefreshOutcome, Sequencer};
pub use session::PlaybackSession;
pub use types::{PlaybackConfig, PlaybackStatus};
pub use visualizer::{FrameRenderer, FrameSchedule, VisualFrame, VisualizerSampler};
