//! Per-engine playback session state

use crate::types::PlaybackStatus;
use cadence_audio::BufferHandle;
use cadence_core::TrackId;

/// Mutable transport state owned by the controller
///
/// Created once and reset rather than destroyed. The current track index
/// lives in the [`Sequencer`](crate::Sequencer).
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub(crate) status: PlaybackStatus,
    pub(crate) buffer: Option<BufferHandle>,
    pub(crate) loaded: Option<TrackId>,
    pub(crate) start_instant: f64,
    pub(crate) paused_offset: f64,
    pub(crate) label: Option<String>,
    pub(crate) message: Option<String>,
}

impl PlaybackSession {
    /// Transport status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Decoded buffer of the current track
    pub fn buffer(&self) -> Option<&BufferHandle> {
        self.buffer.as_ref()
    }

    /// Track the held buffer was decoded from
    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded.as_ref()
    }

    /// Audio-clock time the current span began (meaningful while playing)
    pub fn start_instant(&self) -> f64 {
        self.start_instant
    }

    /// Seconds into the track at the last pause
    pub fn paused_offset(&self) -> f64 {
        self.paused_offset
    }

    /// Display label of the current track
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Last user-visible error
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Drop the buffer and every offset
    pub(crate) fn clear(&mut self) {
        self.buffer = None;
        self.loaded = None;
        self.start_instant = 0.0;
        self.paused_offset = 0.0;
        self.label = None;
    }
}
