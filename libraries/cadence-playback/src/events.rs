//! Playback Events
//!
//! Event-based communication for UI synchronization. Transport operations
//! queue events; the UI drains them after each call:
//! - Status changes (only when a whole operation changes the status)
//! - Track changes
//! - Natural track completion
//! - User-visible errors
//! - Library refreshes

use crate::types::PlaybackStatus;
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Status differs from what it was before the operation
    StateChanged {
        /// The new status
        state: PlaybackStatus,
    },

    /// A different track's buffer was installed
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previously loaded track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track played to its end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Decode or missing-data failure
    Error {
        /// User-visible message
        message: String,
    },

    /// Track list replaced from library storage
    LibraryChanged {
        /// New list length
        length: usize,
    },
}
