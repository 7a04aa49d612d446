//! Error types for playback control

use cadence_audio::AudioError;
use cadence_core::{CadenceError, TrackId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track bytes could not be turned into a playable buffer
    #[error("Decode error: {0}")]
    Decode(String),

    /// Track has no retrievable bytes
    #[error("File data missing: {0}")]
    MissingData(TrackId),

    /// Index outside the sequencer bounds
    ///
    /// Transport operations swallow this one; it only escapes from
    /// [`Sequencer::track`](crate::Sequencer::track).
    #[error("Index out of range: {0}")]
    IndexOutOfRange(usize),

    /// Seek requested with no decoded buffer held
    #[error("No buffer loaded")]
    NoBufferLoaded,

    /// Host audio error
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for CadenceError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::MissingData(id) => CadenceError::TrackNotFound(id),
            other => CadenceError::audio(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_visible_messages() {
        assert_eq!(
            PlaybackError::MissingData(TrackId::new("a.mp3")).to_string(),
            "File data missing: a.mp3"
        );
        assert_eq!(
            PlaybackError::Decode("bad header".into()).to_string(),
            "Decode error: bad header"
        );
    }

    #[test]
    fn converts_into_core_error() {
        let err: CadenceError = PlaybackError::MissingData(TrackId::new("a.mp3")).into();
        assert!(matches!(err, CadenceError::TrackNotFound(_)));

        let err: CadenceError = PlaybackError::NoBufferLoaded.into();
        assert!(matches!(err, CadenceError::Audio(_)));
    }
}
