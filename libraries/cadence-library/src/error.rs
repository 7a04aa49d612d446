/// Library and download errors
use cadence_core::{CadenceError, TrackId};
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Identifier is not a plain `.mp3` file name
    #[error("Invalid track id: {0}")]
    InvalidTrackId(String),

    /// No such track on disk
    #[error("Track not found: {0}")]
    NotFound(TrackId),

    /// Rejected caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Downloader failed; carries its combined output
    #[error("Download failed: {0}")]
    Download(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<LibraryError> for CadenceError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::InvalidTrackId(id) => {
                CadenceError::invalid_input(format!("invalid track id: {id}"))
            }
            LibraryError::NotFound(id) => CadenceError::TrackNotFound(id),
            LibraryError::InvalidInput(msg) => CadenceError::InvalidInput(msg),
            LibraryError::Download(msg) => CadenceError::Download(msg),
            LibraryError::Io(e) => CadenceError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_core_errors() {
        let err: CadenceError = LibraryError::NotFound(TrackId::new("a.mp3")).into();
        assert!(matches!(err, CadenceError::TrackNotFound(_)));

        let err: CadenceError = LibraryError::InvalidTrackId("../x.mp3".into()).into();
        assert!(matches!(err, CadenceError::InvalidInput(_)));

        let err: CadenceError = LibraryError::Download("exit 1".into()).into();
        assert_eq!(err.to_string(), "Download error: exit 1");
    }
}
