/// Traits implemented by the collaborators around the playback engine
use crate::error::Result;
use crate::types::{DownloadSource, Track, TrackId};
use async_trait::async_trait;

/// Library storage service
///
/// Owns the stored tracks. The engine only ever sees the ordered listing it
/// returns and asks it to delete tracks; it never writes files itself.
#[async_trait]
pub trait LibraryStorage: Send + Sync {
    /// List every stored track with its raw bytes, sorted by identifier
    ///
    /// # Errors
    /// Returns an error if the library cannot be enumerated
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Delete a stored track
    ///
    /// # Errors
    /// Returns an error if the identifier is rejected or the file cannot be removed
    async fn delete_track(&self, id: &TrackId) -> Result<()>;
}

/// Download service
///
/// Resolves a free-text query against a remote catalogue and stores the result
/// in the library. Callers re-list the library afterwards.
#[async_trait]
pub trait DownloadService: Send + Sync {
    /// Fetch the best match for `query` from `source`
    ///
    /// # Errors
    /// Returns an error if the query is empty or the download fails
    async fn fetch_by_query(&self, query: &str, source: DownloadSource) -> Result<()>;
}
