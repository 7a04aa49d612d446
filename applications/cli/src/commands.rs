//! Subcommand implementations
//!
//! Each returns what the binary prints so it can be tested without a terminal.

use anyhow::{Context, Result};
use cadence_audio::SymphoniaDecoder;
use cadence_core::{DownloadService, DownloadSource, LibraryStorage, TrackId};
use cadence_library::DirectoryLibrary;
use cadence_playback::Sequencer;
use std::fmt;
use tracing::info;

/// One line of `cadence list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Sequencer index (what `play` would use)
    pub index: usize,
    /// Track identifier
    pub id: TrackId,
    /// Size on disk, `None` if unreadable
    pub bytes: Option<usize>,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            Some(len) => write!(f, "{:>3}  {}  ({} KiB)", self.index, self.id.title(), len / 1024),
            None => write!(f, "{:>3}  {}  (file data missing)", self.index, self.id.title()),
        }
    }
}

/// List the library in play order, optionally filtered
pub async fn list<S>(storage: &S, filter: Option<&str>) -> Result<Vec<ListEntry>>
where
    S: LibraryStorage + ?Sized,
{
    let tracks = storage.list_tracks().await.context("listing library")?;
    let sequencer = Sequencer::from_tracks(tracks);

    let entries = sequencer
        .filter(filter.unwrap_or(""))
        .into_iter()
        .map(|(index, track)| ListEntry {
            index,
            id: track.id().clone(),
            bytes: track.bytes().map(<[u8]>::len),
        })
        .collect();
    Ok(entries)
}

/// Delete one track
pub async fn delete<S>(storage: &S, id: &str) -> Result<()>
where
    S: LibraryStorage + ?Sized,
{
    let id = TrackId::new(id);
    storage
        .delete_track(&id)
        .await
        .with_context(|| format!("deleting {id}"))?;
    info!(track = %id, "deleted");
    Ok(())
}

/// Download by search query, then return the new library size
pub async fn download<D, S>(
    downloader: &D,
    storage: &S,
    query: &str,
    source: DownloadSource,
) -> Result<usize>
where
    D: DownloadService + ?Sized,
    S: LibraryStorage + ?Sized,
{
    downloader
        .fetch_by_query(query, source)
        .await
        .with_context(|| format!("downloading {query:?} from {source}"))?;
    let tracks = storage.list_tracks().await.context("re-listing library")?;
    Ok(tracks.len())
}

/// Decoded properties of one track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReport {
    /// Track identifier
    pub id: TrackId,
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames per channel
    pub frames: usize,
}

impl fmt::Display for TrackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id.title())?;
        writeln!(f, "  duration:    {:.2} s", self.duration)?;
        writeln!(f, "  sample rate: {} Hz", self.sample_rate)?;
        write!(f, "  frames:      {}", self.frames)
    }
}

/// Decode a track through Symphonia and report its shape
pub async fn inspect(library: &DirectoryLibrary, id: &str) -> Result<TrackReport> {
    let id = TrackId::new(id);
    let path = library.track_path(&id)?;
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let decoded = SymphoniaDecoder::new()
        .decode_bytes(&bytes, None)
        .with_context(|| format!("decoding {id}"))?;

    Ok(TrackReport {
        id,
        duration: decoded.duration(),
        sample_rate: decoded.sample_rate,
        frames: decoded.frames(),
    })
}
