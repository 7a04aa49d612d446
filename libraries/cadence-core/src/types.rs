//! Track and download types shared across the workspace

use crate::error::CadenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// File extension stripped from identifiers when building display titles
const TRACK_EXTENSION: &str = ".mp3";

/// Unique, stable track identifier (a filename such as `"Song.mp3"`)
///
/// Ordering is lexicographic on the underlying string; the sequencer relies on
/// it as the stable sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display title: the identifier without its `.mp3` suffix
    pub fn title(&self) -> &str {
        self.0.strip_suffix(TRACK_EXTENSION).unwrap_or(&self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A stored track: identifier plus its raw encoded bytes
///
/// Immutable once listed. `bytes` is `None` when the library listed the
/// file but could not read it.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    bytes: Option<Arc<[u8]>>,
}

impl Track {
    /// Create a track with its encoded audio bytes
    pub fn new(id: impl Into<TrackId>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: id.into(),
            bytes: Some(bytes.into()),
        }
    }

    /// Create a track whose bytes could not be retrieved
    pub fn without_data(id: impl Into<TrackId>) -> Self {
        Self {
            id: id.into(),
            bytes: None,
        }
    }

    /// Track identifier
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Raw encoded bytes, if available
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Shared handle to the raw bytes, if available
    pub fn shared_bytes(&self) -> Option<Arc<[u8]>> {
        self.bytes.clone()
    }

    /// Display title
    pub fn title(&self) -> &str {
        self.id.title()
    }
}

/// Remote catalogue a download query is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DownloadSource {
    /// YouTube search
    #[serde(rename = "youtube")]
    YouTube,
    /// SoundCloud search
    #[serde(rename = "soundcloud")]
    SoundCloud,
}

impl DownloadSource {
    /// Search prefix understood by yt-dlp
    pub fn search_prefix(&self) -> &'static str {
        match self {
            DownloadSource::YouTube => "ytsearch",
            DownloadSource::SoundCloud => "scsearch",
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadSource::YouTube => "youtube",
            DownloadSource::SoundCloud => "soundcloud",
        }
    }
}

impl fmt::Display for DownloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadSource {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Ok(DownloadSource::YouTube),
            "soundcloud" | "sc" => Ok(DownloadSource::SoundCloud),
            other => Err(CadenceError::invalid_input(format!(
                "unknown download source: {other}"
            ))),
        }
    }
}
