/// Directory library - every `*.mp3` in one directory
use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use cadence_core::{LibraryStorage, Track, TrackId};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// File extension of listed tracks
pub const TRACK_EXTENSION: &str = ".mp3";

/// Reject identifiers that are not a plain `.mp3` file name
pub fn validate_track_id(id: &str) -> Result<()> {
    let plain = !id.contains('/') && !id.contains('\\') && !id.contains("..");
    if plain && id.len() > TRACK_EXTENSION.len() && id.ends_with(TRACK_EXTENSION) {
        Ok(())
    } else {
        Err(LibraryError::InvalidTrackId(id.to_string()))
    }
}

/// Library storage over one flat directory
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    dir: PathBuf,
}

impl DirectoryLibrary {
    /// Library rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Library directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the library directory if it does not exist
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Path of a track file (identifier is validated)
    pub fn track_path(&self, id: &TrackId) -> Result<PathBuf> {
        validate_track_id(id.as_str())?;
        Ok(self.dir.join(id.as_str()))
    }

    /// Every `*.mp3` file, sorted by name, with its bytes
    ///
    /// Files that cannot be read are listed without bytes.
    pub async fn list(&self) -> Result<Vec<Track>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(TRACK_EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut tracks = Vec::with_capacity(names.len());
        for name in names {
            let track = match fs::read(self.dir.join(&name)).await {
                Ok(bytes) => Track::new(name, bytes),
                Err(e) => {
                    warn!(file = %name, error = %e, "could not read track, listing without data");
                    Track::without_data(name)
                }
            };
            tracks.push(track);
        }

        debug!(dir = %self.dir.display(), count = tracks.len(), "listed library");
        Ok(tracks)
    }

    /// Delete one track file
    pub async fn delete(&self, id: &TrackId) -> Result<()> {
        let path = self.track_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(track = %id, "deleted track");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LibraryError::NotFound(id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl LibraryStorage for DirectoryLibrary {
    async fn list_tracks(&self) -> cadence_core::Result<Vec<Track>> {
        Ok(self.list().await?)
    }

    async fn delete_track(&self, id: &TrackId) -> cadence_core::Result<()> {
        Ok(self.delete(id).await?)
    }
}
