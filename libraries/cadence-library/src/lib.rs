//! Cadence - Library Storage and Downloads
//!
//! File-system implementations of the collaborator traits in `cadence-core`:
//! - [`DirectoryLibrary`]: every `*.mp3` in one directory, read eagerly
//! - [`YtDlpDownloader`]: search-and-extract through the `yt-dlp` CLI
//!
//! After a successful download the caller re-lists the library.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod downloader;
mod error;

pub use directory::{validate_track_id, DirectoryLibrary, TRACK_EXTENSION};
pub use downloader::YtDlpDownloader;
pub use error::{LibraryError, Result};
