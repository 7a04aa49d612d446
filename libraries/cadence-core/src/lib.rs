//! Cadence Core
//!
//! Platform-agnostic track types, error handling and the traits implemented by
//! the collaborators the playback engine talks to.
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `Track`, `DownloadSource`
//! - **Collaborator Traits**: `LibraryStorage`, `DownloadService`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Track, TrackId};
//!
//! let track = Track::new("Night Drive.mp3", vec![0u8; 16]);
//! assert_eq!(track.id(), &TrackId::new("Night Drive.mp3"));
//! assert_eq!(track.title(), "Night Drive");
//! assert!(track.bytes().is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use traits::{DownloadService, LibraryStorage};
pub use types::{DownloadSource, Track, TrackId};
