//! Cadence Audio
//!
//! Everything the playback engine needs from the audio side, without doing any
//! sample-level rendering itself:
//! - A host runtime seam (`AudioHost`): decoding, node construction, wiring,
//!   parameters, a monotonic clock and spectrum reads
//! - Byte decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC)
//! - The distortion transfer-curve generator and the reverb impulse generator
//! - The fixed-topology effect graph with its hot-swappable source slot
//!
//! # Example: Generators
//!
//! ```rust
//! use cadence_audio::{DistortionCurve, ReverbImpulse, CURVE_SAMPLES};
//!
//! let curve = DistortionCurve::generate(0.4);
//! assert_eq!(curve.len(), CURVE_SAMPLES);
//!
//! let impulse = ReverbImpulse::generate(8_000, 2.0, 2.0);
//! assert_eq!(impulse.len(), 16_000);
//! assert_eq!(impulse.channels().len(), 2);
//! ```
//!
//! # Example: Wiring a graph
//!
//! ```rust,ignore
//! use cadence_audio::{EffectGraph, GraphConfig};
//!
//! let mut graph = EffectGraph::new(&mut host, GraphConfig::default());
//! let buffer = host.decode(&bytes)?;
//! graph.attach_source(&mut host, &buffer, 0.0);
//! graph.set_reverb_mix(&mut host, 0.5);
//! ```

mod decoder;
mod distortion;
mod error;
mod graph;
mod host;
mod reverb;
mod spectrum;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use decoder::{DecodedAudio, SymphoniaDecoder};
pub use distortion::{DistortionCurve, CURVE_SAMPLES};
pub use error::{AudioError, Result};
pub use graph::{reverb_mix_gains, EffectGraph, EffectSettings, GraphConfig, StageNodes};
pub use host::{AudioHost, AudioParam, BufferHandle, BufferId, FilterKind, NodeId};
pub use reverb::{ReverbImpulse, IMPULSE_DECAY, IMPULSE_SECONDS};
pub use spectrum::SpectrumSnapshot;
