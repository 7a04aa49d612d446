//! Host audio runtime seam
//!
//! The engine issues graph-construction and parameter calls; the host owns the
//! sample-accurate evaluation. Browsers, desktop renderers and test doubles all
//! sit behind [`AudioHost`].

use crate::distortion::DistortionCurve;
use crate::error::Result;

/// Opaque handle to a processing node owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a host-assigned raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host id
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of a host-owned sample buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    /// Wrap a host-assigned raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host id
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to a decoded (or synthesized) buffer held by the host
#[derive(Debug, Clone, PartialEq)]
pub struct BufferHandle {
    id: BufferId,
    duration: f64,
    sample_rate: u32,
    channels: u16,
}

impl BufferHandle {
    /// Describe a host buffer
    pub fn new(id: BufferId, duration: f64, sample_rate: u32, channels: u16) -> Self {
        Self {
            id,
            duration,
            sample_rate,
            channels,
        }
    }

    /// Buffer identity
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Frames per channel
    pub fn frames(&self) -> u64 {
        (self.duration * f64::from(self.sample_rate)).round() as u64
    }
}

/// Shelving filter flavour for the tone stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Boosts/cuts below the corner frequency
    LowShelf,
    /// Boosts/cuts above the corner frequency
    HighShelf,
}

/// Numeric parameters the engine reads and writes on host nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioParam {
    /// Linear gain (gain stages) or shelf gain in dB (biquad stages)
    Gain,
    /// Playout speed multiplier on a source
    PlaybackRate,
    /// Corner frequency in Hz (biquad stages)
    Frequency,
}

/// Operations the engine requires from the host audio runtime
///
/// Calls are issued from a single thread of control. The host may render on
/// its own real-time thread; nothing here blocks on it.
pub trait AudioHost {
    /// Output sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Monotonic audio clock in seconds
    fn now(&self) -> f64;

    /// Decode a complete encoded file into a playable buffer
    ///
    /// # Errors
    /// Returns `AudioError::Decode` when the bytes are not playable audio
    fn decode(&mut self, bytes: &[u8]) -> Result<BufferHandle>;

    /// Create a buffer from raw per-channel samples
    fn create_buffer(&mut self, channels: &[Vec<f32>], sample_rate: u32) -> BufferHandle;

    /// Create a one-shot source node playing `buffer`
    fn create_source(&mut self, buffer: &BufferHandle) -> NodeId;

    /// Create a gain stage (gain defaults to 1.0)
    fn create_gain(&mut self) -> NodeId;

    /// Create a waveshaper stage
    fn create_wave_shaper(&mut self) -> NodeId;

    /// Create a biquad shelving stage
    fn create_biquad(&mut self, kind: FilterKind) -> NodeId;

    /// Create a convolution stage
    fn create_convolver(&mut self) -> NodeId;

    /// Create a spectrum analyser exposing `fft_size / 2` frequency bins
    fn create_analyser(&mut self, fft_size: usize) -> NodeId;

    /// Route the output of `from` into `to`
    fn connect(&mut self, from: NodeId, to: NodeId);

    /// Route the output of `from` into the master output
    fn connect_to_destination(&mut self, from: NodeId);

    /// Remove every outgoing connection of `node`
    fn disconnect(&mut self, node: NodeId);

    /// Start a source `offset` seconds into its buffer
    fn start_source(&mut self, node: NodeId, offset: f64);

    /// Stop a source without raising its end-of-track signal
    fn stop_source(&mut self, node: NodeId);

    /// Set a numeric parameter
    fn set_param(&mut self, node: NodeId, param: AudioParam, value: f32);

    /// Read a numeric parameter, `None` if the node does not expose it
    fn param(&self, node: NodeId, param: AudioParam) -> Option<f32>;

    /// Install a transfer curve on a waveshaper
    fn set_curve(&mut self, node: NodeId, curve: &DistortionCurve);

    /// Install an impulse response on a convolver
    fn set_convolver_buffer(&mut self, node: NodeId, buffer: &BufferHandle);

    /// Copy the analyser's current byte-scaled bin magnitudes into `out`
    fn frequency_data(&self, node: NodeId, out: &mut [u8]);
}
