//! Fixed-topology effect graph
//!
//! ```text
//! source ─▶ gain ─▶ distortion ─▶ low shelf ─▶ high shelf ─▶ analyser ─┬─▶ dry ───────────▶ out
//!                                                                       └─▶ wet ─▶ reverb ─▶ out
//! ```
//!
//! Every stage after the source is created and wired once. Only the source
//! edge is swapped, on every play and seek.

use crate::distortion::DistortionCurve;
use crate::host::{AudioHost, AudioParam, BufferHandle, FilterKind, NodeId};
use crate::reverb::{ReverbImpulse, IMPULSE_DECAY, IMPULSE_SECONDS};
use crate::spectrum::SpectrumSnapshot;
use crate::CURVE_SAMPLES;
use serde::{Deserialize, Serialize};
use tracing::debug;

const RATE_MIN: f32 = 0.5;
const RATE_MAX: f32 = 2.0;
const TONE_DB_LIMIT: f32 = 20.0;

/// Live effect parameters
///
/// Independent of the loaded track; survives track switches and only returns
/// to defaults through [`EffectGraph::reset_effects`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Output volume on the gain stage, [0, 1]
    pub volume: f32,
    /// Playback rate multiplier, [0.5, 2.0]
    pub rate: f32,
    /// Reverb mix, [0, 1]
    pub reverb_mix: f32,
    /// Distortion amount, [0, 1]
    pub distortion: f32,
    /// Low shelf gain in dB, [-20, 20]
    pub low_gain_db: f32,
    /// High shelf gain in dB, [-20, 20]
    pub high_gain_db: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
            reverb_mix: 0.0,
            distortion: 0.0,
            low_gain_db: 0.0,
            high_gain_db: 0.0,
        }
    }
}

impl EffectSettings {
    /// Clamp every field into its domain (NaN falls back to the default)
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            volume: clamp_or(self.volume, 0.0, 1.0, d.volume),
            rate: clamp_or(self.rate, RATE_MIN, RATE_MAX, d.rate),
            reverb_mix: clamp_or(self.reverb_mix, 0.0, 1.0, d.reverb_mix),
            distortion: clamp_or(self.distortion, 0.0, 1.0, d.distortion),
            low_gain_db: clamp_or(self.low_gain_db, -TONE_DB_LIMIT, TONE_DB_LIMIT, d.low_gain_db),
            high_gain_db: clamp_or(self.high_gain_db, -TONE_DB_LIMIT, TONE_DB_LIMIT, d.high_gain_db),
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Dry and wet gains for a reverb mix
///
/// `dry = 1 - mix²`, `wet = mix`. Not an equal-power crossfade: at 0.5 the
/// sum is 1.25.
pub fn reverb_mix_gains(mix: f32) -> (f32, f32) {
    (1.0 - mix * mix, mix)
}

/// Static graph configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Low shelf corner frequency (Hz)
    pub low_shelf_hz: f32,
    /// High shelf corner frequency (Hz)
    pub high_shelf_hz: f32,
    /// Analyser FFT size; the spectrum exposes half as many bins
    pub fft_size: usize,
    /// Reverb impulse length (seconds)
    pub reverb_seconds: f32,
    /// Reverb envelope decay exponent
    pub reverb_decay: f32,
    /// Waveshaper table length
    pub curve_samples: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            low_shelf_hz: 320.0,
            high_shelf_hz: 3200.0,
            fft_size: 256,
            reverb_seconds: IMPULSE_SECONDS,
            reverb_decay: IMPULSE_DECAY,
            curve_samples: CURVE_SAMPLES,
        }
    }
}

/// Host handles for every persistent stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageNodes {
    /// Volume gain
    pub gain: NodeId,
    /// Waveshaper
    pub distortion: NodeId,
    /// Low shelving filter
    pub low_shelf: NodeId,
    /// High shelving filter
    pub high_shelf: NodeId,
    /// Spectrum tap
    pub analyser: NodeId,
    /// Dry path gain
    pub dry: NodeId,
    /// Wet path gain
    pub wet: NodeId,
    /// Convolution reverb
    pub reverb: NodeId,
}

/// The effect graph: persistent stages plus one replaceable source slot
#[derive(Debug)]
pub struct EffectGraph {
    config: GraphConfig,
    stages: StageNodes,
    settings: EffectSettings,
    curve: DistortionCurve,
    source: Option<NodeId>,
    impulse: Option<BufferHandle>,
}

impl EffectGraph {
    /// Create every stage, wire the constant topology and apply default settings
    pub fn new<H: AudioHost + ?Sized>(host: &mut H, config: GraphConfig) -> Self {
        let stages = StageNodes {
            gain: host.create_gain(),
            distortion: host.create_wave_shaper(),
            low_shelf: host.create_biquad(FilterKind::LowShelf),
            high_shelf: host.create_biquad(FilterKind::HighShelf),
            analyser: host.create_analyser(config.fft_size),
            dry: host.create_gain(),
            wet: host.create_gain(),
            reverb: host.create_convolver(),
        };

        host.set_param(stages.low_shelf, AudioParam::Frequency, config.low_shelf_hz);
        host.set_param(stages.high_shelf, AudioParam::Frequency, config.high_shelf_hz);

        host.connect(stages.gain, stages.distortion);
        host.connect(stages.distortion, stages.low_shelf);
        host.connect(stages.low_shelf, stages.high_shelf);
        host.connect(stages.high_shelf, stages.analyser);

        host.connect(stages.analyser, stages.dry);
        host.connect_to_destination(stages.dry);

        host.connect(stages.analyser, stages.wet);
        host.connect(stages.wet, stages.reverb);
        host.connect_to_destination(stages.reverb);

        let curve = DistortionCurve::with_len(0.0, config.curve_samples);
        let mut graph = Self {
            config,
            stages,
            settings: EffectSettings::default(),
            curve,
            source: None,
            impulse: None,
        };
        graph.apply_settings(host);
        graph
    }

    /// Graph configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Persistent stage handles
    pub fn stages(&self) -> &StageNodes {
        &self.stages
    }

    /// Current effect parameters
    pub fn settings(&self) -> EffectSettings {
        self.settings
    }

    /// Installed waveshaper curve
    pub fn curve(&self) -> &DistortionCurve {
        &self.curve
    }

    /// Live source node, if any
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    /// Cached reverb impulse buffer (created on first attach)
    pub fn impulse(&self) -> Option<&BufferHandle> {
        self.impulse.as_ref()
    }

    /// Number of spectrum bins the analyser exposes
    pub fn bin_count(&self) -> usize {
        self.config.fft_size / 2
    }

    /// Create a source for `buffer`, wire it into the gain stage and start it
    /// `offset` seconds in
    ///
    /// A source that is still attached is torn down (stopped and
    /// disconnected) before the new one is wired, so two sources never feed
    /// the output together.
    pub fn attach_source<H: AudioHost + ?Sized>(
        &mut self,
        host: &mut H,
        buffer: &BufferHandle,
        offset: f64,
    ) -> NodeId {
        if let Some(stale) = self.source.take() {
            Self::teardown(host, stale);
        }
        self.ensure_impulse(host);

        let node = host.create_source(buffer);
        host.set_param(node, AudioParam::PlaybackRate, self.settings.rate);
        host.connect(node, self.stages.gain);
        host.start_source(node, offset);
        self.source = Some(node);

        debug!(source = node.raw(), offset, rate = self.settings.rate, "source attached");
        node
    }

    /// Stop and disconnect the live source, returning it
    pub fn detach_source<H: AudioHost + ?Sized>(&mut self, host: &mut H) -> Option<NodeId> {
        let node = self.source.take()?;
        Self::teardown(host, node);
        debug!(source = node.raw(), "source detached");
        Some(node)
    }

    fn teardown<H: AudioHost + ?Sized>(host: &mut H, node: NodeId) {
        host.stop_source(node);
        host.disconnect(node);
    }

    fn ensure_impulse<H: AudioHost + ?Sized>(&mut self, host: &mut H) {
        if self.impulse.is_some() {
            return;
        }
        let impulse = ReverbImpulse::generate(
            host.sample_rate(),
            self.config.reverb_seconds,
            self.config.reverb_decay,
        );
        let handle = host.create_buffer(impulse.channels(), impulse.sample_rate());
        host.set_convolver_buffer(self.stages.reverb, &handle);
        debug!(frames = impulse.len(), "reverb impulse generated");
        self.impulse = Some(handle);
    }

    /// Set the volume on the gain stage
    pub fn set_volume<H: AudioHost + ?Sized>(&mut self, host: &mut H, volume: f32) {
        self.settings.volume = clamp_or(volume, 0.0, 1.0, self.settings.volume);
        host.set_param(self.stages.gain, AudioParam::Gain, self.settings.volume);
    }

    /// Set the playback rate (applies to the live source and every later one)
    pub fn set_rate<H: AudioHost + ?Sized>(&mut self, host: &mut H, rate: f32) {
        self.settings.rate = clamp_or(rate, RATE_MIN, RATE_MAX, self.settings.rate);
        if let Some(source) = self.source {
            host.set_param(source, AudioParam::PlaybackRate, self.settings.rate);
        }
    }

    /// Regenerate and install the waveshaper curve
    pub fn set_distortion<H: AudioHost + ?Sized>(&mut self, host: &mut H, amount: f32) {
        self.settings.distortion = clamp_or(amount, 0.0, 1.0, self.settings.distortion);
        self.curve = DistortionCurve::with_len(self.settings.distortion, self.config.curve_samples);
        host.set_curve(self.stages.distortion, &self.curve);
    }

    /// Set both shelf gains in dB
    pub fn set_tone_gains<H: AudioHost + ?Sized>(&mut self, host: &mut H, low_db: f32, high_db: f32) {
        self.settings.low_gain_db =
            clamp_or(low_db, -TONE_DB_LIMIT, TONE_DB_LIMIT, self.settings.low_gain_db);
        self.settings.high_gain_db =
            clamp_or(high_db, -TONE_DB_LIMIT, TONE_DB_LIMIT, self.settings.high_gain_db);
        host.set_param(self.stages.low_shelf, AudioParam::Gain, self.settings.low_gain_db);
        host.set_param(self.stages.high_shelf, AudioParam::Gain, self.settings.high_gain_db);
    }

    /// Set the dry/wet reverb balance
    pub fn set_reverb_mix<H: AudioHost + ?Sized>(&mut self, host: &mut H, mix: f32) {
        self.settings.reverb_mix = clamp_or(mix, 0.0, 1.0, self.settings.reverb_mix);
        let (dry, wet) = reverb_mix_gains(self.settings.reverb_mix);
        host.set_param(self.stages.dry, AudioParam::Gain, dry);
        host.set_param(self.stages.wet, AudioParam::Gain, wet);
    }

    /// Apply a whole settings block
    pub fn set_settings<H: AudioHost + ?Sized>(&mut self, host: &mut H, settings: EffectSettings) {
        self.settings = settings.clamped();
        self.apply_settings(host);
    }

    /// Restore every parameter to its default and re-apply the setters
    pub fn reset_effects<H: AudioHost + ?Sized>(&mut self, host: &mut H) {
        self.set_settings(host, EffectSettings::default());
    }

    fn apply_settings<H: AudioHost + ?Sized>(&mut self, host: &mut H) {
        let s = self.settings;
        self.set_volume(host, s.volume);
        self.set_reverb_mix(host, s.reverb_mix);
        self.set_distortion(host, s.distortion);
        self.set_rate(host, s.rate);
        self.set_tone_gains(host, s.low_gain_db, s.high_gain_db);
    }

    /// Read the spectrum tap
    pub fn spectrum<H: AudioHost + ?Sized>(&self, host: &H) -> SpectrumSnapshot {
        let mut bins = vec![0u8; self.bin_count()];
        host.frequency_data(self.stages.analyser, &mut bins);
        SpectrumSnapshot::new(bins)
    }
}
