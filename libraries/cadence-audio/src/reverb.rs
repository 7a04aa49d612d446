//! Synthetic reverb impulse responses

use rand::Rng;

/// Impulse length in seconds
pub const IMPULSE_SECONDS: f32 = 2.0;

/// Envelope decay exponent
pub const IMPULSE_DECAY: f32 = 2.0;

/// Stereo decaying-noise impulse response
///
/// Each sample is uniform noise in `[-1, 1)` scaled by `(1 - j / len)^decay`.
/// The envelope is deterministic, the noise is not; the two channels draw
/// independently so the tail decorrelates left from right.
#[derive(Debug, Clone)]
pub struct ReverbImpulse {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    decay: f32,
}

impl ReverbImpulse {
    /// Generate an impulse using the thread-local RNG
    pub fn generate(sample_rate: u32, seconds: f32, decay: f32) -> Self {
        Self::generate_with_rng(&mut rand::thread_rng(), sample_rate, seconds, decay)
    }

    /// Generate an impulse from an explicit RNG
    pub fn generate_with_rng<R: Rng>(
        rng: &mut R,
        sample_rate: u32,
        seconds: f32,
        decay: f32,
    ) -> Self {
        let len = (f64::from(seconds) * f64::from(sample_rate)) as usize;

        let channels = (0..2)
            .map(|_| {
                (0..len)
                    .map(|j| rng.gen_range(-1.0f32..1.0) * envelope(j, len, decay))
                    .collect()
            })
            .collect();

        Self {
            channels,
            sample_rate,
            decay,
        }
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the impulse is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-channel samples (always two channels)
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Sample rate the impulse was generated for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Envelope value at sample `j`
    pub fn envelope_at(&self, j: usize) -> f32 {
        envelope(j, self.len(), self.decay)
    }
}

fn envelope(j: usize, len: usize, decay: f32) -> f32 {
    if len == 0 {
        return 0.0;
    }
    (1.0 - j as f32 / len as f32).powf(decay)
}
