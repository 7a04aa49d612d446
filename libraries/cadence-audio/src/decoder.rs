/// In-memory audio decoding using Symphonia
use crate::error::{AudioError, Result};
use std::io::Cursor;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// ITU-R BS.775-1 coefficient for center and surround channels (-3dB)
const CENTER_MIX: f32 = 0.707;

/// Fully decoded track
///
/// Samples are interleaved stereo f32 in [-1.0, 1.0] regardless of the
/// source channel layout.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved stereo samples (L, R, L, R, ...)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of `samples` (always 2)
    pub channels: u16,
}

impl DecodedAudio {
    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Split into per-channel vectors
    pub fn deinterleave(&self) -> Vec<Vec<f32>> {
        let channels = usize::from(self.channels.max(1));
        let mut out = vec![Vec::with_capacity(self.frames()); channels];
        for frame in self.samples.chunks_exact(channels) {
            for (channel, sample) in out.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }
        out
    }
}

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG/Vorbis, WAV, AAC/MP4. Hosts use it to back
/// [`crate::AudioHost::decode`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode a complete encoded file held in memory
    ///
    /// `extension` (e.g. `"mp3"`) is a probe hint only; detection still
    /// works without it.
    ///
    /// # Errors
    /// Returns `AudioError::Decode` for empty or unrecognised data and
    /// `AudioError::Symphonia` for container/codec failures mid-stream.
    pub fn decode_bytes(&self, bytes: &[u8], extension: Option<&str>) -> Result<DecodedAudio> {
        if bytes.is_empty() {
            return Err(AudioError::Decode("no audio data".to_string()));
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Decode(format!("failed to probe data: {e}")))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| AudioError::Decode("no audio tracks found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Decode("unknown sample rate".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => return Err(AudioError::Symphonia(format!("error reading packet: {e}"))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => append_stereo(decoded, &mut samples),
                // Corrupt frames are skipped, matching how players treat damaged MP3s
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(error = %e, "skipping undecodable packet");
                }
                Err(e) => return Err(AudioError::Symphonia(format!("decode error: {e}"))),
            }
        }

        if samples.is_empty() {
            return Err(AudioError::Decode("stream contained no audio frames".to_string()));
        }

        let decoded = DecodedAudio {
            samples,
            sample_rate,
            channels: 2,
        };
        debug!(
            frames = decoded.frames(),
            sample_rate,
            duration = decoded.duration(),
            "decoded audio"
        );
        Ok(decoded)
    }
}

/// Convert a Symphonia buffer to interleaved stereo and append it
///
/// Signed integers use symmetric scaling (divide by 2^(N-1)); unsigned
/// formats are re-centred around zero.
fn append_stereo(decoded: AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => mix_to_stereo(&buf, out, |s| s.clamp(-1.0, 1.0)),
        AudioBufferRef::F64(buf) => mix_to_stereo(&buf, out, |s| (s as f32).clamp(-1.0, 1.0)),
        AudioBufferRef::S32(buf) => mix_to_stereo(&buf, out, |s| s as f32 / 2_147_483_648.0),
        AudioBufferRef::S24(buf) => mix_to_stereo(&buf, out, |s| s.inner() as f32 / 8_388_608.0),
        AudioBufferRef::S16(buf) => mix_to_stereo(&buf, out, |s| f32::from(s) / 32_768.0),
        AudioBufferRef::S8(buf) => mix_to_stereo(&buf, out, |s| f32::from(s) / 128.0),
        AudioBufferRef::U32(buf) => {
            mix_to_stereo(&buf, out, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }
        AudioBufferRef::U24(buf) => {
            mix_to_stereo(&buf, out, |s| (s.inner() as f32 / 16_777_215.0) * 2.0 - 1.0);
        }
        AudioBufferRef::U16(buf) => {
            mix_to_stereo(&buf, out, |s| (f32::from(s) / f32::from(u16::MAX)) * 2.0 - 1.0);
        }
        AudioBufferRef::U8(buf) => {
            mix_to_stereo(&buf, out, |s| (f32::from(s) / f32::from(u8::MAX)) * 2.0 - 1.0);
        }
    }
}

/// Downmix any channel layout to stereo
///
/// Mono is duplicated, stereo passes through, and every channel past the
/// front pair is folded into both sides at -3dB.
fn mix_to_stereo<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<f32>, normalize: F)
where
    T: Sample + Copy,
    F: Fn(T) -> f32,
{
    let frames = buf.frames();
    let channels = buf.spec().channels.count();
    out.reserve(frames * 2);

    match channels {
        0 => out.resize(out.len() + frames * 2, 0.0),
        1 => {
            for &s in &buf.chan(0)[..frames] {
                let v = normalize(s);
                out.push(v);
                out.push(v);
            }
        }
        _ => {
            let left = buf.chan(0);
            let right = buf.chan(1);
            for i in 0..frames {
                let extra: f32 = (2..channels)
                    .map(|c| normalize(buf.chan(c)[i]) * CENTER_MIX)
                    .sum();
                out.push((normalize(left[i]) + extra).clamp(-1.0, 1.0));
                out.push((normalize(right[i]) + extra).clamp(-1.0, 1.0));
            }
        }
    }
}
