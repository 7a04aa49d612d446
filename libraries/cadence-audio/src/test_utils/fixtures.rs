//! In-memory audio fixtures

use std::f32::consts::PI;
use std::io::Cursor;

/// Encode a 440 Hz sine as a 16-bit PCM WAV file held in memory
///
/// # Panics
/// Panics if the in-memory writer fails, which only happens on invalid specs
pub fn wav_bytes(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let frames = (sample_rate as f32 * seconds) as usize;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("valid wav spec");
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = ((2.0 * PI * 440.0 * t).sin() * 0.5 * f32::from(i16::MAX)) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).expect("write sample");
            }
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Bytes that no decoder accepts
pub fn garbage_bytes(len: usize) -> Vec<u8> {
    vec![0x42; len]
}
