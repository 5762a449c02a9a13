//! Interleaved PCM to mono 16-bit block conversion
//!
//! The FFT consumes exactly one block of mono `i16` samples. Hosts hand us
//! interleaved frames, either as floats in `[-1, 1]` or as 16-bit integers.
//! Only the first two channels contribute; any further channels are skipped.

use crate::error::{FftError, Result};
use crate::spectrum::FFT_BUFFER_SIZE;

/// Quantize a float sample in `[-1, 1]` to 16-bit, clamping out-of-range input
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Downmix one block of interleaved float PCM into `mono`
///
/// # Arguments
/// * `data` - Interleaved samples, at least `FFT_BUFFER_SIZE * channels` long
/// * `channels` - Number of interleaved channels
/// * `mono` - Destination block
pub fn downmix_f32(data: &[f32], channels: usize, mono: &mut [i16; FFT_BUFFER_SIZE]) -> Result<()> {
    check_frames(data.len(), channels)?;

    for (out, frame) in mono.iter_mut().zip(data.chunks_exact(channels)) {
        *out = mix_frame(frame);
    }

    Ok(())
}

/// Mix one interleaved float frame down to a single 16-bit sample
///
/// An empty frame mixes to silence.
pub fn mix_frame(frame: &[f32]) -> i16 {
    let value = match frame {
        [only] => *only,
        [left, right, ..] => (left + right) / 2.0,
        [] => 0.0,
    };
    quantize(value)
}

/// Downmix one block of interleaved 16-bit PCM into `mono`
pub fn downmix_i16(data: &[i16], channels: usize, mono: &mut [i16; FFT_BUFFER_SIZE]) -> Result<()> {
    check_frames(data.len(), channels)?;

    for (out, frame) in mono.iter_mut().zip(data.chunks_exact(channels)) {
        *out = if channels == 1 {
            frame[0]
        } else {
            // Mean of two i16 values always fits
            ((frame[0] as i32 + frame[1] as i32) / 2) as i16
        };
    }

    Ok(())
}

fn check_frames(len: usize, channels: usize) -> Result<()> {
    if channels == 0 {
        return Err(FftError::InvalidChannels);
    }

    let frames = len / channels;
    if frames < FFT_BUFFER_SIZE {
        return Err(FftError::InputLength {
            expected: FFT_BUFFER_SIZE * channels,
            actual: len,
        });
    }

    Ok(())
}
