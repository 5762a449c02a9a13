//! High-level spectrum analyzer
//!
//! Combines downmixing, quantization and the FFT engine for visualization

use serde::{Deserialize, Serialize};

use super::fft::FftEngine;
use super::tables::{FFT_BUFFER_SIZE, FFT_OUTPUT_SIZE};
use crate::audio::downmix::downmix_f32;
use crate::error::Result;

/// Number of 16-bit frequency levels per block (DC excluded)
pub const FREQ_LEVELS: usize = FFT_BUFFER_SIZE / 2;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of interleaved channels in the incoming PCM
    pub channels: u16,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
        }
    }
}

/// Spectrum analyzer for interleaved float PCM
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
    mono: [i16; FFT_BUFFER_SIZE],
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            config,
            fft_engine: FftEngine::try_new()?,
            mono: [0; FFT_BUFFER_SIZE],
        })
    }

    /// Analyze one block and return the power spectrum
    ///
    /// # Arguments
    /// * `pcm` - Interleaved samples in `[-1, 1]`, at least `FFT_BUFFER_SIZE` frames
    ///
    /// # Returns
    /// Power `|X[k]|²` for `k = 0..=FFT_BUFFER_SIZE/2`
    pub fn analyze(&mut self, pcm: &[f32]) -> Result<Vec<f32>> {
        downmix_f32(pcm, self.config.channels as usize, &mut self.mono)?;

        let mut spectrum = vec![0.0; FFT_OUTPUT_SIZE];
        self.fft_engine.try_perform(&self.mono, &mut spectrum)?;
        Ok(spectrum)
    }

    /// Analyze and return power in dB
    ///
    /// # Arguments
    /// * `pcm` - Interleaved samples
    /// * `reference` - Amplitude reference; 0 dB corresponds to power `reference²`
    pub fn analyze_db(&mut self, pcm: &[f32], reference: f32) -> Result<Vec<f32>> {
        let power = self.analyze(pcm)?;
        Ok(power_to_db(&power, reference))
    }

    /// Analyze and return the 16-bit frequency levels
    pub fn analyze_levels(&mut self, pcm: &[f32]) -> Result<[i16; FREQ_LEVELS]> {
        let power = self.analyze(pcm)?;
        Ok(frequency_levels(&power))
    }

    /// Get frequency bins in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f32> {
        (0..self.num_bins())
            .map(|bin| bin_to_hz(bin, self.config.sample_rate))
            .collect()
    }

    /// Update configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) {
        self.config = config;
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        FFT_OUTPUT_SIZE
    }
}

/// Center frequency of `bin` in Hz
pub fn bin_to_hz(bin: usize, sample_rate: u32) -> f32 {
    bin as f32 * sample_rate as f32 / FFT_BUFFER_SIZE as f32
}

/// Convert power values to dB relative to `reference²`
///
/// Both the power and `reference²` are floored at 1e-20, so a zero
/// reference yields large finite values instead of infinities.
pub fn power_to_db(power: &[f32], reference: f32) -> Vec<f32> {
    let reference_power = (reference * reference).max(1e-20);
    power
        .iter()
        .map(|&p| {
            let p_clamped = p.max(1e-20);
            10.0 * (p_clamped / reference_power).log10()
        })
        .collect()
}

/// Reduce a power spectrum to 16-bit levels, one per non-DC bin
///
/// `level[i] = sqrt(power[i + 1]) >> 8`, saturated to `i16::MAX`.
pub fn frequency_levels(power: &[f32]) -> [i16; FREQ_LEVELS] {
    let mut levels = [0i16; FREQ_LEVELS];
    for (level, &p) in levels.iter_mut().zip(power.iter().skip(1)) {
        let magnitude = p.max(0.0).sqrt() as i64;
        *level = (magnitude >> 8).min(i16::MAX as i64) as i16;
    }
    levels
}
