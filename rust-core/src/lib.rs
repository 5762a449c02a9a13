//! Visual FFT - Spectrum Core for Audio Visualization
//! 
//! Fixed 512-point FFT turning 16-bit PCM blocks into power spectra,
//! plus the downmix, streaming and display reductions around it.

pub mod audio;
pub mod error;
pub mod spectrum;

pub use error::{FftError, Result};
pub use spectrum::{FftEngine, SpectrumAnalyzer, FFT_BUFFER_SIZE, FFT_OUTPUT_SIZE};
pub use audio::SpectrumProcessor;
