//! Fixed-size FFT and spectrum views for visualization

pub mod tables;
pub mod fft;
pub mod analysis;
pub mod bars;

pub use tables::{FftTables, FFT_BUFFER_SIZE, FFT_BUFFER_SIZE_LOG, FFT_OUTPUT_SIZE};
pub use fft::FftEngine;
pub use analysis::{SpectrumAnalyzer, AnalyzerConfig};
pub use bars::{BarLayout, analyzer_bars, voiceprint_column};
