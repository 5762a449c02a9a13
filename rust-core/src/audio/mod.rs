//! Audio plumbing between the host and the FFT

pub mod downmix;
pub mod buffer;
pub mod processor;

pub use buffer::AudioRingBuffer;
pub use processor::{SpectrumProcessor, SpectrumFrame};
