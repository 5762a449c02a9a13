//! Error type shared by the transform kernel and the streaming pipeline

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias carrying [`FftError`]
pub type Result<T> = std::result::Result<T, FftError>;

#[derive(Error, Debug)]
pub enum FftError {
    #[error("Failed to allocate FFT working buffers: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Expected {expected} input samples, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("Output buffer needs at least {expected} bins, got {actual}")]
    OutputLength { expected: usize, actual: usize },

    #[error("Channel count must be at least 1")]
    InvalidChannels,

    #[error("Spectrum processor is already running")]
    ProcessorRunning,

    #[error("Failed to spawn processing thread: {0}")]
    Spawn(#[from] std::io::Error),
}
