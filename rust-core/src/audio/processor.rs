//! Background spectrum processor
//!
//! The host's audio callback pushes PCM; a dedicated thread frames it into
//! FFT blocks and publishes the most recent spectrum for the display to poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::audio::buffer::{AudioProducer, AudioRingBuffer};
use crate::audio::downmix::mix_frame;
use crate::error::{FftError, Result};
use crate::spectrum::analysis::{frequency_levels, AnalyzerConfig, FREQ_LEVELS};
use crate::spectrum::{FftEngine, FFT_BUFFER_SIZE, FFT_OUTPUT_SIZE};

/// Ring capacity in mono samples
pub const RING_CAPACITY: usize = FFT_BUFFER_SIZE * 16;

/// Analysis of one block (sent to the display)
#[derive(Clone)]
pub struct SpectrumFrame {
    /// Power spectrum, `FFT_OUTPUT_SIZE` bins
    pub power: Box<[f32; FFT_OUTPUT_SIZE]>,

    /// 16-bit frequency levels derived from `power`
    pub levels: [i16; FREQ_LEVELS],

    /// Sequence number of the block since `start`
    pub block_index: u64,
}

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self {
            power: Box::new([0.0; FFT_OUTPUT_SIZE]),
            levels: [0; FREQ_LEVELS],
            block_index: 0,
        }
    }
}

/// Threaded spectrum processor
pub struct SpectrumProcessor {
    config: AnalyzerConfig,

    /// Producer end used by `push_*`, present while running
    producer: Option<AudioProducer>,

    /// Scratch buffer for downmixed samples
    mono: Vec<i16>,

    /// Leading samples of a frame split across `push_interleaved` calls
    pending: Vec<f32>,

    /// Latest analysis result
    results: Arc<Mutex<Option<SpectrumFrame>>>,

    /// Processing thread handle
    process_thread: Option<JoinHandle<()>>,

    /// Running flag
    running: Arc<AtomicBool>,

    /// Samples dropped because the ring was full
    dropped: u64,
}

impl SpectrumProcessor {
    /// Create a stopped processor
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            producer: None,
            mono: Vec::new(),
            pending: Vec::new(),
            results: Arc::new(Mutex::new(None)),
            process_thread: None,
            running: Arc::new(AtomicBool::new(false)),
            dropped: 0,
        }
    }

    /// Start the processing thread
    pub fn start(&mut self) -> Result<()> {
        if self.process_thread.is_some() {
            return Err(FftError::ProcessorRunning);
        }

        let mut engine = FftEngine::try_new()?;
        let (producer, mut consumer) = AudioRingBuffer::new(RING_CAPACITY).split();
        self.clear_session();

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let results = Arc::clone(&self.results);

        let spawned = std::thread::Builder::new()
            .name("spectrum".into())
            .spawn(move || {
                let mut block = [0i16; FFT_BUFFER_SIZE];
                let mut frame = SpectrumFrame::default();

                while running.load(Ordering::SeqCst) {
                    if consumer.read_block(&mut block) {
                        engine.perform(&block, &mut frame.power);
                        frame.levels = frequency_levels(&frame.power[..]);

                        if let Ok(mut results_guard) = results.lock() {
                            *results_guard = Some(frame.clone());
                        }
                        frame.block_index += 1;
                    } else {
                        // Not a full block yet, avoid spinning
                        std::thread::sleep(Duration::from_micros(100));
                    }
                }

                engine.close();
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        self.producer = Some(producer);
        self.process_thread = Some(handle);
        tracing::info!(
            sample_rate = self.config.sample_rate,
            channels = self.config.channels,
            "spectrum processor started"
        );

        Ok(())
    }

    /// Stop the processing thread
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
            tracing::info!(dropped = self.dropped, "spectrum processor stopped");
        }

        self.producer = None;
        self.clear_session();
    }

    /// Forget the previous session's result and any split frame
    fn clear_session(&mut self) {
        if let Ok(mut results_guard) = self.results.lock() {
            *results_guard = None;
        }
        self.pending.clear();
    }

    /// Queue interleaved float PCM
    ///
    /// Trailing samples that do not form a whole frame are kept and
    /// completed by the next call, so frames may be split across calls.
    ///
    /// # Returns
    /// Number of mono samples queued; 0 when the processor is stopped
    pub fn push_interleaved(&mut self, pcm: &[f32]) -> Result<usize> {
        let channels = self.config.channels as usize;
        if channels == 0 {
            return Err(FftError::InvalidChannels);
        }

        let mut mono = std::mem::take(&mut self.mono);
        mono.clear();

        let mut rest = pcm;
        if !self.pending.is_empty() {
            let take = (channels - self.pending.len()).min(rest.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.pending.len() == channels {
                mono.push(mix_frame(&self.pending));
                self.pending.clear();
            }
        }

        let frames = rest.chunks_exact(channels);
        let tail = frames.remainder();
        mono.extend(frames.map(mix_frame));
        self.pending.extend_from_slice(tail);

        let written = self.push_mono(&mono);
        self.mono = mono;

        Ok(written)
    }

    /// Queue mono 16-bit samples
    pub fn push_mono(&mut self, samples: &[i16]) -> usize {
        let Some(producer) = self.producer.as_mut() else {
            return 0;
        };

        let written = producer.write(samples);
        if written < samples.len() {
            let lost = (samples.len() - written) as u64;
            self.dropped += lost;
            tracing::warn!(lost, total = self.dropped, "ring buffer full, dropping samples");
        }
        written
    }

    /// Take the latest result, if a new block was analyzed since the last call
    pub fn latest(&self) -> Option<SpectrumFrame> {
        if let Ok(mut results_guard) = self.results.lock() {
            results_guard.take()
        } else {
            None
        }
    }

    /// Check if the processing thread is running
    pub fn is_running(&self) -> bool {
        self.process_thread.is_some()
    }

    /// Total samples dropped on overflow
    pub fn dropped_samples(&self) -> u64 {
        self.dropped
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl Drop for SpectrumProcessor {
    fn drop(&mut self) {
        self.stop();
    }
}
