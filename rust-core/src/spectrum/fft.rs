//! Fixed-size radix-2 FFT for visualization
//!
//! Turns one block of [`FFT_BUFFER_SIZE`] signed 16-bit samples into
//! [`FFT_OUTPUT_SIZE`] power values. The transform is the iterative
//! decimation-in-time Cooley-Tukey algorithm running in place over the
//! engine's own working buffers, with the input loaded in bit-reversed order.

use super::tables::{FftTables, FFT_BUFFER_SIZE, FFT_BUFFER_SIZE_LOG, FFT_OUTPUT_SIZE};
use crate::error::{FftError, Result};

/// Per-caller FFT state
///
/// Holds the complex working set for one transform at a time. The lookup
/// tables are shared, so engines are cheap; give each thread its own.
pub struct FftEngine {
    /// Real part of the working buffer
    real: Box<[f32]>,

    /// Imaginary part of the working buffer
    imag: Box<[f32]>,

    tables: &'static FftTables,
}

impl FftEngine {
    /// Create a new engine, building the shared tables if needed
    pub fn new() -> Self {
        let tables = FftTables::get();
        tracing::debug!("created FFT engine");

        Self {
            real: vec![0.0; FFT_BUFFER_SIZE].into_boxed_slice(),
            imag: vec![0.0; FFT_BUFFER_SIZE].into_boxed_slice(),
            tables,
        }
    }

    /// Create a new engine, reporting allocation failure instead of aborting
    pub fn try_new() -> Result<Self> {
        let real = zeroed_buffer()?;
        let imag = zeroed_buffer()?;
        let tables = FftTables::get();
        tracing::debug!("created FFT engine");

        Ok(Self { real, imag, tables })
    }

    /// Compute the power spectrum of one block
    ///
    /// `output[i]` receives `|X[i]|²` for `i` in `0..=N/2`, with the DC and
    /// Nyquist bins divided by 4. Values span roughly
    /// `0..((N/2) * 32768)²`; that bound is not strict, since a waveform whose
    /// peaks fall between sample instants can exceed it.
    pub fn perform(&mut self, input: &[i16; FFT_BUFFER_SIZE], output: &mut [f32; FFT_OUTPUT_SIZE]) {
        self.prepare(input);
        self.calculate();
        self.extract(output);
        tracing::trace!(dc = output[0], "performed FFT");
    }

    /// Slice-based [`perform`](Self::perform)
    ///
    /// `input` must hold exactly `FFT_BUFFER_SIZE` samples and `output` at
    /// least `FFT_OUTPUT_SIZE` floats. Only the first `FFT_OUTPUT_SIZE`
    /// output slots are written.
    pub fn try_perform(&mut self, input: &[i16], output: &mut [f32]) -> Result<()> {
        let input: &[i16; FFT_BUFFER_SIZE] =
            input.try_into().map_err(|_| FftError::InputLength {
                expected: FFT_BUFFER_SIZE,
                actual: input.len(),
            })?;

        let actual = output.len();
        let output: &mut [f32; FFT_OUTPUT_SIZE] = output
            .get_mut(..FFT_OUTPUT_SIZE)
            .and_then(|head| head.try_into().ok())
            .ok_or(FftError::OutputLength {
                expected: FFT_OUTPUT_SIZE,
                actual,
            })?;

        self.perform(input, output);
        Ok(())
    }

    /// Release the engine
    pub fn close(self) {
        tracing::debug!("closed FFT engine");
    }

    /// Load samples in bit-reversed order as the real part
    fn prepare(&mut self, input: &[i16; FFT_BUFFER_SIZE]) {
        let bit_reverse = &self.tables.bit_reverse;
        for (i, (re, im)) in self.real.iter_mut().zip(self.imag.iter_mut()).enumerate() {
            *re = input[bit_reverse[i]] as f32;
            *im = 0.0;
        }
    }

    /// In-place butterfly passes, one per bit of the transform length
    fn calculate(&mut self) {
        let cos = &self.tables.cos;
        let sin = &self.tables.sin;
        let re = &mut self.real[..];
        let im = &mut self.imag[..];

        // Span between butterfly partners, and twiddle stride into the tables
        let mut exchanges = 1;
        let mut factfact = FFT_BUFFER_SIZE / 2;

        for _ in 0..FFT_BUFFER_SIZE_LOG {
            for j in 0..exchanges {
                // factor ^ exchanges == -1
                let fact_real = cos[j * factfact];
                let fact_imag = sin[j * factfact];

                for k in (j..FFT_BUFFER_SIZE).step_by(exchanges << 1) {
                    let k1 = k + exchanges;

                    let tmp_real = fact_real * re[k1] - fact_imag * im[k1];
                    let tmp_imag = fact_real * im[k1] + fact_imag * re[k1];
                    re[k1] = re[k] - tmp_real;
                    im[k1] = im[k] - tmp_imag;
                    re[k] += tmp_real;
                    im[k] += tmp_imag;
                }
            }

            exchanges <<= 1;
            factfact >>= 1;
        }
    }

    /// Squared magnitudes of the non-negative frequency bins
    fn extract(&self, output: &mut [f32; FFT_OUTPUT_SIZE]) {
        for (out, (&re, &im)) in output.iter_mut().zip(self.real.iter().zip(self.imag.iter())) {
            *out = re * re + im * im;
        }

        // DC and Nyquist have no mirror bin, keep them in scale with the rest
        output[0] /= 4.0;
        output[FFT_BUFFER_SIZE / 2] /= 4.0;
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn zeroed_buffer() -> Result<Box<[f32]>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(FFT_BUFFER_SIZE)?;
    buffer.resize(FFT_BUFFER_SIZE, 0.0);
    Ok(buffer.into_boxed_slice())
}
