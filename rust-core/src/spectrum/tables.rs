//! Precomputed lookup tables for the fixed-size FFT
//!
//! Built once on first use and shared read-only by every [`FftEngine`](super::FftEngine).

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Transform length (number of input samples per block)
pub const FFT_BUFFER_SIZE: usize = 512;

/// log2 of [`FFT_BUFFER_SIZE`]
pub const FFT_BUFFER_SIZE_LOG: u32 = 9;

/// Number of power bins produced per block (DC through Nyquist)
pub const FFT_OUTPUT_SIZE: usize = FFT_BUFFER_SIZE / 2 + 1;

const _: () = assert!(FFT_BUFFER_SIZE == 1 << FFT_BUFFER_SIZE_LOG);

static TABLES: OnceLock<FftTables> = OnceLock::new();

/// Bit-reversal permutation and half-period twiddle tables
pub struct FftTables {
    /// `bit_reverse[i]` is `i` with its lowest `FFT_BUFFER_SIZE_LOG` bits reversed
    pub bit_reverse: [usize; FFT_BUFFER_SIZE],

    /// `cos(2πi/N)` for `i` in `[0, N/2)`
    pub cos: [f32; FFT_BUFFER_SIZE / 2],

    /// `sin(2πi/N)` for `i` in `[0, N/2)`
    pub sin: [f32; FFT_BUFFER_SIZE / 2],
}

impl FftTables {
    /// Shared tables, built on the first call
    pub fn get() -> &'static FftTables {
        TABLES.get_or_init(|| {
            tracing::debug!(size = FFT_BUFFER_SIZE, "building FFT tables");
            Self::build()
        })
    }

    /// Compute a fresh copy of the tables
    ///
    /// Pure and deterministic, so calling it again is harmless.
    pub fn build() -> Self {
        let mut bit_reverse = [0usize; FFT_BUFFER_SIZE];
        for (i, slot) in bit_reverse.iter_mut().enumerate() {
            *slot = reverse_bits(i);
        }

        let mut cos = [0.0f32; FFT_BUFFER_SIZE / 2];
        let mut sin = [0.0f32; FFT_BUFFER_SIZE / 2];
        for i in 0..FFT_BUFFER_SIZE / 2 {
            let theta = 2.0 * PI * i as f64 / FFT_BUFFER_SIZE as f64;
            cos[i] = theta.cos() as f32;
            sin[i] = theta.sin() as f32;
        }

        Self {
            bit_reverse,
            cos,
            sin,
        }
    }
}

/// Reverse the lowest `FFT_BUFFER_SIZE_LOG` bits of `index`
///
/// Higher bits of the argument are discarded.
pub fn reverse_bits(mut index: usize) -> usize {
    let mut reversed = 0;
    for _ in 0..FFT_BUFFER_SIZE_LOG {
        reversed = (reversed << 1) | (index & 1);
        index >>= 1;
    }
    reversed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_bits_known_values() {
        assert_eq!(reverse_bits(0), 0);
        assert_eq!(reverse_bits(1), 256);
        assert_eq!(reverse_bits(2), 128);
        assert_eq!(reverse_bits(3), 384);
        assert_eq!(reverse_bits(511), 511);
    }

    #[test]
    fn test_reverse_bits_is_involution() {
        for x in 0..FFT_BUFFER_SIZE {
            assert_eq!(reverse_bits(reverse_bits(x)), x);
        }
    }

    #[test]
    fn test_bit_reverse_table_is_permutation() {
        let tables = FftTables::build();
        let mut seen = [false; FFT_BUFFER_SIZE];
        for &r in tables.bit_reverse.iter() {
            assert!(r < FFT_BUFFER_SIZE);
            assert!(!seen[r], "index {} appears twice", r);
            seen[r] = true;
        }
    }

    #[test]
    fn test_trig_tables_on_unit_circle() {
        let tables = FftTables::get();
        for i in 0..FFT_BUFFER_SIZE / 2 {
            let norm = tables.cos[i] * tables.cos[i] + tables.sin[i] * tables.sin[i];
            assert!((norm - 1.0).abs() < 1e-6, "bin {}: {}", i, norm);
        }

        assert_eq!(tables.cos[0], 1.0);
        assert_eq!(tables.sin[0], 0.0);
        // Quarter period: θ = π/2
        assert!(tables.cos[FFT_BUFFER_SIZE / 4].abs() < 1e-6);
        assert!((tables.sin[FFT_BUFFER_SIZE / 4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shared_tables_match_rebuild() {
        let shared = FftTables::get();
        let rebuilt = FftTables::build();

        assert!(std::ptr::eq(shared, FftTables::get()));
        assert_eq!(shared.bit_reverse, rebuilt.bit_reverse);
        assert_eq!(shared.cos, rebuilt.cos);
        assert_eq!(shared.sin, rebuilt.sin);
    }

    #[test]
    fn test_concurrent_first_use_shares_one_table() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    let _engine = crate::spectrum::FftEngine::new();
                    FftTables::get() as *const FftTables as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let shared = FftTables::get();
        assert!(addresses.iter().all(|&a| a == shared as *const FftTables as usize));

        let rebuilt = FftTables::build();
        assert_eq!(shared.bit_reverse, rebuilt.bit_reverse);
        assert_eq!(shared.cos, rebuilt.cos);
        assert_eq!(shared.sin, rebuilt.sin);
    }
}
