//! Classic analyzer bar and voiceprint reductions
//!
//! Collapses the 256 frequency levels into a handful of bars with heights in
//! `0..=15`, using fixed, roughly logarithmic bin boundaries, or into the
//! short column of low-frequency intensities the voiceprint display scrolls.

use super::analysis::FREQ_LEVELS;

/// Tallest bar height
pub const MAX_BAR_HEIGHT: u8 = 15;

/// Number of intensities in one voiceprint column
pub const VOICEPRINT_LEN: usize = 17;

/// 20 / ln(256): maps the 8-bit level range onto 20 height steps
const Y_SCALE: f64 = 3.606_737_602_22;

const LONG_XSCALE: [usize; 77] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
    25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47,
    48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 61, 66, 71, 76, 81, 87, 93, 100, 107, 114, 122,
    131, 140, 150, 161, 172, 184, 255,
];

const SHORT_XSCALE: [usize; 21] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 15, 20, 27, 36, 47, 62, 82, 107, 141, 184, 255,
];

/// Bar layout of the analyzer display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLayout {
    /// One bar per level at the low end, widening towards the top
    Long,

    /// Fewer, wider bars
    Short,
}

impl BarLayout {
    /// Number of bars drawn, fewer when the display is shaded
    pub fn bar_count(&self, shaded: bool) -> usize {
        match (self, shaded) {
            (BarLayout::Long, false) => 75,
            (BarLayout::Long, true) => 37,
            (BarLayout::Short, false) => 19,
            (BarLayout::Short, true) => 13,
        }
    }

    fn xscale(&self) -> &'static [usize] {
        match self {
            BarLayout::Long => &LONG_XSCALE,
            BarLayout::Short => &SHORT_XSCALE,
        }
    }
}

/// Compute bar heights from frequency levels
///
/// Each bar takes the loudest level in its bin range, drops the low 7 bits
/// and maps the rest logarithmically onto `0..=MAX_BAR_HEIGHT`.
pub fn analyzer_bars(levels: &[i16; FREQ_LEVELS], layout: BarLayout, shaded: bool) -> Vec<u8> {
    let xscale = layout.xscale();

    (0..layout.bar_count(shaded))
        .map(|i| {
            let y = levels[xscale[i]..xscale[i + 1]]
                .iter()
                .map(|&level| level.max(0) as i32)
                .max()
                .unwrap_or(0)
                >> 7;

            if y == 0 {
                0
            } else {
                ((y as f64).ln() * Y_SCALE).min(MAX_BAR_HEIGHT as f64) as u8
            }
        })
        .collect()
}

/// Compute one voiceprint column from frequency levels
///
/// Entry `i` reads level `3i / 2`, so the column stretches the lowest 25
/// levels (roughly 0-1 kHz at 44.1 kHz) over 17 entries, scaled down by 5
/// bits and saturated to `u8`.
pub fn voiceprint_column(levels: &[i16; FREQ_LEVELS]) -> [u8; VOICEPRINT_LEN] {
    let mut column = [0u8; VOICEPRINT_LEN];
    for (i, value) in column.iter_mut().enumerate() {
        let level = levels[i * 3 / 2].max(0) >> 5;
        *value = level.min(u8::MAX as i16) as u8;
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_counts() {
        let levels = [0i16; FREQ_LEVELS];
        assert_eq!(analyzer_bars(&levels, BarLayout::Long, false).len(), 75);
        assert_eq!(analyzer_bars(&levels, BarLayout::Long, true).len(), 37);
        assert_eq!(analyzer_bars(&levels, BarLayout::Short, false).len(), 19);
        assert_eq!(analyzer_bars(&levels, BarLayout::Short, true).len(), 13);
    }

    #[test]
    fn test_silence_gives_empty_bars() {
        let levels = [0i16; FREQ_LEVELS];
        let bars = analyzer_bars(&levels, BarLayout::Long, false);
        assert!(bars.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bar_heights() {
        let mut levels = [0i16; FREQ_LEVELS];
        levels[0] = 127; // below the 7-bit threshold
        levels[1] = 128; // y = 1, ln(1) = 0
        levels[2] = 256; // y = 2
        levels[3] = i16::MAX; // y = 255, capped

        let bars = analyzer_bars(&levels, BarLayout::Long, false);
        assert_eq!(bars[0], 0);
        assert_eq!(bars[1], 0);
        assert_eq!(bars[2], 2);
        assert_eq!(bars[3], MAX_BAR_HEIGHT);
    }

    #[test]
    fn test_bar_takes_loudest_level_in_range() {
        let mut levels = [0i16; FREQ_LEVELS];
        // Short bar 9 covers levels 11..15
        levels[11] = 300;
        levels[14] = 5000;
        levels[15] = 30000;

        let bars = analyzer_bars(&levels, BarLayout::Short, false);
        // 5000 >> 7 = 39, ln(39) * 3.6067 = 13.2
        assert_eq!(bars[9], 13);
        assert_eq!(bars[10], MAX_BAR_HEIGHT);
    }

    #[test]
    fn test_voiceprint_column() {
        let mut levels = [0i16; FREQ_LEVELS];
        for (i, level) in levels.iter_mut().enumerate() {
            *level = (i as i16) * 64;
        }
        levels[24] = i16::MAX;
        levels[25] = i16::MAX;

        let column = voiceprint_column(&levels);
        assert_eq!(column.len(), 17);
        // Entry 1 reads level 1, entry 2 reads level 3
        assert_eq!(column[0], 0);
        assert_eq!(column[1], 2);
        assert_eq!(column[2], 6);
        assert_eq!(column[15], 44);
        // Entry 16 reads level 24, saturated
        assert_eq!(column[16], u8::MAX);
    }

    #[test]
    fn test_voiceprint_ignores_negative_levels() {
        let levels = [-500i16; FREQ_LEVELS];
        assert!(voiceprint_column(&levels).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_negative_levels_are_ignored() {
        let levels = [-20000i16; FREQ_LEVELS];
        let bars = analyzer_bars(&levels, BarLayout::Short, true);
        assert!(bars.iter().all(|&b| b == 0));
    }
}
