//! Incremental detection of glyphs wider or narrower than a cell.
//!
//! Code points are measured in batches so that probing can run in idle time
//! without delaying the first paint.

use cellpaint_fonts::{GlyphStyle, TextMeasurer};

/// Table entry: not measured yet
pub const UNKNOWN: u8 = 0xFF;
/// Table entry: renders at exactly one cell
pub const NORMAL: u8 = 0;
/// Table entry: rendered width deviates from the cell width
pub const ANOMALOUS: u8 = 1;

/// First code point that is measured; controls below are never drawn
pub const PROBE_START: u32 = 32;
/// One past the last code point covered by the table
pub const PROBE_END: u32 = 256;
/// Code points measured per batch
pub const BATCH_SIZE: u32 = 30;
/// Each code point is measured as this many repetitions
pub const REPEAT: usize = 10;
/// Allowed relative deviation from `REPEAT * cell_width`
pub const TOLERANCE: f64 = 0.005;

/// Tri-state anomaly flags for code points 0-255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetricsTable {
    entries: [u8; 256],
}

impl Default for FontMetricsTable {
    fn default() -> Self {
        Self {
            entries: [UNKNOWN; 256],
        }
    }
}

impl FontMetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry; code points past the table read as [`NORMAL`].
    pub fn get(&self, codepoint: u32) -> u8 {
        self.entries
            .get(codepoint as usize)
            .copied()
            .unwrap_or(NORMAL)
    }

    pub fn set(&mut self, codepoint: u32, value: u8) {
        if let Some(entry) = self.entries.get_mut(codepoint as usize) {
            *entry = value;
        }
    }

    /// Unknown entries count as "no anomaly".
    pub fn is_anomalous(&self, codepoint: u32) -> bool {
        self.get(codepoint) == ANOMALOUS
    }

    pub fn unknown_count(&self) -> usize {
        self.entries.iter().filter(|&&e| e == UNKNOWN).count()
    }

    pub fn is_resolved(&self) -> bool {
        self.unknown_count() == 0
    }

    pub fn reset(&mut self) {
        self.entries = [UNKNOWN; 256];
    }
}

/// Outcome of a single probe batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeBatch {
    /// More batches are needed to resolve the table
    pub more: bool,
    /// Code points newly marked anomalous by this batch
    pub anomalies: usize,
}

/// Measures the table in batches of [`BATCH_SIZE`] code points.
#[derive(Debug, Clone)]
pub struct FontMetricsProbe {
    table: FontMetricsTable,
    cursor: u32,
    cell_width: f64,
}

impl FontMetricsProbe {
    pub fn new(cell_width: f64) -> Self {
        Self {
            table: FontMetricsTable::new(),
            cursor: PROBE_START,
            cell_width,
        }
    }

    pub fn table(&self) -> &FontMetricsTable {
        &self.table
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= PROBE_END
    }

    /// Forget all measurements and rewind to the first probed code point.
    pub fn reset(&mut self) {
        self.table.reset();
        self.cursor = PROBE_START;
    }

    /// Change the expected width; a different width restarts probing.
    pub fn set_cell_width(&mut self, cell_width: f64) {
        if cell_width != self.cell_width {
            self.cell_width = cell_width;
            self.reset();
        }
    }

    /// Measure the next batch. Returns `true` while batches remain.
    pub fn probe_batch(&mut self, measurer: &dyn TextMeasurer, style: GlyphStyle) -> bool {
        self.probe_next(measurer, style).more
    }

    /// Measure the next batch and report what changed.
    pub fn probe_next(&mut self, measurer: &dyn TextMeasurer, style: GlyphStyle) -> ProbeBatch {
        if self.is_complete() {
            return ProbeBatch::default();
        }
        if self.cursor == PROBE_START {
            for code in 0..PROBE_START {
                self.table.set(code, NORMAL);
            }
        }

        let expected = REPEAT as f64 * self.cell_width;
        let end = (self.cursor + BATCH_SIZE).min(PROBE_END);
        let mut anomalies = 0;
        for code in self.cursor..end {
            let Some(ch) = char::from_u32(code) else {
                self.table.set(code, NORMAL);
                continue;
            };
            let text: String = std::iter::repeat_n(ch, REPEAT).collect();
            let measured = measurer.measure(&text, style);
            let anomalous = expected > 0.0 && ((measured - expected).abs() / expected) > TOLERANCE;
            if anomalous {
                log::trace!(
                    "U+{:04X} measures {:.2}px for {} cells, expected {:.2}px",
                    code,
                    measured,
                    REPEAT,
                    expected
                );
                anomalies += 1;
            }
            self.table
                .set(code, if anomalous { ANOMALOUS } else { NORMAL });
        }
        self.cursor += BATCH_SIZE;

        let more = !self.is_complete();
        if !more {
            log::debug!(
                "Font metrics probe complete at cell width {}",
                self.cell_width
            );
        }
        ProbeBatch { more, anomalies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is `width` wide except the listed wide ones.
    struct FixedMeasurer {
        width: f64,
        wide: Vec<char>,
    }

    impl TextMeasurer for FixedMeasurer {
        fn measure(&self, text: &str, _style: GlyphStyle) -> f64 {
            text.chars()
                .map(|c| {
                    if self.wide.contains(&c) {
                        self.width * 1.5
                    } else {
                        self.width
                    }
                })
                .sum()
        }
    }

    #[test]
    fn test_eight_batches_resolve_the_table() {
        let measurer = FixedMeasurer {
            width: 8.0,
            wide: vec![],
        };
        let mut probe = FontMetricsProbe::new(8.0);
        let calls = (PROBE_END - PROBE_START).div_ceil(BATCH_SIZE);
        assert_eq!(calls, 8);

        for i in 0..calls {
            let more = probe.probe_batch(&measurer, GlyphStyle::REGULAR);
            assert_eq!(more, i + 1 < calls, "call {}", i);
        }
        assert!(probe.table().is_resolved());
        assert!(!probe.probe_batch(&measurer, GlyphStyle::REGULAR));
    }

    #[test]
    fn test_first_batch_resolves_control_range() {
        let measurer = FixedMeasurer {
            width: 8.0,
            wide: vec![],
        };
        let mut probe = FontMetricsProbe::new(8.0);
        probe.probe_batch(&measurer, GlyphStyle::REGULAR);
        assert_eq!(probe.table().get(0), NORMAL);
        assert_eq!(probe.table().get(31), NORMAL);
        assert_eq!(probe.table().get(61), NORMAL);
        assert_eq!(probe.table().get(62), UNKNOWN);
        assert_eq!(probe.table().unknown_count(), 256 - 62);
    }

    #[test]
    fn test_wide_glyph_is_marked_anomalous() {
        let measurer = FixedMeasurer {
            width: 8.0,
            wide: vec!['W', '\u{e9}'],
        };
        let mut probe = FontMetricsProbe::new(8.0);
        let mut anomalies = 0;
        while !probe.is_complete() {
            anomalies += probe.probe_next(&measurer, GlyphStyle::REGULAR).anomalies;
        }
        assert_eq!(anomalies, 2);
        assert!(probe.table().is_anomalous('W' as u32));
        assert!(probe.table().is_anomalous(0xe9));
        assert!(!probe.table().is_anomalous('M' as u32));
    }

    #[test]
    fn test_deviation_within_tolerance_is_normal() {
        // 0.4% wider than the cell
        let measurer = FixedMeasurer {
            width: 8.032,
            wide: vec![],
        };
        let mut probe = FontMetricsProbe::new(8.0);
        while probe.probe_batch(&measurer, GlyphStyle::REGULAR) {}
        assert!((0..256).all(|c| !probe.table().is_anomalous(c)));
    }

    #[test]
    fn test_unknown_and_out_of_range_are_not_anomalous() {
        let table = FontMetricsTable::new();
        assert!(!table.is_anomalous(65));
        assert!(!table.is_anomalous(0x4e00));
    }

    #[test]
    fn test_reset_and_width_change_restart_probing() {
        let measurer = FixedMeasurer {
            width: 8.0,
            wide: vec![],
        };
        let mut probe = FontMetricsProbe::new(8.0);
        while probe.probe_batch(&measurer, GlyphStyle::REGULAR) {}
        probe.set_cell_width(8.0);
        assert!(probe.is_complete());

        probe.set_cell_width(9.0);
        assert!(!probe.is_complete());
        assert_eq!(probe.table().unknown_count(), 256);
    }
}
