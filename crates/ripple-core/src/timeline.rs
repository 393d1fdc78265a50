//! Pure conversion between timeline pixel offsets and millisecond positions
//!
//! The timeline is drawn as one amplitude line per `ms_per_line` of audio,
//! so a position maps to pixels through the line pitch alone. Offset 0 is
//! position 0; later positions sit at more negative offsets because the
//! strip translates left as time advances.
//!
//! Both directions are pure functions of the scale and the take duration,
//! which is what keeps a settled drag numerically invertible back into a
//! canonical position.

/// Positions derived from drags are quantized to this bucket to avoid
/// visual jitter from sub-threshold movements.
pub const POSITION_QUANTUM_MS: u64 = 100;

// Absorbs f32 rounding in offset_of so a settled offset maps back to the
// exact position that produced it.
const QUANTIZE_SLOP: f64 = 1e-3;

/// Timeline pitch: time per amplitude line and pixels per line
///
/// `pixels_per_line` is the gap between lines plus the line width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineScale {
    pub ms_per_line: u64,
    pub pixels_per_line: f32,
}

impl TimelineScale {
    pub fn new(ms_per_line: u64, gap_px: f32, line_width_px: f32) -> Self {
        Self {
            ms_per_line,
            pixels_per_line: gap_px + line_width_px,
        }
    }

    /// Pixel width of the whole strip for a take of `duration_ms`
    pub fn max_width(&self, duration_ms: u64) -> f32 {
        (duration_ms as f64 / self.ms_per_line as f64 * self.pixels_per_line as f64) as f32
    }

    /// Offset corresponding to a position, unclamped
    pub fn offset_of(&self, position_ms: u64) -> f32 {
        -((position_ms as f64 / self.ms_per_line as f64 * self.pixels_per_line as f64) as f32)
    }

    /// Offset corresponding to a position, clamped to `[-max_width, 0]`
    pub fn offset_of_clamped(&self, position_ms: u64, duration_ms: u64) -> f32 {
        self.offset_of(position_ms).clamp(-self.max_width(duration_ms), 0.0)
    }

    /// Position corresponding to an offset, quantized to 100 ms buckets
    /// and clamped to `[0, duration_ms]`
    ///
    /// Positive offsets (rubber-band overshoot past the start) map to 0.
    pub fn position_of(&self, offset_px: f32, duration_ms: u64) -> u64 {
        if offset_px > 0.0 {
            return 0;
        }

        let ms = offset_px.abs() as f64 / self.pixels_per_line as f64 * self.ms_per_line as f64;
        let quantum = POSITION_QUANTUM_MS as f64;
        let bucketed = (ms / quantum + QUANTIZE_SLOP).floor() as u64 * POSITION_QUANTUM_MS;
        bucketed.min(duration_ms)
    }

    /// Offset clamp range for a decayed gesture release
    pub fn decay_clamp(&self, duration_ms: u64) -> (f32, f32) {
        (-self.max_width(duration_ms), 0.0)
    }
}
