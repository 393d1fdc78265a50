//! Append-only amplitude sample store for the active take
//!
//! Samples arrive with the engine's recording ticks and are kept for the
//! entire take. The renderer only asks for a bounded recent window while
//! capture is live; finished and idle views get the full buffer.

use serde::{Deserialize, Serialize};

/// Number of samples the renderer sees while actively recording
pub const RECORDING_WINDOW: usize = 60;

/// One amplitude measurement tagged with the capture position
///
/// `sequence` is a monotonic ordinal that keeps samples distinguishable
/// even when two ticks report the same position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeteringSample {
    /// Capture position in milliseconds
    pub position_ms: u64,
    /// Monotonic ordinal, assigned at append time
    pub sequence: u64,
    /// Amplitude in dB, clamped to `[min_power, 0]`
    pub db: f32,
}

/// Ordered amplitude samples, insertion order = capture order
///
/// Invariant: positions are non-decreasing. Samples are never removed
/// individually; eviction happens only through `clear`.
#[derive(Debug, Clone)]
pub struct MeteringBuffer {
    samples: Vec<MeteringSample>,
    next_sequence: u64,
    min_power_db: f32,
}

impl MeteringBuffer {
    /// Create an empty buffer with the given amplitude floor
    pub fn new(min_power_db: f32) -> Self {
        Self {
            samples: Vec::new(),
            next_sequence: 0,
            min_power_db,
        }
    }

    /// Append one sample captured at `position_ms`
    ///
    /// Amplitude is clamped to `[min_power, 0]`. A position behind the
    /// last sample is lifted to it so the ordering invariant holds even
    /// if the engine reports a small backwards jitter.
    pub fn push(&mut self, position_ms: u64, db: f32) -> MeteringSample {
        let position_ms = match self.samples.last() {
            Some(last) => position_ms.max(last.position_ms),
            None => position_ms,
        };

        let sample = MeteringSample {
            position_ms,
            sequence: self.next_sequence,
            db: db.clamp(self.min_power_db, 0.0),
        };
        self.next_sequence += 1;
        self.samples.push(sample);
        sample
    }

    /// Full sample history of the take
    pub fn all(&self) -> &[MeteringSample] {
        &self.samples
    }

    /// The most recent `n` samples
    pub fn recent(&self, n: usize) -> &[MeteringSample] {
        let start = self.samples.len().saturating_sub(n);
        &self.samples[start..]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples; sequence numbering restarts with the next take
    pub fn clear(&mut self) {
        self.samples.clear();
        self.next_sequence = 0;
    }

    /// Amplitude floor used for clamping
    pub fn min_power_db(&self) -> f32 {
        self.min_power_db
    }
}
