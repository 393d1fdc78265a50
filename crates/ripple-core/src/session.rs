//! Canonical session state and the position controller
//!
//! `Session` is the single owner of `position`, `duration`, and the
//! metering buffer. Writes go through mode-checked application methods:
//! only the source that is authoritative for the current mode can move
//! the position, which is what protects the state from late asynchronous
//! ticks arriving after a transition already changed the mode.

use crate::engine::{PlaybackTick, RecordTick, RecordingHandle};
use crate::metering::{MeteringBuffer, MeteringSample, RECORDING_WINDOW};

/// Mutually exclusive operating mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Recording,
    Playing,
    Scrubbing,
}

impl Mode {
    pub fn is_idle(self) -> bool {
        self == Mode::Idle
    }

    /// Whether the pan gesture recognizer should be active
    ///
    /// Dragging is disabled while a clock source owns the position.
    pub fn gesture_enabled(self) -> bool {
        matches!(self, Mode::Idle | Mode::Scrubbing)
    }
}

/// Outcome of applying a recording tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTickOutcome {
    /// Tick applied; position and duration advanced
    Applied,
    /// Tick applied and the take reached its configured ceiling
    ReachedLimit,
    /// Tick dropped: session is not recording
    Dropped,
}

/// One widget instance's runtime state
///
/// Owned exclusively by the recorder; the metering buffer and scroll
/// offset live and die with it.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    position_ms: u64,
    duration_ms: u64,
    max_duration_ms: u64,
    metering: MeteringBuffer,
    recording: Option<RecordingHandle>,
}

impl Session {
    pub fn new(max_duration_ms: u64, min_power_db: f32) -> Self {
        Self {
            mode: Mode::Idle,
            position_ms: 0,
            duration_ms: 0,
            max_duration_ms,
            metering: MeteringBuffer::new(min_power_db),
            recording: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Canonical position in milliseconds, always within `[0, duration]`
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Take duration; non-decreasing while recording, frozen otherwise
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn max_duration_ms(&self) -> u64 {
        self.max_duration_ms
    }

    pub fn metering(&self) -> &MeteringBuffer {
        &self.metering
    }

    /// Handle of the captured asset, set only after a successful stop
    pub fn recording(&self) -> Option<&RecordingHandle> {
        self.recording.as_ref()
    }

    /// Samples the renderer should draw right now
    ///
    /// A bounded recent window while actively recording, the full take
    /// otherwise.
    pub fn visible_meterings(&self) -> &[MeteringSample] {
        if self.mode == Mode::Recording {
            self.metering.recent(RECORDING_WINDOW)
        } else {
            self.metering.all()
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Position controller: tick application
    // ─────────────────────────────────────────────────────────────

    /// Apply a recording clock tick
    ///
    /// Authoritative only while `Recording`. Each applied tick sets
    /// `position = duration = tick.duration_ms` and appends a metering
    /// sample. A tick landing on or past `max_duration` is clamped to it
    /// and reported as the limit; tick cadence rarely hits the ceiling
    /// exactly.
    pub(crate) fn apply_record_tick(&mut self, tick: RecordTick) -> RecordTickOutcome {
        if self.mode != Mode::Recording {
            log::debug!("dropping record tick at {} ms: mode is {:?}", tick.duration_ms, self.mode);
            return RecordTickOutcome::Dropped;
        }

        let applied_ms = tick.duration_ms.min(self.max_duration_ms);
        self.duration_ms = self.duration_ms.max(applied_ms);
        self.position_ms = self.duration_ms;
        self.metering.push(self.position_ms, tick.db);

        if tick.duration_ms >= self.max_duration_ms {
            RecordTickOutcome::ReachedLimit
        } else {
            RecordTickOutcome::Applied
        }
    }

    /// Apply a playback clock tick
    ///
    /// Authoritative only while `Playing`. Returns true if the position
    /// moved.
    pub(crate) fn apply_playback_tick(&mut self, tick: PlaybackTick) -> bool {
        if self.mode != Mode::Playing {
            log::debug!("dropping playback tick at {} ms: mode is {:?}", tick.position_ms, self.mode);
            return false;
        }

        let next = tick.position_ms.min(self.duration_ms);
        let moved = next != self.position_ms;
        self.position_ms = next;
        moved
    }

    /// Apply a settled scroll offset, already converted to a position
    ///
    /// Authoritative only while `Idle` or `Scrubbing`; a settle arriving
    /// after a transition into a clock-driven mode is stale and dropped.
    pub(crate) fn apply_settled_position(&mut self, position_ms: u64) -> bool {
        if !self.mode.gesture_enabled() {
            log::debug!("dropping settled position {} ms: mode is {:?}", position_ms, self.mode);
            return false;
        }

        let next = position_ms.min(self.duration_ms);
        let moved = next != self.position_ms;
        self.position_ms = next;
        moved
    }

    // ─────────────────────────────────────────────────────────────
    // Lifecycle transitions (called by the recorder after the
    // corresponding engine operation resolved)
    // ─────────────────────────────────────────────────────────────

    pub(crate) fn begin_recording(&mut self) {
        self.metering.clear();
        self.position_ms = 0;
        self.duration_ms = 0;
        self.recording = None;
        self.mode = Mode::Recording;
    }

    pub(crate) fn finish_recording(&mut self, duration_ms: u64, handle: Option<RecordingHandle>) {
        self.duration_ms = duration_ms;
        // Park the position at the end of the take
        self.position_ms = duration_ms;
        self.recording = handle;
        self.mode = Mode::Idle;
    }

    pub(crate) fn begin_playback(&mut self, position_ms: u64) {
        self.position_ms = position_ms.min(self.duration_ms);
        self.mode = Mode::Playing;
    }

    pub(crate) fn finish_playback(&mut self, position_ms: u64) {
        self.position_ms = position_ms.min(self.duration_ms);
        self.mode = Mode::Idle;
    }

    pub(crate) fn begin_scrub(&mut self) {
        self.mode = Mode::Scrubbing;
    }

    pub(crate) fn end_scrub(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Restore the session to its initial values
    pub(crate) fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.metering.clear();
        self.recording = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(1000, -50.0)
    }

    #[test]
    fn test_record_tick_advances_position_and_duration() {
        let mut s = session();
        s.begin_recording();
        assert_eq!(s.apply_record_tick(RecordTick { duration_ms: 100, db: -20.0 }), RecordTickOutcome::Applied);
        assert_eq!(s.position_ms(), 100);
        assert_eq!(s.duration_ms(), 100);
        assert_eq!(s.metering().len(), 1);
    }

    #[test]
    fn test_record_tick_at_limit() {
        let mut s = session();
        s.begin_recording();
        assert_eq!(
            s.apply_record_tick(RecordTick { duration_ms: 1000, db: -20.0 }),
            RecordTickOutcome::ReachedLimit
        );
        assert_eq!(s.duration_ms(), 1000);
        assert_eq!(s.metering().len(), 1);
    }

    #[test]
    fn test_overshooting_tick_clamps_and_reaches_limit() {
        let mut s = session();
        s.begin_recording();
        assert_eq!(
            s.apply_record_tick(RecordTick { duration_ms: 950, db: -20.0 }),
            RecordTickOutcome::Applied
        );
        // Tick cadence jumps past the ceiling without landing on it
        assert_eq!(
            s.apply_record_tick(RecordTick { duration_ms: 1030, db: -20.0 }),
            RecordTickOutcome::ReachedLimit
        );
        assert_eq!(s.duration_ms(), 1000);
        assert_eq!(s.position_ms(), 1000);
    }

    #[test]
    fn test_record_tick_dropped_outside_recording() {
        let mut s = session();
        assert_eq!(
            s.apply_record_tick(RecordTick { duration_ms: 100, db: -20.0 }),
            RecordTickOutcome::Dropped
        );
        assert_eq!(s.position_ms(), 0);
    }

    #[test]
    fn test_duration_never_decreases_while_recording() {
        let mut s = session();
        s.begin_recording();
        s.apply_record_tick(RecordTick { duration_ms: 300, db: -20.0 });
        s.apply_record_tick(RecordTick { duration_ms: 250, db: -20.0 });
        assert_eq!(s.duration_ms(), 300);
    }

    #[test]
    fn test_playback_tick_clamped_to_duration() {
        let mut s = session();
        s.begin_recording();
        s.apply_record_tick(RecordTick { duration_ms: 500, db: -20.0 });
        s.finish_recording(500, None);
        s.begin_playback(0);
        assert!(s.apply_playback_tick(PlaybackTick { position_ms: 800, duration_ms: 500, finished: false }));
        assert_eq!(s.position_ms(), 500);
    }

    #[test]
    fn test_settled_position_dropped_while_playing() {
        let mut s = session();
        s.begin_recording();
        s.apply_record_tick(RecordTick { duration_ms: 500, db: -20.0 });
        s.finish_recording(500, None);
        s.begin_playback(0);
        assert!(!s.apply_settled_position(300));
        assert_eq!(s.position_ms(), 0);
    }

    #[test]
    fn test_visible_meterings_windowed_while_recording() {
        let mut s = Session::new(100_000, -50.0);
        s.begin_recording();
        for i in 1..=80u64 {
            s.apply_record_tick(RecordTick { duration_ms: i * 50, db: -20.0 });
        }
        assert_eq!(s.visible_meterings().len(), RECORDING_WINDOW);
        s.finish_recording(4000, None);
        assert_eq!(s.visible_meterings().len(), 80);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut s = session();
        s.begin_recording();
        s.apply_record_tick(RecordTick { duration_ms: 400, db: -20.0 });
        s.finish_recording(400, Some(RecordingHandle("file:///take".into())));
        s.reset();
        assert_eq!(s.mode(), Mode::Idle);
        assert_eq!(s.position_ms(), 0);
        assert_eq!(s.duration_ms(), 0);
        assert!(s.metering().is_empty());
        assert!(s.recording().is_none());
    }
}
