//! Lifecycle state machine and public operation surface
//!
//! `Recorder` reconciles the three sources that compete to drive the
//! timeline position (the recording clock, the playback clock, and
//! direct dragging) into one canonical session. Operations are async
//! commands with mode guards: calling one in an incompatible mode is a
//! silent no-op that resolves without effect, never an error. Engine
//! failures propagate and leave the session exactly as it was.
//!
//! Mutation is serialized through `&mut self`, so overlapping operations
//! are structurally impossible; the mode guards exist for calls made in
//! the wrong mode and for late ticks arriving after a transition.

use tokio::sync::oneshot;

use crate::config::RecorderConfig;
use crate::engine::{
    AudioEngine, PlaybackTick, PlaybackWindow, RecordInfo, RecordTick, RecordingHandle,
};
use crate::error::EngineResult;
use crate::scroll::{
    DecaySpec, Glide, ScrollDriver, INDICATOR_IDLE_SCALE, INDICATOR_RECORDING_SCALE,
};
use crate::session::{Mode, RecordTickOutcome, Session};
use crate::timeline::TimelineScale;

/// Host callbacks, fired after the corresponding state change committed
///
/// All hooks are optional; an empty set is the default.
#[derive(Default)]
pub struct RecorderHooks {
    /// Canonical position changed (milliseconds)
    pub on_position_change: Option<Box<dyn FnMut(u64)>>,
    /// Recording started
    pub on_record_start: Option<Box<dyn FnMut(&RecordInfo)>>,
    /// Recording stopped (user-initiated or automatic)
    pub on_record_stop: Option<Box<dyn FnMut(&RecordInfo)>>,
    /// Session was reset to its initial values
    pub on_record_reset: Option<Box<dyn FnMut()>>,
    /// Playback started
    pub on_playback_start: Option<Box<dyn FnMut(&PlaybackWindow)>>,
    /// Playback stopped or finished
    pub on_playback_stop: Option<Box<dyn FnMut(&PlaybackWindow)>>,
}

/// Position synchronization engine for one recorder widget instance
///
/// Takes the audio engine, the animation driver, and the configuration as
/// explicit constructor arguments; nothing is ambient.
pub struct Recorder<E: AudioEngine, D: ScrollDriver> {
    engine: E,
    driver: D,
    config: RecorderConfig,
    scale: TimelineScale,
    session: Session,
    hooks: RecorderHooks,
    /// Offset at gesture begin; raw drag deltas accumulate onto it
    drag_origin_px: f32,
}

impl<E: AudioEngine, D: ScrollDriver> Recorder<E, D> {
    pub fn new(engine: E, driver: D, config: RecorderConfig) -> Self {
        let scale = config.scale();
        let session = Session::new(config.recording.max_duration_ms, config.recording.min_power_db);
        Self {
            engine,
            driver,
            config,
            scale,
            session,
            hooks: RecorderHooks::default(),
            drag_origin_px: 0.0,
        }
    }

    pub fn hooks_mut(&mut self) -> &mut RecorderHooks {
        &mut self.hooks
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn scale(&self) -> TimelineScale {
        self.scale
    }

    /// Per-frame scroll offset, read-only view for the renderer
    pub fn scroll_offset(&self) -> f32 {
        self.driver.offset()
    }

    /// Current record-indicator scale target
    pub fn indicator_scale_target(&self) -> f32 {
        if self.session.mode() == Mode::Recording {
            INDICATOR_RECORDING_SCALE
        } else {
            INDICATOR_IDLE_SCALE
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Public operations
    // ─────────────────────────────────────────────────────────────

    /// Start a new take
    ///
    /// Legal only from `Idle`; otherwise resolves to `None` without
    /// effect. If a previous take exists, the timeline is first
    /// spring-rewound to 0 and recording starts only after the rewind
    /// settles. On engine failure nothing is committed.
    pub async fn start_recording(&mut self) -> EngineResult<Option<RecordInfo>> {
        if self.session.mode() != Mode::Idle {
            log::debug!("start_recording ignored: mode is {:?}", self.session.mode());
            return Ok(None);
        }

        if !self.session.metering().is_empty() {
            self.rewind_to_zero().await;
        }

        let info = self.engine.record_start().await?;

        self.session.begin_recording();
        self.driver.cancel();
        self.driver.set_offset(0.0);
        self.driver.spring_indicator(INDICATOR_RECORDING_SCALE);

        if let Some(hook) = self.hooks.on_record_start.as_mut() {
            hook(&info);
        }
        self.notify_position(0);

        log::info!("recording started (uri: {:?})", info.uri);
        Ok(Some(info))
    }

    /// Stop the active take
    ///
    /// Legal only from `Recording`. Resolves with the final info: uri,
    /// duration, and the take's metering samples. The position parks at
    /// the end of the take and the record indicator springs back.
    pub async fn stop_recording(&mut self) -> EngineResult<Option<RecordInfo>> {
        if self.session.mode() != Mode::Recording {
            log::debug!("stop_recording ignored: mode is {:?}", self.session.mode());
            return Ok(None);
        }

        let mut info = self.engine.record_stop().await?;

        // The engine's measured duration wins; fall back to the last tick
        let duration_ms = info.duration_ms.unwrap_or_else(|| self.session.duration_ms());
        let handle = info.uri.clone().map(RecordingHandle);
        self.session.finish_recording(duration_ms, handle);

        info.duration_ms = Some(duration_ms);
        info.meterings = self.session.metering().all().to_vec();

        self.driver.glide_to(Glide {
            target_px: self.scale.offset_of_clamped(duration_ms, duration_ms),
            duration_ms: self.config.recording.progress_interval_ms,
        });
        self.driver.spring_indicator(INDICATOR_IDLE_SCALE);

        if let Some(hook) = self.hooks.on_record_stop.as_mut() {
            hook(&info);
        }
        self.notify_position(duration_ms);

        log::info!("recording stopped at {} ms", duration_ms);
        Ok(Some(info))
    }

    /// Play back the captured take
    ///
    /// Legal only from `Idle` with a take loaded. If the current position
    /// is within one 100 ms bucket of the end, playback restarts from 0
    /// after rewinding the timeline; otherwise it resumes in place.
    pub async fn start_playback(&mut self) -> EngineResult<Option<PlaybackWindow>> {
        if self.session.mode() != Mode::Idle {
            log::debug!("start_playback ignored: mode is {:?}", self.session.mode());
            return Ok(None);
        }
        if self.session.recording().is_none() {
            log::debug!("start_playback ignored: no take loaded");
            return Ok(None);
        }

        let position = self.session.position_ms();
        let duration = self.session.duration_ms();
        let resume = position / 100 < duration / 100;
        let play_position = if resume { position } else { 0 };

        if play_position == 0 {
            self.rewind_to_zero().await;
        }

        let window = self.engine.playback_start(play_position).await?;

        self.session.begin_playback(play_position);
        self.driver.cancel();

        if let Some(hook) = self.hooks.on_playback_start.as_mut() {
            hook(&window);
        }
        self.notify_position(play_position);

        Ok(Some(window))
    }

    /// Stop playback, keeping the position where the transport halted
    ///
    /// Legal only from `Playing`; also invoked internally when the engine
    /// reports completion.
    pub async fn stop_playback(&mut self) -> EngineResult<Option<PlaybackWindow>> {
        if self.session.mode() != Mode::Playing {
            log::debug!("stop_playback ignored: mode is {:?}", self.session.mode());
            return Ok(None);
        }

        let window = self.engine.playback_stop().await?;

        self.session.finish_playback(window.position_ms);

        if let Some(hook) = self.hooks.on_playback_stop.as_mut() {
            hook(&window);
        }
        self.notify_position(self.session.position_ms());

        Ok(Some(window))
    }

    /// Discard the take and restore the session to its initial values
    ///
    /// No-op while `Recording`. Always succeeds: the engine release is
    /// best-effort, so this remains a usable recovery path after engine
    /// failures. If a take exists, the timeline rewinds first.
    pub async fn reset_recording(&mut self) {
        if self.session.mode() == Mode::Recording {
            log::debug!("reset_recording ignored: recording is active");
            return;
        }

        if !self.session.metering().is_empty() {
            self.rewind_to_zero().await;
        }

        if self.session.mode() == Mode::Playing {
            if let Err(e) = self.engine.playback_stop().await {
                log::warn!("reset_recording: playback stop failed: {}", e);
            }
        }

        if let Err(e) = self.engine.record_reset().await {
            log::warn!("reset_recording: engine release failed: {}", e);
        }

        self.session.reset();
        self.driver.cancel();
        self.driver.set_offset(0.0);
        self.driver.spring_indicator(INDICATOR_IDLE_SCALE);

        if let Some(hook) = self.hooks.on_record_reset.as_mut() {
            hook();
        }
        self.notify_position(0);
    }

    /// Release engine resources on widget teardown
    ///
    /// Best-effort, no animations: drops whatever the engine still holds.
    pub async fn shutdown(&mut self) {
        if self.session.mode() == Mode::Playing {
            let _ = self.engine.playback_stop().await;
        }
        if self.session.mode() == Mode::Recording {
            let _ = self.engine.record_stop().await;
        }
        if let Err(e) = self.engine.record_reset().await {
            log::warn!("shutdown: engine release failed: {}", e);
        }
        self.session.reset();
    }

    // ─────────────────────────────────────────────────────────────
    // Engine tick inlets
    // ─────────────────────────────────────────────────────────────

    /// Feed one recording status tick
    ///
    /// Applied only while `Recording`; stale ticks are dropped. When a
    /// tick lands on or past `max_duration`, recording is stopped
    /// internally with the same contract as a user-initiated stop, and
    /// the final info is returned.
    pub async fn record_tick(&mut self, tick: RecordTick) -> EngineResult<Option<RecordInfo>> {
        match self.session.apply_record_tick(tick) {
            RecordTickOutcome::Dropped => Ok(None),
            RecordTickOutcome::Applied => {
                self.glide_to_position(self.session.duration_ms());
                self.notify_position(self.session.position_ms());
                Ok(None)
            }
            RecordTickOutcome::ReachedLimit => {
                self.glide_to_position(self.session.duration_ms());
                self.notify_position(self.session.position_ms());
                log::info!("max duration reached, stopping recording");
                self.stop_recording().await
            }
        }
    }

    /// Feed one playback status tick
    ///
    /// Applied only while `Playing`. On completion the controller forces
    /// `stop_playback` and returns the final window.
    pub async fn playback_tick(&mut self, tick: PlaybackTick) -> EngineResult<Option<PlaybackWindow>> {
        if self.session.mode() != Mode::Playing {
            log::debug!("dropping playback tick at {} ms: mode is {:?}", tick.position_ms, self.session.mode());
            return Ok(None);
        }

        if self.session.apply_playback_tick(tick) {
            self.glide_to_position(self.session.position_ms());
            self.notify_position(self.session.position_ms());
        }

        if tick.finished {
            return self.stop_playback().await;
        }
        Ok(None)
    }

    // ─────────────────────────────────────────────────────────────
    // Gesture inlets
    // ─────────────────────────────────────────────────────────────

    /// A drag began; enters `Scrubbing`
    ///
    /// Returns false (gesture rejected) unless the session is idle.
    pub fn gesture_begin(&mut self) -> bool {
        if self.session.mode() != Mode::Idle {
            return false;
        }
        self.driver.cancel();
        self.drag_origin_px = self.driver.offset();
        self.session.begin_scrub();
        true
    }

    /// Raw pointer delta since the drag began, in pixels
    ///
    /// Accumulates onto the offset with no smoothing. The canonical
    /// position is not touched until the release decay settles.
    pub fn gesture_change(&mut self, translation_px: f32) {
        if self.session.mode() != Mode::Scrubbing {
            return;
        }
        self.driver.set_offset(self.drag_origin_px + translation_px);
    }

    /// The drag was released with the given velocity
    ///
    /// Leaves `Scrubbing` and hands the driver a decay trajectory clamped
    /// to the strip, rubber-banding at the edges.
    pub fn gesture_end(&mut self, velocity_px_s: f32) {
        if self.session.mode() != Mode::Scrubbing {
            return;
        }
        self.session.end_scrub();
        self.driver.decay(DecaySpec::new(
            velocity_px_s,
            self.scale.decay_clamp(self.session.duration_ms()),
        ));
    }

    /// The decay trajectory settled at the given offset
    ///
    /// Called by the host exactly once per release. Converts the offset
    /// back to a canonical position; stale settlements arriving after a
    /// transition into a clock-driven mode are dropped by the session.
    pub fn scroll_settled(&mut self, offset_px: f32) {
        let position = self.scale.position_of(offset_px, self.session.duration_ms());
        if self.session.apply_settled_position(position) {
            self.notify_position(self.session.position_ms());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    /// Spring the timeline back to 0 and wait for the settle
    ///
    /// Sequencing helper for operations that must visually rewind before
    /// mutating canonical state. A driver that drops the channel counts
    /// as settled.
    async fn rewind_to_zero(&mut self) {
        let (tx, rx) = oneshot::channel();
        self.driver.spring_to_zero(tx);
        let _ = rx.await;
    }

    fn glide_to_position(&mut self, position_ms: u64) {
        self.driver.glide_to(Glide {
            target_px: self.scale.offset_of_clamped(position_ms, self.session.duration_ms()),
            duration_ms: self.config.recording.progress_interval_ms,
        });
    }

    fn notify_position(&mut self, position_ms: u64) {
        if let Some(hook) = self.hooks.on_position_change.as_mut() {
            hook(position_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::scroll::ImmediateScroll;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockState {
        record_starts: u32,
        record_stops: u32,
        playback_starts: Vec<u64>,
        playback_stops: u32,
        resets: u32,
        fail_record_start: bool,
        stop_duration_ms: Option<u64>,
        transport_position_ms: u64,
        transport_duration_ms: u64,
    }

    #[derive(Clone)]
    struct MockEngine(Rc<RefCell<MockState>>);

    impl MockEngine {
        fn new() -> (Self, Rc<RefCell<MockState>>) {
            let state = Rc::new(RefCell::new(MockState::default()));
            (Self(state.clone()), state)
        }
    }

    impl AudioEngine for MockEngine {
        async fn record_start(&mut self) -> EngineResult<RecordInfo> {
            let mut state = self.0.borrow_mut();
            if state.fail_record_start {
                return Err(EngineError::PermissionDenied);
            }
            state.record_starts += 1;
            Ok(RecordInfo {
                uri: Some("file:///tmp/take.m4a".into()),
                ..Default::default()
            })
        }

        async fn record_stop(&mut self) -> EngineResult<RecordInfo> {
            let mut state = self.0.borrow_mut();
            state.record_stops += 1;
            Ok(RecordInfo {
                uri: Some("file:///tmp/take.m4a".into()),
                duration_ms: state.stop_duration_ms,
                meterings: Vec::new(),
            })
        }

        async fn record_reset(&mut self) -> EngineResult<()> {
            self.0.borrow_mut().resets += 1;
            Ok(())
        }

        async fn playback_start(&mut self, position_ms: u64) -> EngineResult<PlaybackWindow> {
            let mut state = self.0.borrow_mut();
            state.playback_starts.push(position_ms);
            state.transport_position_ms = position_ms;
            Ok(PlaybackWindow {
                position_ms,
                duration_ms: state.transport_duration_ms,
            })
        }

        async fn playback_stop(&mut self) -> EngineResult<PlaybackWindow> {
            let mut state = self.0.borrow_mut();
            state.playback_stops += 1;
            Ok(PlaybackWindow {
                position_ms: state.transport_position_ms,
                duration_ms: state.transport_duration_ms,
            })
        }
    }

    fn recorder_with(
        max_duration_ms: u64,
    ) -> (Recorder<MockEngine, ImmediateScroll>, Rc<RefCell<MockState>>) {
        let (engine, state) = MockEngine::new();
        let mut config = RecorderConfig::default();
        config.recording.max_duration_ms = max_duration_ms;
        (Recorder::new(engine, ImmediateScroll::new(), config), state)
    }

    /// Record a take of `duration_ms` in 100 ms ticks and stop it
    async fn record_take(
        recorder: &mut Recorder<MockEngine, ImmediateScroll>,
        state: &Rc<RefCell<MockState>>,
        duration_ms: u64,
    ) {
        recorder.start_recording().await.unwrap().unwrap();
        for t in (100..=duration_ms).step_by(100) {
            recorder.record_tick(RecordTick { duration_ms: t, db: -18.0 }).await.unwrap();
        }
        state.borrow_mut().stop_duration_ms = Some(duration_ms);
        state.borrow_mut().transport_duration_ms = duration_ms;
        recorder.stop_recording().await.unwrap();
    }

    #[tokio::test]
    async fn test_recording_flow() {
        let (mut recorder, state) = recorder_with(120_000);

        let info = recorder.start_recording().await.unwrap().unwrap();
        assert!(info.uri.is_some());
        assert_eq!(recorder.session().mode(), Mode::Recording);
        assert_eq!(recorder.indicator_scale_target(), INDICATOR_RECORDING_SCALE);

        recorder.record_tick(RecordTick { duration_ms: 50, db: -12.0 }).await.unwrap();
        recorder.record_tick(RecordTick { duration_ms: 100, db: -14.0 }).await.unwrap();
        assert_eq!(recorder.session().position_ms(), 100);
        assert_eq!(recorder.session().duration_ms(), 100);
        assert_eq!(recorder.session().metering().len(), 2);
        // Clock drives the offset leftward
        assert!(recorder.scroll_offset() < 0.0);

        state.borrow_mut().stop_duration_ms = Some(100);
        let info = recorder.stop_recording().await.unwrap().unwrap();
        assert_eq!(info.duration_ms, Some(100));
        assert_eq!(info.meterings.len(), 2);
        assert_eq!(recorder.session().mode(), Mode::Idle);
        assert_eq!(recorder.session().position_ms(), 100);
        assert!(recorder.session().recording().is_some());
        assert_eq!(recorder.indicator_scale_target(), INDICATOR_IDLE_SCALE);
    }

    #[tokio::test]
    async fn test_auto_stop_exactly_once_at_max_duration() {
        let (mut recorder, state) = recorder_with(1000);
        recorder.start_recording().await.unwrap();
        state.borrow_mut().stop_duration_ms = Some(1000);

        let mut stop_info = None;
        for t in (100..=1300).step_by(100) {
            if let Some(info) = recorder.record_tick(RecordTick { duration_ms: t, db: -18.0 }).await.unwrap() {
                assert!(stop_info.is_none(), "auto-stop fired twice");
                stop_info = Some(info);
            }
        }

        let info = stop_info.expect("auto-stop never fired");
        assert_eq!(info.duration_ms, Some(1000));
        assert_eq!(state.borrow().record_stops, 1);
        // The tick at 1000 applied; nothing beyond it did
        assert_eq!(recorder.session().duration_ms(), 1000);
        assert_eq!(recorder.session().metering().len(), 10);
        assert_eq!(recorder.session().mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn test_auto_stop_when_tick_overshoots_max_duration() {
        let (mut recorder, state) = recorder_with(1000);
        recorder.start_recording().await.unwrap();
        state.borrow_mut().stop_duration_ms = Some(1000);

        assert!(recorder
            .record_tick(RecordTick { duration_ms: 950, db: -18.0 })
            .await
            .unwrap()
            .is_none());
        // The next tick jumps past the ceiling instead of landing on it
        let info = recorder
            .record_tick(RecordTick { duration_ms: 1030, db: -18.0 })
            .await
            .unwrap()
            .expect("overshooting tick should trigger the auto-stop");

        assert_eq!(info.duration_ms, Some(1000));
        assert_eq!(recorder.session().mode(), Mode::Idle);
        assert_eq!(recorder.session().duration_ms(), 1000);
        assert_eq!(state.borrow().record_stops, 1);
    }

    #[tokio::test]
    async fn test_mutual_exclusion_while_recording() {
        let (mut recorder, state) = recorder_with(120_000);
        recorder.start_recording().await.unwrap();

        assert!(recorder.start_playback().await.unwrap().is_none());
        assert!(state.borrow().playback_starts.is_empty());
        assert_eq!(recorder.session().mode(), Mode::Recording);

        // Re-entrant start is a no-op too
        assert!(recorder.start_recording().await.unwrap().is_none());
        assert_eq!(state.borrow().record_starts, 1);

        // Gesture recognizer is rejected while a clock owns the position
        assert!(!recorder.gesture_begin());
    }

    #[tokio::test]
    async fn test_playback_resumes_from_mid_take_position() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 2000).await;

        // Drag back to 500 ms and settle there
        recorder.gesture_begin();
        recorder.gesture_change(recorder.scale().offset_of(500) - recorder.scale().offset_of(2000));
        recorder.gesture_end(0.0);
        recorder.scroll_settled(recorder.scale().offset_of(500));
        assert_eq!(recorder.session().position_ms(), 500);

        let window = recorder.start_playback().await.unwrap().unwrap();
        assert_eq!(window.position_ms, 500);
        assert_eq!(state.borrow().playback_starts, vec![500]);
        assert_eq!(recorder.session().mode(), Mode::Playing);
    }

    #[tokio::test]
    async fn test_playback_restarts_from_zero_at_end_of_take() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 2000).await;

        // Position parked at the end: restart from 0 after rewinding
        assert_eq!(recorder.session().position_ms(), 2000);
        let window = recorder.start_playback().await.unwrap().unwrap();
        assert_eq!(window.position_ms, 0);
        assert_eq!(recorder.scroll_offset(), 0.0);
    }

    #[tokio::test]
    async fn test_playback_ticks_drive_position_until_finish() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 1000).await;
        recorder.start_playback().await.unwrap();

        recorder.playback_tick(PlaybackTick { position_ms: 400, duration_ms: 1000, finished: false }).await.unwrap();
        assert_eq!(recorder.session().position_ms(), 400);

        state.borrow_mut().transport_position_ms = 1000;
        let window = recorder
            .playback_tick(PlaybackTick { position_ms: 1000, duration_ms: 1000, finished: true })
            .await
            .unwrap()
            .expect("finish should force stop_playback");
        assert_eq!(window.position_ms, 1000);
        assert_eq!(recorder.session().mode(), Mode::Idle);
        assert_eq!(state.borrow().playback_stops, 1);
    }

    #[tokio::test]
    async fn test_stale_playback_tick_after_stop_is_dropped() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 1000).await;
        recorder.start_playback().await.unwrap();

        recorder.playback_tick(PlaybackTick { position_ms: 300, duration_ms: 1000, finished: false }).await.unwrap();
        state.borrow_mut().transport_position_ms = 300;
        recorder.stop_playback().await.unwrap().unwrap();
        assert_eq!(recorder.session().position_ms(), 300);

        // A late engine callback resolving after the transition
        recorder.playback_tick(PlaybackTick { position_ms: 900, duration_ms: 1000, finished: false }).await.unwrap();
        assert_eq!(recorder.session().position_ms(), 300);
        assert_eq!(recorder.session().mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state_and_releases_engine() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 1500).await;

        recorder.reset_recording().await;
        assert_eq!(recorder.session().mode(), Mode::Idle);
        assert_eq!(recorder.session().position_ms(), 0);
        assert_eq!(recorder.session().duration_ms(), 0);
        assert!(recorder.session().metering().is_empty());
        assert!(recorder.session().recording().is_none());
        assert_eq!(recorder.scroll_offset(), 0.0);
        assert_eq!(state.borrow().resets, 1);

        // Idempotent from the fresh state
        recorder.reset_recording().await;
        assert_eq!(recorder.session().position_ms(), 0);
    }

    #[tokio::test]
    async fn test_reset_is_a_no_op_while_recording() {
        let (mut recorder, state) = recorder_with(120_000);
        recorder.start_recording().await.unwrap();
        recorder.record_tick(RecordTick { duration_ms: 100, db: -18.0 }).await.unwrap();

        recorder.reset_recording().await;
        assert_eq!(recorder.session().mode(), Mode::Recording);
        assert_eq!(recorder.session().metering().len(), 1);
        assert_eq!(state.borrow().resets, 0);
    }

    #[tokio::test]
    async fn test_engine_failure_leaves_session_untouched() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 1000).await;

        state.borrow_mut().fail_record_start = true;
        let err = recorder.start_recording().await.unwrap_err();
        assert!(matches!(err, EngineError::PermissionDenied));
        // Pre-transition state intact: previous take still loaded
        assert_eq!(recorder.session().mode(), Mode::Idle);
        assert_eq!(recorder.session().duration_ms(), 1000);
        assert!(!recorder.session().metering().is_empty());
        assert!(recorder.session().recording().is_some());

        // Reset remains the recovery path
        recorder.reset_recording().await;
        assert_eq!(recorder.session().duration_ms(), 0);
    }

    #[tokio::test]
    async fn test_scrub_settle_updates_position_once() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 5000).await;

        let positions = Rc::new(RefCell::new(Vec::new()));
        let seen = positions.clone();
        recorder.hooks_mut().on_position_change = Some(Box::new(move |ms| seen.borrow_mut().push(ms)));

        assert!(recorder.gesture_begin());
        assert_eq!(recorder.session().mode(), Mode::Scrubbing);
        // Raw frames move the offset but not the canonical position
        recorder.gesture_change(50.0);
        recorder.gesture_change(120.0);
        assert!(positions.borrow().is_empty());

        recorder.gesture_end(-40.0);
        assert_eq!(recorder.session().mode(), Mode::Idle);
        recorder.scroll_settled(recorder.scale().offset_of(1200));
        assert_eq!(recorder.session().position_ms(), 1200);
        assert_eq!(positions.borrow().as_slice(), &[1200]);
    }

    #[tokio::test]
    async fn test_new_take_rewinds_before_recording() {
        let (mut recorder, state) = recorder_with(120_000);
        record_take(&mut recorder, &state, 1000).await;
        assert!(recorder.scroll_offset() < 0.0);

        let info = recorder.start_recording().await.unwrap().unwrap();
        assert!(info.uri.is_some());
        // Previous take cleared, offset rewound before capture began
        assert_eq!(recorder.scroll_offset(), 0.0);
        assert_eq!(recorder.session().duration_ms(), 0);
        assert!(recorder.session().metering().is_empty());
        assert_eq!(state.borrow().record_starts, 2);
    }

    #[tokio::test]
    async fn test_playback_without_take_is_a_no_op() {
        let (mut recorder, state) = recorder_with(120_000);
        assert!(recorder.start_playback().await.unwrap().is_none());
        assert!(state.borrow().playback_starts.is_empty());
    }
}
