//! Audio engine contract consumed by the recorder core
//!
//! The core never touches capture hardware directly. The host injects an
//! `AudioEngine` implementation at construction and forwards the engine's
//! status ticks into the recorder as they arrive. Tick routing and all
//! mode guarding happen on the recorder side, so an engine implementation
//! only has to expose its transport operations.

use crate::error::EngineResult;
use crate::metering::MeteringSample;

/// Opaque reference to a captured asset
///
/// Set only after a successful `record_stop`, cleared by reset. The
/// engine-side resource behind it is released via `record_reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHandle(pub String);

/// Info resolved by record start/stop operations
#[derive(Debug, Clone, Default)]
pub struct RecordInfo {
    /// Engine-side URI of the captured asset, if one exists yet
    pub uri: Option<String>,
    /// Final duration in milliseconds (stop only)
    pub duration_ms: Option<u64>,
    /// Amplitude samples captured over the take (stop only)
    pub meterings: Vec<MeteringSample>,
}

/// Ephemeral playback snapshot reported to the host on start/stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackWindow {
    pub position_ms: u64,
    pub duration_ms: u64,
}

/// One recording status tick from the engine
///
/// Emitted at the configured progress interval while capture is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordTick {
    /// Elapsed capture duration in milliseconds
    pub duration_ms: u64,
    /// Measured amplitude in dB, at or below 0
    pub db: f32,
}

/// One playback status tick from the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTick {
    pub position_ms: u64,
    pub duration_ms: u64,
    /// True exactly once, when the transport reaches the end of the asset
    pub finished: bool,
}

/// Microphone capture and playback transport
///
/// All operations may suspend for an unbounded but short duration. The
/// recorder updates its mode only after an awaited operation resolves, so
/// implementations don't need their own re-entrancy guards.
//
// The recorder drives a single engine from one logical thread, so the
// futures are not required to be Send.
#[allow(async_fn_in_trait)]
pub trait AudioEngine {
    /// Open the capture device and start recording
    ///
    /// Fails if permission is absent or the hardware is busy.
    async fn record_start(&mut self) -> EngineResult<RecordInfo>;

    /// Stop recording and finalize the captured asset
    async fn record_stop(&mut self) -> EngineResult<RecordInfo>;

    /// Release any loaded asset
    async fn record_reset(&mut self) -> EngineResult<()>;

    /// Start playback of the captured asset from the given position
    async fn playback_start(&mut self, position_ms: u64) -> EngineResult<PlaybackWindow>;

    /// Stop playback, reporting where the transport halted
    async fn playback_stop(&mut self) -> EngineResult<PlaybackWindow>;
}
