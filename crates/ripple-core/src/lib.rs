//! Position synchronization engine for the ripple audio-recorder widget
//!
//! One canonical timeline position, reconciled from three competing
//! sources: the recording clock, the playback clock, and direct dragging
//! of the waveform strip. The crate owns the session state machine and
//! derives everything the rendering layer needs; capture hardware and
//! animation physics stay on the host side, injected behind traits.
//!
//! ## Architecture
//!
//! - **`Session`** (`session`): canonical owner of position, duration,
//!   and mode; applies ticks from whichever source is authoritative.
//! - **`Recorder`** (`recorder`): lifecycle state machine and the async
//!   operation surface; mode guards make invalid calls silent no-ops.
//! - **`TimelineScale`** (`timeline`): pure, invertible pixel↔millisecond
//!   mapping with 100 ms quantization.
//! - **`MeteringBuffer`** (`metering`): append-only amplitude store with
//!   a bounded recent window for live rendering.
//! - **`AudioEngine` / `ScrollDriver`** (`engine`, `scroll`): the two
//!   injected collaborator contracts.
//!
//! ## Concurrency model
//!
//! Canonical state mutates only through `&mut Recorder` in response to
//! discrete, serialized events. The animation evaluator runs on its own
//! and writes back solely at settle checkpoints (a oneshot completion or
//! a single `scroll_settled` call), never by mutating session fields.

pub mod config;
pub mod engine;
pub mod error;
pub mod metering;
pub mod recorder;
pub mod scroll;
pub mod session;
pub mod timeline;

pub use config::{
    default_config_path, load_config, save_config, RecorderConfig, RecordingConfig, TimelineConfig,
};
pub use engine::{
    AudioEngine, PlaybackTick, PlaybackWindow, RecordInfo, RecordTick, RecordingHandle,
};
pub use error::{EngineError, EngineResult};
pub use metering::{MeteringBuffer, MeteringSample, RECORDING_WINDOW};
pub use recorder::{Recorder, RecorderHooks};
pub use scroll::{
    DecaySpec, Glide, ImmediateScroll, ScrollDriver, INDICATOR_IDLE_SCALE,
    INDICATOR_RECORDING_SCALE,
};
pub use session::{Mode, Session};
pub use timeline::{TimelineScale, POSITION_QUANTUM_MS};
