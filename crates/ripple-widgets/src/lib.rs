//! View-model layer for the ripple audio-recorder widget
//!
//! This crate turns `ripple-core` session state into the numeric and
//! layout values a rendering layer draws, without doing any drawing
//! itself.
//!
//! ## Architecture
//!
//! - **Theme constants** (`theme`): colors and strip dimensions as a
//!   plain configuration record.
//! - **Waveform layout** (`waveform`): per-frame bar positions/heights,
//!   timeline tick layout, strip translation, indicator scale.
//! - **Clock formatting** (`format`): time-indicator and timeline label
//!   strings.
//!
//! State lives at the host/application level; layout functions consume
//! references and return pure data.

pub mod format;
pub mod theme;
pub mod waveform;

// Re-export commonly used items
pub use format::{format_seconds, format_timer};
pub use theme::{
    WaveformStyle, TIMELINE_COLOR, WAVEFORM_BACKGROUND_COLOR, WAVEFORM_PLAYED_COLOR,
    WAVEFORM_TINT_COLOR,
};
pub use waveform::{
    bar_height, waveform_layout, BarRole, TimelineTick, WaveformBar, WaveformLayout,
};
