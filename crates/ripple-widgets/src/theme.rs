//! Shared theme constants for the recorder widget
//!
//! Colors and visual constants consumed by the waveform view-model.
//! Everything here is a plain configuration record passed at
//! construction; none of it affects the core's state machine.

use iced::Color;

/// Default amplitude strip tint (bars of the active take)
pub const WAVEFORM_TINT_COLOR: Color = Color::from_rgb(0.91, 0.26, 0.21);

/// Default color of bars once the take is finished
pub const WAVEFORM_PLAYED_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.5);

/// Default strip background
pub const WAVEFORM_BACKGROUND_COLOR: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.2,
};

/// Default timeline tick color
pub const TIMELINE_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.5);

/// Waveform display configuration
#[derive(Debug, Clone)]
pub struct WaveformStyle {
    /// Height of the strip container in pixels
    pub container_height: f32,
    /// Tallest possible amplitude bar in pixels
    pub max_bar_height: f32,
    /// Height of a minor timeline tick in pixels
    pub minor_tick_height: f32,
    /// Height of a major (once per second) timeline tick in pixels
    pub major_tick_height: f32,
    /// Bars of the active take
    pub tint: Color,
    /// Bars once the take is finished
    pub played: Color,
    /// Strip background; also the color of the newest bar while recording
    pub background: Color,
    /// Timeline ticks and labels
    pub timeline: Color,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            container_height: 160.0,
            max_bar_height: 120.0,
            minor_tick_height: 6.0,
            major_tick_height: 12.0,
            tint: WAVEFORM_TINT_COLOR,
            played: WAVEFORM_PLAYED_COLOR,
            background: WAVEFORM_BACKGROUND_COLOR,
            timeline: TIMELINE_COLOR,
        }
    }
}
