//! Waveform view-model
//!
//! Converts core session state into the numeric/layout values the
//! rendering layer draws: bar positions and heights, timeline tick
//! layout, the strip translation, and the time-indicator string. This is
//! pure data generation; state lives in `ripple-core` and rendering is
//! the host's concern.

use iced::Color;
use ripple_core::{MeteringSample, Mode, Session, TimelineScale};

use crate::format::format_timer;
use crate::theme::WaveformStyle;

/// What a bar represents, mapped to a color by the style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarRole {
    /// Part of the take currently being captured
    Active,
    /// Part of a finished take
    Played,
    /// The newest bar while recording, drawn in the background color
    Head,
}

/// One amplitude bar, positioned on the unscrolled strip
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBar {
    /// Left edge relative to the strip origin
    pub x_px: f32,
    pub height_px: f32,
    /// Stable identity across frames, from the metering sample
    pub sequence: u64,
    pub role: BarRole,
}

/// One timeline tick mark under the strip
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineTick {
    pub x_px: f32,
    /// Major ticks land on whole seconds and carry a label
    pub major: bool,
    pub label: Option<String>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformLayout {
    /// Horizontal translation of the strip (the scroll offset)
    pub translate_px: f32,
    /// Full strip width for the current take
    pub strip_width_px: f32,
    pub bars: Vec<WaveformBar>,
    pub ticks: Vec<TimelineTick>,
    /// Time-indicator string for the canonical position
    pub clock: String,
    /// Record-indicator scale target
    pub indicator_scale: f32,
    /// Whether the pan gesture recognizer should be active
    pub gesture_enabled: bool,
}

impl WaveformStyle {
    /// Color a bar according to its role
    pub fn bar_color(&self, role: BarRole) -> Color {
        match role {
            BarRole::Active => self.tint,
            BarRole::Played => self.played,
            BarRole::Head => self.background,
        }
    }
}

/// Linear interpolation of an amplitude into a bar height, clamped
///
/// `min_power_db` maps to 1 px, 0 dB maps to `max_height_px`.
pub fn bar_height(db: f32, min_power_db: f32, max_height_px: f32) -> f32 {
    if min_power_db >= 0.0 {
        return max_height_px;
    }
    let t = ((db - min_power_db) / -min_power_db).clamp(0.0, 1.0);
    1.0 + t * (max_height_px - 1.0)
}

/// Build the frame layout for the current session state
///
/// `scroll_px` and `indicator_scale` are the animation driver's current
/// per-frame values; everything else derives from canonical state.
pub fn waveform_layout(
    session: &Session,
    scale: TimelineScale,
    scroll_px: f32,
    indicator_scale: f32,
    style: &WaveformStyle,
) -> WaveformLayout {
    let recording = session.mode() == Mode::Recording;
    let samples = session.visible_meterings();
    let min_power = session.metering().min_power_db();

    let bars = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| bar_for(sample, index, samples.len(), recording, scale, min_power, style))
        .collect();

    WaveformLayout {
        translate_px: scroll_px,
        strip_width_px: scale.max_width(session.duration_ms()),
        bars,
        ticks: timeline_ticks(session.max_duration_ms(), scale),
        clock: format_timer(session.position_ms() as i64, false),
        indicator_scale,
        gesture_enabled: session.mode().gesture_enabled(),
    }
}

fn bar_for(
    sample: &MeteringSample,
    index: usize,
    count: usize,
    recording: bool,
    scale: TimelineScale,
    min_power: f32,
    style: &WaveformStyle,
) -> WaveformBar {
    let role = if recording {
        if index + 1 == count {
            BarRole::Head
        } else {
            BarRole::Active
        }
    } else {
        BarRole::Played
    };

    WaveformBar {
        // Bars sit at the mirror of the scroll mapping: later position,
        // further right on the unscrolled strip
        x_px: -scale.offset_of(sample.position_ms),
        height_px: bar_height(sample.db, min_power, style.max_bar_height),
        sequence: sample.sequence,
        role,
    }
}

/// Tick marks over the whole configured maximum duration
///
/// One tick per timeline line; every fourth line (whole seconds at the
/// default 250 ms pitch) is major and labelled.
fn timeline_ticks(max_duration_ms: u64, scale: TimelineScale) -> Vec<TimelineTick> {
    let lines = max_duration_ms / scale.ms_per_line;
    (0..=lines)
        .map(|line| {
            let major = line % 4 == 0;
            TimelineTick {
                x_px: line as f32 * scale.pixels_per_line,
                major,
                label: major.then(|| format_timer((line * scale.ms_per_line) as i64, false)),
            }
        })
        .collect()
}
