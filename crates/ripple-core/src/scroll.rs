//! One-way bridge to the host's animation/gesture subsystem
//!
//! The core issues animation commands (targets, decay trajectories,
//! spring-to-zero) and reads back a continuously updated offset; it never
//! shares mutable session state with the animation evaluator. Canonical
//! state changes flow the other way, through explicit settle checkpoints:
//! a decay reports its settling offset via [`Recorder::scroll_settled`]
//! exactly once, and a spring-to-zero completes a oneshot channel after
//! it stops producing frames, not before.
//!
//! [`Recorder::scroll_settled`]: crate::recorder::Recorder::scroll_settled

use tokio::sync::oneshot;

/// Record-indicator visual scale while idle
pub const INDICATOR_IDLE_SCALE: f32 = 1.0;

/// Record-indicator visual scale while recording (shrinks to a square)
pub const INDICATOR_RECORDING_SCALE: f32 = 0.5;

/// Decay trajectory for a released drag
///
/// The driver integrates this from the release velocity, rubber-banding
/// at the clamp edges, and reports the settling offset once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySpec {
    /// Release velocity in pixels per second
    pub velocity: f32,
    /// Per-frame velocity retention factor
    pub deceleration: f32,
    /// Stiffness of the rubber-band effect at the clamp edges
    pub rubber_band_factor: f32,
    /// Offset clamp, `(-max_width, 0)`
    pub clamp: (f32, f32),
}

impl DecaySpec {
    pub fn new(velocity: f32, clamp: (f32, f32)) -> Self {
        Self {
            velocity,
            deceleration: 0.995,
            rubber_band_factor: 1.0,
            clamp,
        }
    }
}

/// Timed tween toward a clock-driven target
///
/// Issued on every applied recording/playback tick so the strip glides
/// between tick positions instead of stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    pub target_px: f32,
    pub duration_ms: u64,
}

/// Animation driver owned by the host's evaluator
///
/// Implementations run their own continuous evaluation for smooth
/// per-frame values; the core only commands targets and reads `offset`.
/// Gesture recognition (including the 10 px activation threshold before
/// a drag begins) also lives on this side of the bridge.
pub trait ScrollDriver {
    /// Current per-frame offset in pixels
    fn offset(&self) -> f32;

    /// Jump to an offset without animating (raw drag frames)
    fn set_offset(&mut self, offset_px: f32);

    /// Tween toward a target over the given duration
    fn glide_to(&mut self, glide: Glide);

    /// Run a decay trajectory from a release velocity
    ///
    /// The host must forward the settling offset to
    /// `Recorder::scroll_settled` exactly once, at settle, not on every
    /// intermediate frame.
    fn decay(&mut self, spec: DecaySpec);

    /// Spring the offset back to 0, completing `done` only after settle
    ///
    /// Used to sequence operations that must visually rewind the
    /// timeline before mutating canonical state.
    fn spring_to_zero(&mut self, done: oneshot::Sender<()>);

    /// Spring the record-indicator visual scale toward a target
    fn spring_indicator(&mut self, target_scale: f32);

    /// Cancel any in-flight decay or spring
    fn cancel(&mut self);
}

/// Driver that settles every command instantly
///
/// For headless hosts and tests: a glide jumps straight to its target, a
/// decay clamps the current offset, and a spring-to-zero completes its
/// channel immediately.
#[derive(Debug, Default)]
pub struct ImmediateScroll {
    offset_px: f32,
    indicator_scale: f32,
}

impl ImmediateScroll {
    pub fn new() -> Self {
        Self {
            offset_px: 0.0,
            indicator_scale: INDICATOR_IDLE_SCALE,
        }
    }

    /// Current indicator scale target
    pub fn indicator_scale(&self) -> f32 {
        self.indicator_scale
    }
}

impl ScrollDriver for ImmediateScroll {
    fn offset(&self) -> f32 {
        self.offset_px
    }

    fn set_offset(&mut self, offset_px: f32) {
        self.offset_px = offset_px;
    }

    fn glide_to(&mut self, glide: Glide) {
        self.offset_px = glide.target_px;
    }

    fn decay(&mut self, spec: DecaySpec) {
        // No physics: settle where the drag left off, inside the clamp
        self.offset_px = self.offset_px.clamp(spec.clamp.0, spec.clamp.1);
    }

    fn spring_to_zero(&mut self, done: oneshot::Sender<()>) {
        self.offset_px = 0.0;
        let _ = done.send(());
    }

    fn spring_indicator(&mut self, target_scale: f32) {
        self.indicator_scale = target_scale;
    }

    fn cancel(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_decay_clamps() {
        let mut driver = ImmediateScroll::new();
        driver.set_offset(-500.0);
        driver.decay(DecaySpec::new(-100.0, (-340.0, 0.0)));
        assert_eq!(driver.offset(), -340.0);
    }

    #[tokio::test]
    async fn test_immediate_spring_completes_channel() {
        let mut driver = ImmediateScroll::new();
        driver.set_offset(-120.0);
        let (tx, rx) = oneshot::channel();
        driver.spring_to_zero(tx);
        rx.await.unwrap();
        assert_eq!(driver.offset(), 0.0);
    }
}
