//! Cosmetic hover and glow pulse.
//!
//! Both curves are functions of global frame time. They never read or write the
//! anchor's placement, only the displayed transform derived from it.

use holoanchor_core::FrameTime;
use serde::{Deserialize, Serialize};

/// Hover and glow curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverAnimation {
    /// Vertical bob amplitude in metres.
    pub amplitude: f32,
    /// Constant upward bias in metres.
    pub bias: f32,
    /// Time divisor of the bob's sine, in milliseconds.
    pub divisor_ms: f32,
    /// Glow opacity around which the pulse oscillates.
    pub glow_base: f32,
    /// Glow pulse amplitude.
    pub glow_amplitude: f32,
    /// Time divisor of the glow's sine, in milliseconds.
    pub glow_divisor_ms: f32,
}

impl Default for HoverAnimation {
    fn default() -> Self {
        Self {
            amplitude: 0.01,
            bias: 0.004,
            divisor_ms: 520.0,
            glow_base: 0.22,
            glow_amplitude: 0.07,
            glow_divisor_ms: 380.0,
        }
    }
}

/// One frame's worth of animation output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverSample {
    /// Vertical offset added to the anchor's base height.
    pub offset_y: f32,
    /// Glow layer opacity.
    pub glow_opacity: f32,
}

impl HoverAnimation {
    /// Evaluate both curves at `time`.
    pub fn sample(&self, time: FrameTime) -> HoverSample {
        HoverSample {
            offset_y: time.sin_over(self.divisor_ms) * self.amplitude + self.bias,
            glow_opacity: self.glow_base + time.sin_over(self.glow_divisor_ms) * self.glow_amplitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_starts_at_bias() {
        let sample = HoverAnimation::default().sample(FrameTime::ZERO);
        assert!((sample.offset_y - 0.004).abs() < 1e-6);
        assert!((sample.glow_opacity - 0.22).abs() < 1e-6);
    }

    #[test]
    fn curves_stay_in_range() {
        let anim = HoverAnimation::default();
        for step in 0..2000 {
            let sample = anim.sample(FrameTime(step as f64 * 7.3));
            assert!(sample.offset_y >= -0.006 - 1e-6 && sample.offset_y <= 0.014 + 1e-6);
            assert!(sample.glow_opacity >= 0.15 - 1e-6 && sample.glow_opacity <= 0.29 + 1e-6);
        }
    }

    #[test]
    fn bob_peaks_a_quarter_turn_in() {
        let anim = HoverAnimation::default();
        let peak = FrameTime(520.0 * std::f64::consts::FRAC_PI_2);
        assert!((anim.sample(peak).offset_y - 0.014).abs() < 1e-5);
    }

    #[test]
    fn bob_tracks_double_precision_after_hours() {
        let anim = HoverAnimation::default();
        let t = 7.0 * 3_600_000.0 + 0.25;
        let sample = anim.sample(FrameTime(t));
        let expected = (t / 520.0).sin() * 0.01 + 0.004;
        assert!((f64::from(sample.offset_y) - expected).abs() < 1e-6);
        let glow = 0.22 + (t / 380.0).sin() * 0.07;
        assert!((f64::from(sample.glow_opacity) - glow).abs() < 1e-6);
    }
}
