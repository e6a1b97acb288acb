#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod pose;
pub mod transform;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use pose::Pose;
pub use transform::Transform;

/// Frame timestamp in milliseconds, as handed out by the display loop.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct FrameTime(pub f64);

impl FrameTime {
    /// First frame of any timeline.
    pub const ZERO: Self = Self(0.0);

    /// Advance by `delta_ms` milliseconds.
    pub fn advance(self, delta_ms: f64) -> Self {
        Self(self.0 + delta_ms)
    }

    /// `sin(t / divisor_ms)`, evaluated in double precision.
    ///
    /// Only the result is narrowed, so long-running sessions keep
    /// sub-millisecond resolution in the phase.
    pub fn sin_over(self, divisor_ms: f32) -> f32 {
        (self.0 / f64::from(divisor_ms)).sin() as f32
    }
}

/// Opaque identifier of a live AR session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub u64);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Handle to a visual group owned by the scene renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Pixel dimensions of the viewport the overlay lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, clamping both sides to at least one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width / height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}
