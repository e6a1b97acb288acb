//! The AR runtime surface consumed by the session controller and tracker.

use async_trait::async_trait;
use holoanchor_core::{FrameTime, Pose, SessionHandle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of session requested from the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Camera passthrough with world tracking.
    ImmersiveAr,
}

/// Optional or required session features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    /// Ray/surface intersection queries.
    HitTest,
    /// Compositing a DOM subtree over the camera feed.
    DomOverlay,
}

/// Session negotiation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInit {
    /// Requested mode.
    pub mode: SessionMode,
    /// Features the session cannot run without.
    pub required_features: Vec<Feature>,
    /// Features used when granted.
    pub optional_features: Vec<Feature>,
    /// Root element for overlay compositing, when requested.
    pub dom_overlay_root: Option<String>,
}

impl SessionInit {
    /// Immersive AR with hit-testing required and DOM overlay bound to `<body>`.
    pub fn immersive_ar() -> Self {
        Self {
            mode: SessionMode::ImmersiveAr,
            required_features: vec![Feature::HitTest],
            optional_features: vec![Feature::DomOverlay],
            dom_overlay_root: Some("body".to_string()),
        }
    }
}

/// Reference space kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSpaceKind {
    /// Origin follows the viewer; only used to seed the hit-test ray.
    Viewer,
    /// Stable world frame near the session origin.
    Local,
}

/// A coordinate frame obtained from the runtime for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpace {
    /// Runtime id.
    pub id: u64,
    /// Owning session.
    pub session: SessionHandle,
    /// Space kind.
    pub kind: ReferenceSpaceKind,
}

/// Subscription producing per-frame hit-test candidates along a viewer ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestSource {
    /// Runtime id.
    pub id: u64,
    /// Owning session.
    pub session: SessionHandle,
    /// The viewer space the ray is bound to.
    pub space: ReferenceSpace,
}

/// One ranked hit-test candidate for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestResult {
    /// Runtime id, only meaningful within its frame.
    pub id: u64,
}

/// Errors reported by the AR runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The runtime cannot provide the requested mode or feature.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// The runtime refused the request (permissions, missing activation, ...).
    #[error("request rejected: {0}")]
    Rejected(String),
    /// The request was made against a session that is no longer usable.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ProviderError {
    /// Human-readable reason as reported by the runtime.
    pub fn reason(&self) -> &str {
        match self {
            Self::NotSupported(reason) | Self::Rejected(reason) | Self::InvalidState(reason) => {
                reason
            }
        }
    }

    /// Whether the runtime wants the request repeated from a user gesture.
    ///
    /// Runtimes only signal this through the reason text.
    pub fn requires_user_gesture(&self) -> bool {
        self.reason().to_ascii_lowercase().contains("gesture")
    }
}

/// Session-level runtime capabilities.
#[async_trait(?Send)]
pub trait ArProvider {
    /// Whether an AR runtime is exposed at all.
    fn is_available(&self) -> bool;

    /// Ask whether sessions of `mode` can be created on this device.
    async fn is_session_supported(&self, mode: SessionMode) -> Result<bool, ProviderError>;

    /// Negotiate a new session.
    async fn request_session(&mut self, init: &SessionInit)
        -> Result<SessionHandle, ProviderError>;

    /// Obtain a reference space for a live session.
    async fn request_reference_space(
        &mut self,
        session: SessionHandle,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, ProviderError>;

    /// Subscribe to hit-tests along the ray of `space`.
    async fn request_hit_test_source(
        &mut self,
        session: SessionHandle,
        space: &ReferenceSpace,
    ) -> Result<HitTestSource, ProviderError>;

    /// Tear a session down. Unknown or already-ended handles are ignored.
    fn end_session(&mut self, session: SessionHandle);
}

/// Per-frame runtime data, valid only inside the frame callback.
pub trait XrFrame {
    /// Display timestamp of this frame.
    fn time(&self) -> FrameTime;

    /// Ranked candidates for `source`, best first.
    fn hit_test_results(&self, source: &HitTestSource) -> Vec<HitTestResult>;

    /// Resolve a candidate against `space`; `None` when the runtime cannot.
    fn resolve_pose(&self, result: &HitTestResult, space: &ReferenceSpace) -> Option<Pose>;

    /// Viewer pose in `space`, when tracked.
    fn viewer_pose(&self, _space: &ReferenceSpace) -> Option<Pose> {
        None
    }
}
