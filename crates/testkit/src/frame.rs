//! Scripted per-frame runtime data.

use holoanchor_core::{FrameTime, Pose};
use holoanchor_xr::{HitTestResult, HitTestSource, ReferenceSpace, XrFrame};

/// One frame of hit-test candidates, best first.
///
/// `None` entries are candidates whose pose fails to resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedFrame {
    /// Display timestamp.
    pub time: FrameTime,
    /// Candidates in rank order.
    pub hits: Vec<Option<Pose>>,
    /// Viewer pose, when tracked.
    pub viewer: Option<Pose>,
}

impl ScriptedFrame {
    /// A frame with no surface under the ray.
    pub fn empty(time: FrameTime) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// A frame with a single resolvable candidate.
    pub fn hit(time: FrameTime, pose: Pose) -> Self {
        Self {
            time,
            hits: vec![Some(pose)],
            viewer: None,
        }
    }

    /// A frame whose best candidate fails to resolve.
    pub fn unresolved(time: FrameTime) -> Self {
        Self {
            time,
            hits: vec![None],
            viewer: None,
        }
    }

    /// Builder: set the viewer pose.
    pub fn with_viewer(mut self, viewer: Pose) -> Self {
        self.viewer = Some(viewer);
        self
    }
}

impl XrFrame for ScriptedFrame {
    fn time(&self) -> FrameTime {
        self.time
    }

    fn hit_test_results(&self, _source: &HitTestSource) -> Vec<HitTestResult> {
        (0..self.hits.len() as u64)
            .map(|id| HitTestResult { id })
            .collect()
    }

    fn resolve_pose(&self, result: &HitTestResult, _space: &ReferenceSpace) -> Option<Pose> {
        self.hits.get(result.id as usize).copied().flatten()
    }

    fn viewer_pose(&self, _space: &ReferenceSpace) -> Option<Pose> {
        self.viewer
    }
}
