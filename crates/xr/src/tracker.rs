//! Per-frame surface tracking from hit-test results.

use crate::provider::{HitTestSource, ReferenceSpace, XrFrame};
use glam::Mat4;
use holoanchor_core::Pose;
use tracing::debug;

/// Outcome of one tracker update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUpdate {
    /// Whether a surface is under the view ray this frame.
    pub visible: bool,
    /// Pose resolved this frame, if resolution succeeded.
    pub resolved: Option<Pose>,
}

/// Tracks the surface under the viewer ray.
///
/// The only state kept between frames is the last visibility and the last
/// resolved pose. A frame with candidates whose best pose fails to resolve
/// keeps the surface visible and the previous pose in place.
#[derive(Debug, Clone, Default)]
pub struct HitTestTracker {
    visible: bool,
    pose: Option<Pose>,
}

impl HitTestTracker {
    /// A tracker that has seen nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull this frame's hit-test results and update visibility and pose.
    pub fn update<F>(
        &mut self,
        frame: &F,
        source: &HitTestSource,
        space: &ReferenceSpace,
    ) -> TrackerUpdate
    where
        F: XrFrame + ?Sized,
    {
        let results = frame.hit_test_results(source);
        let Some(best) = results.first() else {
            self.visible = false;
            return TrackerUpdate {
                visible: false,
                resolved: None,
            };
        };

        let resolved = frame.resolve_pose(best, space);
        if resolved.is_none() {
            debug!(candidates = results.len(), "hit-test pose did not resolve; keeping last");
        }
        self.visible = true;
        self.pose = resolved.or(self.pose);
        TrackerUpdate {
            visible: true,
            resolved,
        }
    }

    /// Whether the last update saw a surface.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The pose placement may use: the latest known pose while a surface is visible.
    pub fn current_pose(&self) -> Option<Pose> {
        if self.visible {
            self.pose
        } else {
            None
        }
    }

    /// Matrix for the reticle, or `None` to hide it.
    pub fn reticle_matrix(&self) -> Option<Mat4> {
        self.current_pose().map(|pose| pose.matrix())
    }

    /// Forget everything; used when the reference space goes away.
    pub fn reset(&mut self) {
        self.visible = false;
        self.pose = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{HitTestResult, ReferenceSpaceKind};
    use glam::Vec3;
    use holoanchor_core::{FrameTime, SessionHandle};

    struct Frame {
        results: Vec<Option<Pose>>,
    }

    impl XrFrame for Frame {
        fn time(&self) -> FrameTime {
            FrameTime::ZERO
        }

        fn hit_test_results(&self, _source: &HitTestSource) -> Vec<HitTestResult> {
            (0..self.results.len() as u64)
                .map(|id| HitTestResult { id })
                .collect()
        }

        fn resolve_pose(&self, result: &HitTestResult, _space: &ReferenceSpace) -> Option<Pose> {
            self.results[result.id as usize]
        }
    }

    fn spaces() -> (HitTestSource, ReferenceSpace) {
        let session = SessionHandle(1);
        let viewer = ReferenceSpace {
            id: 1,
            session,
            kind: ReferenceSpaceKind::Viewer,
        };
        let local = ReferenceSpace {
            id: 2,
            session,
            kind: ReferenceSpaceKind::Local,
        };
        let source = HitTestSource {
            id: 3,
            session,
            space: viewer,
        };
        (source, local)
    }

    #[test]
    fn no_results_hides_surface() {
        let (source, space) = spaces();
        let mut tracker = HitTestTracker::new();
        let update = tracker.update(&Frame { results: vec![] }, &source, &space);
        assert!(!update.visible);
        assert!(tracker.current_pose().is_none());
        assert!(tracker.reticle_matrix().is_none());
    }

    #[test]
    fn first_candidate_wins() {
        let (source, space) = spaces();
        let mut tracker = HitTestTracker::new();
        let near = Pose::from_position(Vec3::new(0.0, -1.0, -1.0));
        let far = Pose::from_position(Vec3::new(0.0, -1.0, -4.0));
        tracker.update(
            &Frame {
                results: vec![Some(near), Some(far)],
            },
            &source,
            &space,
        );
        assert_eq!(tracker.current_pose(), Some(near));
    }

    #[test]
    fn failed_resolution_keeps_previous_pose_and_visibility() {
        let (source, space) = spaces();
        let mut tracker = HitTestTracker::new();
        let pose = Pose::from_position(Vec3::new(0.2, -1.1, -0.9));
        tracker.update(&Frame { results: vec![Some(pose)] }, &source, &space);

        let update = tracker.update(&Frame { results: vec![None] }, &source, &space);
        assert!(update.visible);
        assert!(update.resolved.is_none());
        assert!(tracker.is_visible());
        assert_eq!(tracker.current_pose(), Some(pose));
    }

    #[test]
    fn visible_without_any_pose_offers_nothing_to_place() {
        let (source, space) = spaces();
        let mut tracker = HitTestTracker::new();
        tracker.update(&Frame { results: vec![None] }, &source, &space);
        assert!(tracker.is_visible());
        assert!(tracker.current_pose().is_none());
    }

    #[test]
    fn reset_forgets_pose() {
        let (source, space) = spaces();
        let mut tracker = HitTestTracker::new();
        tracker.update(
            &Frame {
                results: vec![Some(Pose::IDENTITY)],
            },
            &source,
            &space,
        );
        tracker.reset();
        assert!(!tracker.is_visible());
        tracker.update(&Frame { results: vec![None] }, &source, &space);
        assert!(tracker.current_pose().is_none());
    }
}
