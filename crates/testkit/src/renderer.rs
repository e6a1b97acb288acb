//! Scene renderer that records instead of drawing.

use anyhow::Result;
use glam::{Mat4, Vec3};
use holoanchor_camera::{Camera, CameraRig};
use holoanchor_core::{GroupId, Pose, Transform, Viewport};
use holoanchor_hologram::{HologramVisual, Reticle, SceneRenderer};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// State of one group in the recorded scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGroup {
    /// Payload it was built from.
    pub visual: HologramVisual,
    /// Latest transform.
    pub transform: Transform,
    /// Latest glow opacity.
    pub glow_opacity: f32,
}

/// Records scene-graph calls for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Live groups.
    pub groups: BTreeMap<GroupId, RecordedGroup>,
    /// Groups created over the renderer's lifetime.
    pub created: Vec<GroupId>,
    /// Groups destroyed over the renderer's lifetime.
    pub destroyed: Vec<GroupId>,
    /// Every transform assignment, in order.
    pub transform_writes: Vec<(GroupId, Transform)>,
    /// Current reticle matrix; `None` while hidden.
    pub reticle: Option<Mat4>,
    /// Cameras reported to callers.
    pub rig: CameraRig,
    /// Number of `render` calls.
    pub frames_rendered: u64,
    /// Latest viewport.
    pub viewport: Option<Viewport>,
    /// Per-view offsets from the rig camera, captured at construction.
    eye_offsets: Vec<Vec3>,
    next_id: u64,
}

impl RecordingRenderer {
    /// Renderer with a single default camera.
    pub fn new() -> Self {
        Self::with_rig(CameraRig::mono(Camera::default()))
    }

    /// Renderer reporting `rig` as its cameras.
    pub fn with_rig(rig: CameraRig) -> Self {
        let eye_offsets = rig
            .views
            .iter()
            .map(|view| rig.combined.orientation.inverse() * (view.position - rig.combined.position))
            .collect();
        Self {
            rig,
            eye_offsets,
            next_id: 1,
            ..Default::default()
        }
    }

    /// Transform of a live group.
    pub fn transform_of(&self, group: GroupId) -> Option<Transform> {
        self.groups.get(&group).map(|g| g.transform)
    }
}

impl SceneRenderer for RecordingRenderer {
    fn create_group(&mut self, visual: &HologramVisual) -> Result<GroupId> {
        let id = GroupId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.groups.insert(
            id,
            RecordedGroup {
                visual: visual.clone(),
                transform: Transform::default(),
                glow_opacity: visual.glow.color[3],
            },
        );
        self.created.push(id);
        debug!(group = %id, "recorded group created");
        Ok(id)
    }

    fn destroy_group(&mut self, group: GroupId) {
        if self.groups.remove(&group).is_some() {
            self.destroyed.push(group);
            debug!(%group, "recorded group destroyed");
        } else {
            trace!(%group, "destroy ignored for unknown group");
        }
    }

    fn set_group_transform(&mut self, group: GroupId, transform: &Transform) {
        if let Some(entry) = self.groups.get_mut(&group) {
            entry.transform = *transform;
            self.transform_writes.push((group, *transform));
        }
    }

    fn group_world_matrix(&self, group: GroupId) -> Option<Mat4> {
        self.groups.get(&group).map(|g| g.transform.matrix())
    }

    fn set_glow_opacity(&mut self, group: GroupId, opacity: f32) {
        if let Some(entry) = self.groups.get_mut(&group) {
            entry.glow_opacity = opacity;
        }
    }

    fn set_reticle(&mut self, _reticle: &Reticle, matrix: Option<Mat4>) {
        self.reticle = matrix;
    }

    fn cameras(&self) -> CameraRig {
        self.rig.clone()
    }

    fn set_viewer_pose(&mut self, pose: &Pose) {
        self.rig.combined.set_pose(pose);
        for (view, offset) in self.rig.views.iter_mut().zip(&self.eye_offsets) {
            view.set_pose(&Pose::new(
                pose.position + pose.orientation * *offset,
                pose.orientation,
            ));
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.rig.set_aspect(viewport.width, viewport.height);
        self.viewport = Some(viewport);
    }

    fn render(&mut self) {
        self.frames_rendered += 1;
    }
}
